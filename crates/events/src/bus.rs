use super::models::{AppEvent, EventBus};
use std::sync::Arc;
use colored::Colorize;

impl EventBus {
    pub fn new(silent_mode: bool) -> Arc<Self> {
        Arc::new(Self { silent_mode })
    }

    pub fn is_silent(&self) -> bool {
        self.silent_mode
    }

    pub fn emit(&self, event: AppEvent) {
        // Errors always reach the log, even when the console is reserved for JSON output
        if self.silent_mode {
            if let AppEvent::Error { context, error } = event {
                tracing::error!("{}: {}", context, error);
            }
            return;
        }

        match event {
            // Application lifecycle
            AppEvent::Starting => {
                println!("\n{}", "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━".bright_black());
                println!("  {}", "mediastore - Media Storage".white().bold());
                println!("  {} {}", "Version".dimmed(), env!("CARGO_PKG_VERSION").cyan());
                println!("{}\n", "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━".bright_black());
            }

            // Configuration
            AppEvent::ConfigLoading { path } => {
                println!("  {} {}", "Loading config".dimmed(), path.cyan());
            }
            AppEvent::ConfigLoaded { backend } => {
                println!("  {} Storage backend: {}", "✓".green(), backend.cyan());
            }
            AppEvent::ConfigCreated { path } => {
                tracing::warn!("Configuration file not found");
                tracing::info!("Created default configuration at: {}", path);
            }
            AppEvent::ConfigMigrated { added_fields } => {
                if !added_fields.is_empty() {
                    println!("  {} Config updated: added {}",
                        "↻".blue(),
                        added_fields.join(", ").dimmed()
                    );
                }
            }

            // Storage
            AppEvent::ProviderReady { backend } => {
                println!("  {} Provider ready: {}", "✓".green(), backend.cyan());
            }
            AppEvent::UploadStarted { target, bytes } => {
                println!("  {} Uploading {} ({} bytes)", "→".dimmed(), target.cyan(), bytes);
            }
            AppEvent::UploadCompleted { url, public_id } => {
                println!("  {} Uploaded {}", "✓".green(), url.blue());
                if let Some(id) = public_id {
                    println!("    {} {}", "public id".dimmed(), id.cyan());
                }
            }
            AppEvent::AssetDeleted { public_id, kind } => {
                println!("  {} Deleted {} ({})", "-".red(), public_id.cyan(), kind.dimmed());
            }

            // Errors
            AppEvent::Error { context, error } => {
                tracing::error!("{}: {}", context, error);
            }
        }
    }
}
