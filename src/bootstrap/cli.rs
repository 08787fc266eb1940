use mediastore_events::{AppEvent, EventBus};
use mediastore_storage::{ResourceKind, StorageProvider, UploadOptions, UploadResult};
use anyhow::{Context, Result};
use bytes::Bytes;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "mediastore", version, about = "Upload and delete media assets on the configured storage backend")]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, env = "MEDIASTORE_CONFIG", default_value = "config.toml")]
    pub config: String,

    /// Print results as JSON on stdout instead of console events
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Upload an image
    UploadImage(UploadArgs),
    /// Upload a document or any other non-image file
    UploadFile(UploadFileArgs),
    /// Delete a stored asset
    Delete(DeleteArgs),
}

#[derive(Args, Debug)]
pub struct UploadArgs {
    pub path: PathBuf,

    #[arg(long)]
    pub folder: Option<String>,

    /// Defaults to the file stem
    #[arg(long)]
    pub filename: Option<String>,
}

#[derive(Args, Debug)]
pub struct UploadFileArgs {
    pub path: PathBuf,

    #[arg(long)]
    pub folder: Option<String>,

    /// Defaults to the file name
    #[arg(long)]
    pub filename: Option<String>,

    /// Guessed from the path when omitted
    #[arg(long)]
    pub mimetype: Option<String>,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    pub public_id: String,

    /// image, raw or auto
    #[arg(long)]
    pub kind: ResourceKind,
}

impl Command {
    pub async fn run(
        self,
        provider: Arc<dyn StorageProvider>,
        events: &Arc<EventBus>,
        json: bool,
    ) -> Result<()> {
        match self {
            Command::UploadImage(args) => {
                let payload = read_payload(&args.path).await?;
                let filename = args.filename.or_else(|| file_stem(&args.path));
                let options = build_options(args.folder, filename, None);

                events.emit(AppEvent::UploadStarted {
                    target: args.path.display().to_string(),
                    bytes: payload.len(),
                });
                let result = provider.upload_image(payload, options).await?;
                report_upload(result, events, json)
            }
            Command::UploadFile(args) => {
                let payload = read_payload(&args.path).await?;
                let filename = args.filename.or_else(|| file_name(&args.path));
                let mimetype = args.mimetype.or_else(|| guess_mimetype(&args.path));
                let options = build_options(args.folder, filename, mimetype);

                events.emit(AppEvent::UploadStarted {
                    target: args.path.display().to_string(),
                    bytes: payload.len(),
                });
                let result = provider.upload_file(payload, options).await?;
                report_upload(result, events, json)
            }
            Command::Delete(args) => {
                provider.delete(&args.public_id, args.kind).await?;

                if json {
                    let output = serde_json::json!({
                        "deleted": args.public_id,
                        "kind": args.kind,
                    });
                    println!("{}", serde_json::to_string_pretty(&output)?);
                } else {
                    events.emit(AppEvent::AssetDeleted {
                        public_id: args.public_id,
                        kind: args.kind.to_string(),
                    });
                }
                Ok(())
            }
        }
    }
}

async fn read_payload(path: &Path) -> Result<Bytes> {
    let data = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(Bytes::from(data))
}

fn build_options(
    folder: Option<String>,
    filename: Option<String>,
    mimetype: Option<String>,
) -> UploadOptions {
    UploadOptions {
        folder,
        filename,
        mimetype,
    }
}

fn report_upload(result: UploadResult, events: &Arc<EventBus>, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        events.emit(AppEvent::UploadCompleted {
            url: result.url,
            public_id: result.public_id,
        });
    }
    Ok(())
}

fn file_stem(path: &Path) -> Option<String> {
    path.file_stem().map(|s| s.to_string_lossy().to_string())
}

fn file_name(path: &Path) -> Option<String> {
    path.file_name().map(|s| s.to_string_lossy().to_string())
}

fn guess_mimetype(path: &Path) -> Option<String> {
    mime_guess::from_path(path).first().map(|m| m.essence_str().to_string())
}
