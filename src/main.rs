mod bootstrap;

use mediastore_events::{AppEvent, EventBus};
use crate::bootstrap::{cli::Cli, config, logging, storage};
use anyhow::Result;
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    logging::initialize();

    let cli = Cli::parse();

    // JSON output owns stdout, console events are silenced
    let events = EventBus::new(cli.json);
    events.emit(AppEvent::Starting);

    let config = config::load(&cli.config, &events).await?;

    let provider = storage::initialize(&config).await?;
    events.emit(AppEvent::ProviderReady {
        backend: provider.name().to_string(),
    });

    if let Err(e) = cli.command.run(provider, &events, cli.json).await {
        events.emit(AppEvent::Error {
            context: "mediastore".to_string(),
            error: e.to_string(),
        });
        return Err(e);
    }

    Ok(())
}
