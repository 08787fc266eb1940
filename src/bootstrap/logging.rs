use tracing_subscriber::EnvFilter;

/// Logs go to stderr so stdout stays clean for `--json` output
pub fn initialize() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
