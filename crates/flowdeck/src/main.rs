//! flowdeck CLI binary.

use anyhow::Result;
use flowdeck::cli::Cli;
use tracing_subscriber::EnvFilter;

/// Main entry point for the flowdeck CLI.
///
/// Uses tokio's `current_thread` runtime: commands are sequential and I/O bound.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Controlled via RUST_LOG, e.g. RUST_LOG=flowdeck=debug,flowdeck_jsonl=trace
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("flowdeck=info,flowdeck_jsonl=info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("Starting flowdeck CLI");

    let cli = Cli::parse_args();
    if let Err(e) = cli.execute().await {
        tracing::debug!(error = ?e, "Command failed");
        return Err(e);
    }

    tracing::debug!("flowdeck CLI completed successfully");
    Ok(())
}
