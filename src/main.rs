use std::io;
use std::process::ExitCode;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mkctl::config::Config;
use mkctl::interface::cli::{run, Cli};

#[tokio::main]
async fn main() -> ExitCode {
    // Load configuration
    let config = Config::from_env();

    // Initialize logging; stdout is reserved for JSON output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("mkctl={}", config.log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr).with_target(false))
        .init();

    let cli = Cli::parse();
    debug!("mkctl v{}, configuration: {:?}", env!("CARGO_PKG_VERSION"), config);

    // First Ctrl-C stops bulk operations between items, a second one exits
    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_err() {
            return;
        }
        warn!("Interrupt received, stopping after the current request");
        on_signal.cancel();

        if tokio::signal::ctrl_c().await.is_ok() {
            std::process::exit(130);
        }
    });

    match run(cli, &config, &cancel).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
