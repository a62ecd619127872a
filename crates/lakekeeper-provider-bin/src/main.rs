#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub,
    clippy::pedantic
)]
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};
use lakekeeper_provider::{Provider, ProviderConfig};
use tracing_subscriber::{EnvFilter, filter::LevelFilter};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the provider until the plugin host closes the channel
    Serve {},
    /// Print the version of the provider
    Version {},
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .json()
        .flatten_event(true)
        .with_current_span(true)
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Version {}) => {
            println!("{VERSION}");
        }
        Some(Commands::Serve {}) | None => {
            serve().await?;
        }
    }

    Ok(())
}

/// Serve requests until the host hangs up.
///
/// The provider process is owned by the engine's plugin host: it is
/// spawned with the host channel on stdin and must exit once that
/// channel closes or the process is signalled.
async fn serve() -> anyhow::Result<()> {
    let provider = Provider::new(ProviderConfig::default());
    tracing::info!(
        version = VERSION,
        resources = provider.resource_names().count(),
        data_sources = provider.data_source_names().count(),
        "provider ready"
    );

    tokio::select! {
        r = wait_for_host_close() => r?,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("interrupted, shutting down");
        }
    }
    Ok(())
}

async fn wait_for_host_close() -> anyhow::Result<()> {
    use tokio::io::AsyncReadExt;

    let mut stdin = tokio::io::stdin();
    let mut buf = [0u8; 4096];
    loop {
        let read = stdin.read(&mut buf).await?;
        if read == 0 {
            tracing::info!("host channel closed, shutting down");
            return Ok(());
        }
    }
}
