//! Tululu-Fetch main entry point
//!
//! This is the command-line interface for downloading a range of books from
//! the catalog. Configuration comes from the environment (and `.env`).

use anyhow::Context;
use clap::Parser;
use tululu_fetch::catalog::run_range;
use tululu_fetch::config::load_config;
use tracing_subscriber::EnvFilter;

/// Tululu-Fetch: download books and covers from the tululu.org catalog
///
/// Fetches the detail page of every book id in the range, saves its cover
/// image and plain text, and prints a short summary per book. Ids that do
/// not exist or fail to download are logged and skipped.
#[derive(Parser, Debug)]
#[command(name = "tululu-fetch")]
#[command(version)]
#[command(about = "Download books from tululu.org", long_about = None)]
struct Cli {
    /// ID of the first book to download
    #[arg(default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
    start_id: u64,

    /// ID of the last book to download (inclusive)
    #[arg(default_value_t = 10, value_parser = clap::value_parser!(u64).range(1..))]
    end_id: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging();

    let config = load_config().context("Failed to load configuration")?;
    tracing::debug!("Configuration: {:?}", config);

    run_range(config, cli.start_id, cli.end_id)
        .await
        .context("Download run failed to start")?;

    Ok(())
}

/// Sets up the tracing subscriber; `RUST_LOG` overrides the default filter
fn setup_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("tululu_fetch=info,warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
