//! searchsync command-line client
//!
//! Usage:
//!   searchsync --domain recipes search fritters --rank name --desc
//!   searchsync --domain recipes add recipe_13 --field name=fritters
//!   searchsync --domain recipes remove recipe_13
//!   searchsync --domain recipes batch ops.json
//!
//! `--sandbox` runs every command without touching the network.

use anyhow::Result;
use clap::Parser;
use searchsync_cli::{Cli, run};
use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let log_level = if cli.global.verbose { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.as_str().to_ascii_lowercase()));
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    let mut stdout = std::io::stdout().lock();
    run(cli, &mut stdout).await
}
