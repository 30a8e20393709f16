mod commands;
mod startup;

use clap::Parser;
use tracing::info;

#[tokio::main]
async fn main() -> miette::Result<()> {
    let cli = commands::Cli::parse();

    // Initialize logging
    startup::init_logging()?;

    info!("Starting calnav");

    // Load configuration
    let config = startup::load_config()?;
    let handle = startup::connect(&config)?;

    commands::run(cli.command, &handle).await
}
