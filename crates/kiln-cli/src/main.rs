//! kiln - source builds for C/C++ libraries

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use kiln_cli::cmd;
use kiln_cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Create {
            spec,
            options,
            settings,
        } => cmd::create::create(&spec, &options, &settings).await,
        Commands::Info {
            spec,
            options,
            settings,
            json,
        } => cmd::info::info(&spec, &options, &settings, json),
        Commands::List => cmd::list::list(),
        Commands::Clean => cmd::clean::clean(),
    }
}
