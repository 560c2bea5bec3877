mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Prune(args) => commands::prune(cli.settings, args).await?,
        Commands::Inspect(args) => commands::inspect(cli.settings, args)?,
        Commands::Settings => commands::settings(cli.settings)?,
    }

    Ok(())
}
