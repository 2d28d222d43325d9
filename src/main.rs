use anyhow::Result;
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use std::path::PathBuf;

use brandhub::commands::{self, serve::ServeArgs};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Parser)]
#[command(name = "brandhub")]
#[command(version, about = "Content-management API for products, social posts and drafted copy", long_about = None)]
struct Cli {
    /// Path to the configuration file (default: ./brandhub.toml if present)
    #[arg(short, long, global = true, env = "BRANDHUB_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API (default)
    Serve(ServeArgs),

    /// Validate configuration and print the effective settings
    CheckConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.config.as_deref();

    match cli.command.unwrap_or_else(|| Commands::Serve(ServeArgs::default())) {
        Commands::Serve(args) => commands::serve::execute(config, &args).await,
        Commands::CheckConfig => commands::check::execute(config),
    }
}
