use crate::errors::AppResult;
use clap::{Parser, Subcommand};

pub mod commands;

/// HAWK test data loader
#[derive(Parser)]
#[command(name = "hawk-loader")]
#[command(about = "Load and fetch HAWK LMS/NI test data")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Load one or more files with series-aware selection
    Load(commands::load::LoadCommand),
    /// Dump a whole file with all attributes
    Dump(commands::dump::DumpCommand),
    /// Download test files by id and load them
    Fetch(commands::fetch::FetchCommand),
    /// List lookup table keys
    Keys(commands::keys::KeysCommand),
}

pub async fn run() -> AppResult<()> {
    // Uses RUST_LOG environment variable (defaults to "error" if not set)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("error")),
        )
        .with_writer(std::io::stderr)
        .try_init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Load(command) => command.run(),
        Commands::Dump(command) => command.run(),
        Commands::Fetch(command) => command.run().await,
        Commands::Keys(command) => command.run(),
    }
}
