//! hgm - command-line front end for sweep-based Hammerstein group model
//! identification.

mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hgm")]
#[command(author, version, about = "Hammerstein group model identification", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the synchronized sweep to play through the device
    Excite(commands::excite::ExciteArgs),

    /// Identify a model from a recorded sweep response
    Identify(commands::identify::IdentifyArgs),

    /// Run an audio file through an identified model
    Simulate(commands::simulate::SimulateArgs),

    /// Show information about a WAV or model file
    Info(commands::info::InfoArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Excite(args) => commands::excite::run(args),
        Commands::Identify(args) => commands::identify::run(args),
        Commands::Simulate(args) => commands::simulate::run(args),
        Commands::Info(args) => commands::info::run(args),
    }
}
