mod commands;
mod summary;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "centermark", about = "Label-map center-of-mass locator")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show NRRD volume metadata
    Info(commands::info::InfoArgs),
    /// Compute the center of mass of one label map
    Center(commands::center::CenterArgs),
    /// Mark the midpoint between two label-map centers
    Locate(commands::locate::LocateArgs),
    /// Print or save a default locate config
    Config(commands::config::ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match &cli.command {
        Commands::Info(args) => commands::info::run(args),
        Commands::Center(args) => commands::center::run(args),
        Commands::Locate(args) => commands::locate::run(args),
        Commands::Config(args) => commands::config::run(args),
    }
}
