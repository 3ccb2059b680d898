use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "chronogrid-cli", version, about = "Chronogrid layout CLI")]
pub struct Cli {
    /// Config file to use instead of ~/.config/chronogrid/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pack all-day and multi-day items into lanes
    Lanes(commands::lanes::LanesArgs),
    /// Position the timed items of one day
    Day(commands::day::DayArgs),
    /// Replay a scroll sequence through a day or week window
    Window(commands::window::WindowArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Print shell completions
    Completions(commands::completions::CompletionsArgs),
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_logging();

    let cli = Cli::parse();
    let config = cli.config.as_deref();
    let result = match cli.command {
        Commands::Lanes(args) => commands::lanes::run(args, config),
        Commands::Day(args) => commands::day::run(args, config),
        Commands::Window(args) => commands::window::run(args, config),
        Commands::Config { action } => commands::config::run(action, config),
        Commands::Completions(args) => commands::completions::run(args),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
