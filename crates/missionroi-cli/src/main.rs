use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod store;

#[derive(Parser)]
#[command(name = "missionroi", version, about = "Mission queue and tradeoff CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Mission queue management
    Mission {
        #[command(subcommand)]
        action: commands::mission::MissionAction,
    },
    /// Today's minute budget
    Budget {
        #[command(subcommand)]
        action: commands::budget::BudgetAction,
    },
    /// Show the current fatigue tier
    Fatigue(commands::fatigue::FatigueArgs),
    /// Rank queued missions against today's capacity
    Prioritize(commands::prioritize::PrioritizeArgs),
    /// Evaluate an opportunity: proceed, pause or reject
    Tradeoff(commands::tradeoff::TradeoffArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

fn init_logging() {
    let filter = std::env::var("MISSIONROI_LOG")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| missionroi_core::Config::load_or_default().logging.level);

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging();

    let result = match cli.command {
        Commands::Mission { action } => commands::mission::run(action),
        Commands::Budget { action } => commands::budget::run(action),
        Commands::Fatigue(args) => commands::fatigue::run(args),
        Commands::Prioritize(args) => commands::prioritize::run(args),
        Commands::Tradeoff(args) => commands::tradeoff::run(args),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "missionroi",
                &mut std::io::stdout(),
            );
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
