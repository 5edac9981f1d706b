use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "ministreak", version, about = "MiniStreak CLI")]
struct Cli {
    /// Pretend today is this UTC date (YYYY-MM-DD)
    #[arg(long, global = true)]
    today: Option<chrono::NaiveDate>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Daily streak tracking
    Streak {
        #[command(subcommand)]
        action: commands::streak::StreakAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    let cli = Cli::parse();

    // RUST_LOG wins when set; otherwise watch logs at info and the rest at warn.
    let default_filter = match &cli.command {
        Commands::Streak {
            action: commands::streak::StreakAction::Watch { .. },
        } => "info",
        _ => "warn",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Streak { action } => commands::streak::run(action, cli.today),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
