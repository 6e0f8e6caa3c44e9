mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "optcheck")]
#[command(about = "Fixture-driven regression harness for optimization passes", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every configured suite and report results
    Run {
        /// Path to the suite table
        #[arg(short, long, default_value = "optcheck.json")]
        config: String,

        /// Emit the report as JSON instead of the human-readable form
        #[arg(long, default_value = "false")]
        json: bool,

        /// Re-apply each passing transformation to its own output and
        /// require a fixed point
        #[arg(long, default_value = "false")]
        check_idempotence: bool,

        /// Per-case evaluation timeout in milliseconds
        #[arg(long, default_value = "10000")]
        timeout_ms: u64,
    },

    /// Print the configured suite table without running anything
    List {
        /// Path to the suite table
        #[arg(short, long, default_value = "optcheck.json")]
        config: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            json,
            check_idempotence,
            timeout_ms,
        } => {
            let all_passed = commands::run(&config, json, check_idempotence, timeout_ms).await?;
            if !all_passed {
                std::process::exit(1);
            }
        }
        Commands::List { config } => {
            commands::list(&config)?;
        }
    }

    Ok(())
}
