use crate::commands::{run_batch, run_decide, BatchArgs, DecideArgs};
use clap::{Parser, Subcommand};
use lifecycle_trigger::config::AppConfig;
use lifecycle_trigger::error::AppError;
use lifecycle_trigger::telemetry;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(
    name = "lifecycle-trigger",
    about = "Decide whether identity lifecycle processes should run for an identity",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evaluate one identity from a JSON snapshot store
    Decide(DecideArgs),
    /// Evaluate every identity in a CSV export
    Batch(BatchArgs),
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    debug!(environment = ?config.environment, "lifecycle trigger configuration loaded");

    match cli.command {
        Command::Decide(args) => run_decide(&config, args),
        Command::Batch(args) => run_batch(&config, args),
    }
}
