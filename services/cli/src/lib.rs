mod cli;
mod commands;
mod infra;

use lifecycle_trigger::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
