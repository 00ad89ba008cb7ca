mod cli;
mod commands;
mod error;
mod logging;
mod output;

use clap::Parser;
use serde_json::Value;
use solvency_core::Envelope;
use std::process::ExitCode;
use tracing::debug;

use crate::cli::Cli;
use crate::error::CliError;

/// Exit code when a ratio or fetch failed and the envelope carries errors.
const EXIT_ENVELOPE_ERRORS: u8 = 3;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::from(error.exit_code())
        }
    }
}

async fn run() -> Result<ExitCode, CliError> {
    let cli = Cli::parse();
    logging::init(cli.log_level.as_deref())?;
    debug!(command = ?cli.command, mock = cli.mock, "starting");

    let envelope = commands::run(&cli).await?;
    output::render(&envelope, cli.format, cli.pretty)?;

    exit_code(&envelope, cli.strict).map(ExitCode::from)
}

/// Exit status for an already rendered envelope.
fn exit_code(envelope: &Envelope<Value>, strict: bool) -> Result<u8, CliError> {
    if strict && (!envelope.meta.warnings.is_empty() || !envelope.errors.is_empty()) {
        return Err(CliError::StrictModeViolation {
            warning_count: envelope.meta.warnings.len(),
            error_count: envelope.errors.len(),
        });
    }

    if envelope.has_errors() {
        return Ok(EXIT_ENVELOPE_ERRORS);
    }

    Ok(0)
}
