use tracing_subscriber::EnvFilter;

use crate::error::CliError;

/// Preferred filter variable; `RUST_LOG` is consulted when it is unset.
pub const LOG_ENV: &str = "SOLVENCY_LOG";

const DEFAULT_DIRECTIVE: &str = "warn";

/// Installs the global fmt subscriber writing to stderr, keeping stdout
/// free for command output.
pub fn init(log_level: Option<&str>) -> Result<(), CliError> {
    let filter = build_filter(log_level, std::env::var(LOG_ENV).ok(), std::env::var("RUST_LOG").ok())?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|error| CliError::Logging(error.to_string()))
}

fn build_filter(
    flag: Option<&str>,
    solvency_log: Option<String>,
    rust_log: Option<String>,
) -> Result<EnvFilter, CliError> {
    let directive = flag
        .map(str::to_owned)
        .or(solvency_log)
        .or(rust_log)
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| String::from(DEFAULT_DIRECTIVE));

    EnvFilter::try_new(&directive).map_err(|error| CliError::Logging(format!("{directive}: {error}")))
}
