use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] solvency_core::ValidationError),

    #[error("provider setup failed: {0}")]
    Provider(#[from] solvency_core::SourceError),

    #[error(transparent)]
    Agent(#[from] solvency_agent::AgentError),

    #[error("strict mode failed: warnings={warning_count}, errors={error_count}")]
    StrictModeViolation {
        warning_count: usize,
        error_count: usize,
    },

    #[error("invalid log filter: {0}")]
    Logging(String),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            Self::Logging(_) => 2,
            Self::Agent(_) => 2,
            Self::Provider(_) => 3,
            Self::Serialization(_) => 4,
            Self::StrictModeViolation { .. } => 5,
            Self::Io(_) => 10,
        }
    }
}
