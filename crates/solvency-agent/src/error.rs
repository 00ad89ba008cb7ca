use solvency_core::ValidationError;
use thiserror::Error;

/// Errors raised by the agent tool surface itself.
///
/// Ratio failures are not errors at this level: they travel inside
/// [`ToolOutput::Failure`](crate::ToolOutput::Failure).
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("unknown tool '{name}'")]
    UnknownTool { name: String },

    #[error("tool '{name}' is already registered")]
    DuplicateTool { name: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}
