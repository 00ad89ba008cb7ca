use thiserror::Error;

/// Validation and contract errors exposed by `solvency-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("symbol cannot be empty")]
    EmptySymbol,

    #[error("invalid source '{value}', expected one of yahoo, fixture")]
    InvalidSource { value: String },
    #[error("invalid report frequency '{value}', expected annual or quarterly")]
    InvalidFrequency { value: String },

    #[error("period date must be YYYY-MM-DD: '{value}'")]
    InvalidPeriodDate { value: String },
    #[error("balance sheet has more than one column for period {date}")]
    DuplicatePeriod { date: String },
    #[error("line item '{field}' must be finite")]
    NonFiniteValue { field: String },
    #[error("line item name cannot be empty")]
    EmptyLineItem,

    #[error("request_id must be at least 8 characters")]
    InvalidRequestId,
    #[error("schema_version must match vMAJOR.MINOR.PATCH: '{value}'")]
    InvalidSchemaVersion { value: String },
    #[error("source_chain must contain at least one source")]
    EmptySourceChain,

    #[error("error code cannot be empty")]
    EmptyErrorCode,
    #[error("error message cannot be empty")]
    EmptyErrorMessage,
}

/// Top-level error type for core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
