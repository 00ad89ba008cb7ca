//! Balance-sheet source trait and request/error types.
//!
//! This module defines the adapter contract (`BalanceSheetSource`) every
//! provider implementation follows. Ratio computations only ever talk to a
//! provider through this trait.
//!
//! # Example
//!
//! ```rust,ignore
//! use solvency_core::{BalanceSheetRequest, BalanceSheetSource, Symbol, YahooAdapter};
//!
//! async fn latest_equity(adapter: &YahooAdapter) -> Result<f64, SourceError> {
//!     let request = BalanceSheetRequest::annual(Symbol::parse("AAPL")?);
//!     let sheet = adapter.balance_sheet(request).await?;
//!     Ok(sheet
//!         .latest()
//!         .map(|column| column.value_or_zero(line_items::STOCKHOLDERS_EQUITY))
//!         .unwrap_or_default())
//! }
//! ```

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{BalanceSheet, ProviderId, Symbol, ValidationError};

/// Reporting cadence of the requested statements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportFrequency {
    #[default]
    Annual,
    Quarterly,
}

impl ReportFrequency {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Annual => "annual",
            Self::Quarterly => "quarterly",
        }
    }
}

impl Display for ReportFrequency {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportFrequency {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "annual" => Ok(Self::Annual),
            "quarterly" => Ok(Self::Quarterly),
            other => Err(ValidationError::InvalidFrequency {
                value: other.to_owned(),
            }),
        }
    }
}

/// Adapter-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    Unavailable,
    RateLimited,
    InvalidRequest,
    Malformed,
    Internal,
}

/// Structured source error surfaced by provider adapters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
    retryable: bool,
}

impl SourceError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Unavailable,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::RateLimited,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::InvalidRequest,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Malformed,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Internal,
            message: message.into(),
            retryable: false,
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn retryable(&self) -> bool {
        self.retryable
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::Unavailable => "source.unavailable",
            SourceErrorKind::RateLimited => "source.rate_limited",
            SourceErrorKind::InvalidRequest => "source.invalid_request",
            SourceErrorKind::Malformed => "source.malformed",
            SourceErrorKind::Internal => "source.internal",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

impl From<ValidationError> for SourceError {
    fn from(error: ValidationError) -> Self {
        Self::invalid_request(error.to_string())
    }
}

/// Request payload for balance-sheet endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceSheetRequest {
    pub symbol: Symbol,
    pub frequency: ReportFrequency,
}

impl BalanceSheetRequest {
    pub fn new(symbol: Symbol, frequency: ReportFrequency) -> Self {
        Self { symbol, frequency }
    }

    pub fn annual(symbol: Symbol) -> Self {
        Self::new(symbol, ReportFrequency::Annual)
    }
}

/// Source adapter contract.
///
/// An unknown or delisted symbol is not an error: adapters return an empty
/// [`BalanceSheet`] and leave the interpretation to the caller.
///
/// Implementations must be `Send + Sync` as they may be shared across tasks.
pub trait BalanceSheetSource: Send + Sync {
    /// Returns the unique provider identifier.
    fn id(&self) -> ProviderId;

    /// Fetches the balance-sheet snapshot for one symbol.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if:
    /// - The provider is unreachable or answers with a failure status
    /// - The provider's payload cannot be interpreted
    fn balance_sheet<'a>(
        &'a self,
        req: BalanceSheetRequest,
    ) -> Pin<Box<dyn Future<Output = Result<BalanceSheet, SourceError>> + Send + 'a>>;
}
