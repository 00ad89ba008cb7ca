//! # Solvency Ratios
//!
//! Each ratio is a three-stage pipeline over a [`BalanceSheetSource`]:
//! fetch the snapshot, read line items from the most recent column (absent
//! items read as zero), divide and round to two decimals.
//!
//! | Ratio | Numerator | Denominator |
//! |-------|-----------|-------------|
//! | [`debt_to_equity`] | Short Long Term Debt + Long Term Debt | Stockholders Equity |
//! | [`quick_ratio`] | Total Current Assets - Inventory | Total Current Liabilities |
//!
//! Failures come back as a [`RatioError`] whose `Display` is the
//! human-readable message and whose [`RatioErrorKind`] classifies the cause.

mod debt_to_equity;
mod quick_ratio;

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::data_source::{
    BalanceSheetRequest, BalanceSheetSource, ReportFrequency, SourceError, SourceErrorKind,
};
use crate::{BalanceSheetColumn, Symbol};

pub use debt_to_equity::{debt_to_equity, debt_to_equity_with_frequency, DebtToEquityReport};
pub use quick_ratio::{quick_ratio, quick_ratio_with_frequency, QuickRatioReport};

/// The ratios this crate computes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatioKind {
    DebtToEquity,
    QuickRatio,
}

impl RatioKind {
    /// Name used in user-facing messages.
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::DebtToEquity => "Debt to Equity ratio",
            Self::QuickRatio => "Quick Ratio",
        }
    }

    pub const fn denominator_label(self) -> &'static str {
        match self {
            Self::DebtToEquity => "Total Equity",
            Self::QuickRatio => "Current Liabilities",
        }
    }

    /// Agent tool name.
    pub const fn tool_name(self) -> &'static str {
        match self {
            Self::DebtToEquity => "debt_to_equity_ratio",
            Self::QuickRatio => "quick_ratio",
        }
    }
}

impl Display for RatioKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Why a ratio could not be produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatioErrorKind {
    /// The provider returned an empty snapshot.
    NotFound,
    /// The denominator line item is exactly zero.
    DegenerateDenominator,
    ProviderUnavailable,
    MalformedData,
    /// Blank symbol, or the provider refused the request.
    InvalidRequest,
}

impl RatioErrorKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::DegenerateDenominator => "degenerate_denominator",
            Self::ProviderUnavailable => "provider_unavailable",
            Self::MalformedData => "malformed_data",
            Self::InvalidRequest => "invalid_request",
        }
    }

    pub const fn code(self) -> &'static str {
        match self {
            Self::NotFound => "ratio.not_found",
            Self::DegenerateDenominator => "ratio.degenerate_denominator",
            Self::ProviderUnavailable => "ratio.provider_unavailable",
            Self::MalformedData => "ratio.malformed_data",
            Self::InvalidRequest => "ratio.invalid_request",
        }
    }
}

impl From<SourceErrorKind> for RatioErrorKind {
    fn from(kind: SourceErrorKind) -> Self {
        match kind {
            SourceErrorKind::Unavailable
            | SourceErrorKind::RateLimited
            | SourceErrorKind::Internal => Self::ProviderUnavailable,
            SourceErrorKind::Malformed => Self::MalformedData,
            SourceErrorKind::InvalidRequest => Self::InvalidRequest,
        }
    }
}

impl Display for RatioErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure half of a ratio result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatioError {
    ratio: RatioKind,
    symbol: String,
    kind: RatioErrorKind,
    detail: Option<String>,
    retryable: bool,
}

impl RatioError {
    pub fn not_found(ratio: RatioKind, symbol: impl Into<String>) -> Self {
        Self {
            ratio,
            symbol: symbol.into(),
            kind: RatioErrorKind::NotFound,
            detail: None,
            retryable: false,
        }
    }

    pub fn degenerate_denominator(ratio: RatioKind, symbol: impl Into<String>) -> Self {
        Self {
            ratio,
            symbol: symbol.into(),
            kind: RatioErrorKind::DegenerateDenominator,
            detail: None,
            retryable: false,
        }
    }

    pub fn invalid_request(
        ratio: RatioKind,
        symbol: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            ratio,
            symbol: symbol.into(),
            kind: RatioErrorKind::InvalidRequest,
            detail: Some(detail.into()),
            retryable: false,
        }
    }

    pub fn from_source(ratio: RatioKind, symbol: impl Into<String>, error: &SourceError) -> Self {
        Self {
            ratio,
            symbol: symbol.into(),
            kind: error.kind().into(),
            detail: Some(error.message().to_owned()),
            retryable: error.retryable(),
        }
    }

    pub const fn ratio(&self) -> RatioKind {
        self.ratio
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub const fn kind(&self) -> RatioErrorKind {
        self.kind
    }

    /// Underlying cause, when the failure came from below the ratio layer.
    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }

    pub const fn retryable(&self) -> bool {
        self.retryable
    }

    pub const fn code(&self) -> &'static str {
        self.kind.code()
    }
}

impl Display for RatioError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = self.ratio.display_name();
        match self.kind {
            RatioErrorKind::NotFound => write!(
                f,
                "Could not retrieve balance sheet data for {}",
                self.symbol
            ),
            RatioErrorKind::DegenerateDenominator => write!(
                f,
                "Cannot calculate {name} for {} - {} is 0",
                self.symbol,
                self.ratio.denominator_label()
            ),
            _ => write!(
                f,
                "Error calculating {name} for {}: {}",
                self.symbol,
                self.detail.as_deref().unwrap_or(self.kind.as_str())
            ),
        }
    }
}

impl std::error::Error for RatioError {}

/// Rounds half away from zero to two decimal places.
pub fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Fetches the snapshot and returns its most recent column.
async fn latest_column<S>(
    source: &S,
    ratio: RatioKind,
    symbol: &str,
    frequency: ReportFrequency,
) -> Result<(Symbol, BalanceSheetColumn), RatioError>
where
    S: BalanceSheetSource + ?Sized,
{
    let symbol = Symbol::parse(symbol)
        .map_err(|error| RatioError::invalid_request(ratio, symbol, error.to_string()))?;

    debug!(%symbol, ratio = ratio.tool_name(), source = %source.id(), "fetching balance sheet");
    let sheet = source
        .balance_sheet(BalanceSheetRequest::new(symbol.clone(), frequency))
        .await
        .map_err(|error| {
            warn!(%symbol, ratio = ratio.tool_name(), error = %error, "balance sheet fetch failed");
            RatioError::from_source(ratio, symbol.as_str(), &error)
        })?;

    if sheet.is_empty() {
        debug!(%symbol, "provider returned an empty balance sheet");
        return Err(RatioError::not_found(ratio, symbol.as_str()));
    }

    let column = sheet
        .latest()
        .cloned()
        .ok_or_else(|| RatioError::not_found(ratio, symbol.as_str()))?;
    debug!(%symbol, period_end = %column.period_end, items = column.len(), "using latest column");

    Ok((symbol, column))
}
