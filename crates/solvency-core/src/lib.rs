//! Core contracts for solvency.
//!
//! This crate contains:
//! - Canonical balance-sheet models and validation
//! - Provider identifiers and the `BalanceSheetSource` adapter contract
//! - Yahoo Finance and in-memory adapters
//! - Debt-to-Equity and Quick Ratio computations
//! - Response envelope and structured errors
//!
//! # Example
//!
//! ```rust,ignore
//! use solvency_core::{quick_ratio, YahooAdapter};
//!
//! let adapter = YahooAdapter::default(); // mock mode, no network
//! match quick_ratio(&adapter, "MSFT").await {
//!     Ok(report) => println!("{} {}", report.quick_ratio, report.date),
//!     Err(error) => eprintln!("{error} ({})", error.code()),
//! }
//! ```

pub mod adapters;
pub mod config;
pub mod data_source;
pub mod domain;
pub mod envelope;
pub mod error;
pub mod http_client;
pub mod ratios;
pub mod source;

pub use adapters::{FixtureSource, YahooAdapter, YahooAuthManager, EMPTY_MOCK_SYMBOL};
pub use config::{ProviderConfig, YAHOO_COOKIE_ENV};
pub use data_source::{
    BalanceSheetRequest, BalanceSheetSource, ReportFrequency, SourceError, SourceErrorKind,
};
pub use domain::{line_items, BalanceSheet, BalanceSheetColumn, PeriodDate, Symbol};
pub use envelope::{Envelope, EnvelopeError, EnvelopeMeta, SCHEMA_VERSION};
pub use error::{CoreError, ValidationError};
pub use http_client::{
    HttpAuth, HttpClient, HttpError, HttpRequest, HttpResponse, NoopHttpClient,
    ReqwestHttpClient,
};
pub use ratios::{
    debt_to_equity, debt_to_equity_with_frequency, quick_ratio, quick_ratio_with_frequency,
    round_to_cents, DebtToEquityReport, QuickRatioReport, RatioError, RatioErrorKind, RatioKind,
};
pub use source::ProviderId;
