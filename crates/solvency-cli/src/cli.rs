//! CLI argument definitions for solvency.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `debt-to-equity` | Debt-to-Equity ratio from the latest balance sheet |
//! | `quick-ratio` | Quick Ratio from the latest balance sheet |
//! | `balance-sheet` | Latest balance-sheet column as reported |
//! | `tools` | Agent tool descriptors |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `json` | Output format (json, table) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--strict` | `false` | Treat warnings and errors as failures |
//! | `--mock` | `false` | Serve deterministic offline data |
//! | `--timeout-ms` | `10000` | Provider request timeout in ms |
//! | `--frequency` | `annual` | Statement cadence (annual, quarterly) |
//! | `--log-level` | unset | Log filter; overrides `SOLVENCY_LOG` / `RUST_LOG` |
//!
//! # Examples
//!
//! ```bash
//! solvency quick-ratio MSFT --pretty
//! solvency debt-to-equity AAPL --format table
//! solvency balance-sheet NVDA --frequency quarterly --mock
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use solvency_core::ReportFrequency;

/// Solvency ratios from provider balance sheets.
#[derive(Debug, Parser)]
#[command(
    name = "solvency",
    author,
    version,
    about = "Debt-to-Equity and Quick Ratio from Yahoo Finance balance sheets"
)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Treat warnings and errors as failures (exit code 5).
    #[arg(long, global = true, default_value_t = false)]
    pub strict: bool,

    /// Serve deterministic synthetic balance sheets instead of calling Yahoo.
    #[arg(long, global = true, default_value_t = false)]
    pub mock: bool,

    /// Provider request timeout in milliseconds.
    #[arg(long, global = true, default_value_t = 10_000)]
    pub timeout_ms: u64,

    /// Statement cadence to read.
    #[arg(long, global = true, value_enum, default_value_t = FrequencyArg::Annual)]
    pub frequency: FrequencyArg,

    /// Log filter directive, e.g. `debug` or `solvency_core=trace`.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Single JSON object output.
    Json,
    /// Human-readable key/value layout.
    Table,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FrequencyArg {
    Annual,
    Quarterly,
}

impl From<FrequencyArg> for ReportFrequency {
    fn from(value: FrequencyArg) -> Self {
        match value {
            FrequencyArg::Annual => Self::Annual,
            FrequencyArg::Quarterly => Self::Quarterly,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Debt-to-Equity ratio (short + long term debt over stockholders equity).
    DebtToEquity(SymbolArgs),
    /// Quick Ratio (current assets less inventory over current liabilities).
    QuickRatio(SymbolArgs),
    /// Print the latest balance-sheet column.
    BalanceSheet(SymbolArgs),
    /// List agent tool descriptors.
    Tools,
}

#[derive(Debug, Clone, Args)]
pub struct SymbolArgs {
    /// Ticker symbol, e.g. AAPL.
    pub symbol: String,
}
