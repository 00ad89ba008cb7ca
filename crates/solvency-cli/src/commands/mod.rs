mod balance_sheet;
mod ratio;
mod tools;

use std::sync::Arc;

use serde_json::Value;
use solvency_agent::{EnvelopeBuilder, ToolRegistry};
use solvency_core::{
    BalanceSheetSource, Envelope, EnvelopeError, ProviderConfig, ProviderId, RatioKind,
    ReportFrequency, YahooAdapter, SCHEMA_VERSION,
};

use crate::cli::{Cli, Command};
use crate::error::CliError;

const MOCK_WARNING: &str = "mock mode: balance sheets are synthetic";

pub struct CommandResult {
    pub data: Value,
    pub warnings: Vec<String>,
    pub errors: Vec<EnvelopeError>,
    pub latency_ms: u64,
    pub source_chain: Vec<ProviderId>,
}

impl CommandResult {
    pub fn ok(data: Value, source_chain: Vec<ProviderId>) -> Self {
        Self {
            data,
            warnings: Vec::new(),
            errors: Vec::new(),
            latency_ms: 0,
            source_chain,
        }
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    pub fn with_error(mut self, error: EnvelopeError) -> Self {
        self.errors.push(error);
        self
    }

    pub fn with_latency(mut self, latency_ms: u64) -> Self {
        self.latency_ms = latency_ms;
        self
    }
}

pub async fn run(cli: &Cli) -> Result<Envelope<Value>, CliError> {
    let config = ProviderConfig::from_env()
        .with_timeout_ms(cli.timeout_ms)
        .with_mock(cli.mock)
        .with_frequency(ReportFrequency::from(cli.frequency));

    let adapter = Arc::new(YahooAdapter::from_config(&config)?);
    let mock_warning = adapter.is_mock().then(|| String::from(MOCK_WARNING));
    execute(cli, adapter, mock_warning).await
}

/// Runs the parsed command against `source` and assembles the envelope.
async fn execute(
    cli: &Cli,
    source: Arc<dyn BalanceSheetSource>,
    mock_warning: Option<String>,
) -> Result<Envelope<Value>, CliError> {
    let frequency = ReportFrequency::from(cli.frequency);
    let registry = ToolRegistry::with_solvency_tools(Arc::clone(&source), frequency);

    let command_result = match &cli.command {
        Command::DebtToEquity(args) => {
            ratio::run(RatioKind::DebtToEquity, args, &registry, source.id()).await?
        }
        Command::QuickRatio(args) => {
            ratio::run(RatioKind::QuickRatio, args, &registry, source.id()).await?
        }
        Command::BalanceSheet(args) => {
            balance_sheet::run(args, source.as_ref(), frequency).await?
        }
        Command::Tools => tools::run(&registry, source.id())?,
    };

    let CommandResult {
        data,
        mut warnings,
        errors,
        latency_ms,
        source_chain,
    } = command_result;

    if !matches!(cli.command, Command::Tools) {
        warnings.extend(mock_warning);
    }

    let mut builder = EnvelopeBuilder::new(SCHEMA_VERSION)
        .with_source_chain(source_chain)
        .with_data(data)
        .with_latency_ms(latency_ms);
    for warning in warnings {
        builder = builder.with_warning(warning);
    }
    for error in errors {
        builder = builder.with_error(error);
    }

    Ok(builder.build()?)
}

fn elapsed_ms(started: std::time::Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}
