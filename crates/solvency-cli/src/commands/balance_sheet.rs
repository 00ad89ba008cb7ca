use std::collections::BTreeMap;
use std::time::Instant;

use serde::Serialize;
use serde_json::Value;
use solvency_core::{
    BalanceSheetRequest, BalanceSheetSource, EnvelopeError, PeriodDate, ReportFrequency, Symbol,
};

use crate::cli::SymbolArgs;
use crate::error::CliError;

use super::{elapsed_ms, CommandResult};

#[derive(Debug, Serialize)]
struct BalanceSheetResponseData<'a> {
    symbol: &'a Symbol,
    frequency: ReportFrequency,
    period_end: PeriodDate,
    items: BTreeMap<&'a str, f64>,
}

pub async fn run(
    args: &SymbolArgs,
    source: &dyn BalanceSheetSource,
    frequency: ReportFrequency,
) -> Result<CommandResult, CliError> {
    let symbol = Symbol::parse(&args.symbol)?;
    let request = BalanceSheetRequest::new(symbol.clone(), frequency);

    let started = Instant::now();
    let fetched = source.balance_sheet(request).await;
    let latency_ms = elapsed_ms(started);

    let sheet = match fetched {
        Ok(sheet) => sheet,
        Err(error) => {
            let envelope_error = EnvelopeError::new(error.code(), error.message())?
                .with_retryable(error.retryable())
                .with_source(source.id());
            return Ok(CommandResult::ok(Value::Null, vec![source.id()])
                .with_error(envelope_error)
                .with_latency(latency_ms));
        }
    };

    let Some(column) = sheet.latest().filter(|column| !column.is_empty()) else {
        return Ok(CommandResult::ok(Value::Null, vec![source.id()])
            .with_warning(format!("no balance sheet data for {symbol}"))
            .with_latency(latency_ms));
    };

    let data = serde_json::to_value(BalanceSheetResponseData {
        symbol: &symbol,
        frequency,
        period_end: column.period_end,
        items: column.items().collect(),
    })?;

    Ok(CommandResult::ok(data, vec![source.id()]).with_latency(latency_ms))
}
