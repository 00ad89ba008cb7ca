use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{latest_column, round_to_cents, RatioError, RatioKind};
use crate::data_source::{BalanceSheetSource, ReportFrequency};
use crate::domain::line_items;
use crate::{BalanceSheetColumn, PeriodDate, Symbol};

/// Debt-to-Equity result for one symbol and period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebtToEquityReport {
    pub symbol: Symbol,
    /// Short Long Term Debt + Long Term Debt.
    pub total_debt: f64,
    pub total_equity: f64,
    /// `total_debt / total_equity`, rounded to two decimals.
    pub debt_to_equity_ratio: f64,
    /// Period end of the column every input was read from.
    pub date: PeriodDate,
}

impl DebtToEquityReport {
    /// Computes the ratio from a single balance-sheet column.
    pub fn from_column(symbol: Symbol, column: &BalanceSheetColumn) -> Result<Self, RatioError> {
        let total_debt = column.value_or_zero(line_items::SHORT_LONG_TERM_DEBT)
            + column.value_or_zero(line_items::LONG_TERM_DEBT);
        let total_equity = column.value_or_zero(line_items::STOCKHOLDERS_EQUITY);

        if total_equity == 0.0 {
            debug!(%symbol, period_end = %column.period_end, "total equity is zero");
            return Err(RatioError::degenerate_denominator(
                RatioKind::DebtToEquity,
                symbol.as_str(),
            ));
        }

        Ok(Self {
            debt_to_equity_ratio: round_to_cents(total_debt / total_equity),
            total_debt,
            total_equity,
            date: column.period_end,
            symbol,
        })
    }
}

/// Debt-to-Equity from the latest annual balance sheet.
pub async fn debt_to_equity<S>(source: &S, symbol: &str) -> Result<DebtToEquityReport, RatioError>
where
    S: BalanceSheetSource + ?Sized,
{
    debt_to_equity_with_frequency(source, symbol, ReportFrequency::Annual).await
}

pub async fn debt_to_equity_with_frequency<S>(
    source: &S,
    symbol: &str,
    frequency: ReportFrequency,
) -> Result<DebtToEquityReport, RatioError>
where
    S: BalanceSheetSource + ?Sized,
{
    let (symbol, column) = latest_column(source, RatioKind::DebtToEquity, symbol, frequency).await?;
    let report = DebtToEquityReport::from_column(symbol, &column)?;
    info!(
        symbol = %report.symbol,
        ratio = report.debt_to_equity_ratio,
        date = %report.date,
        "computed debt to equity"
    );
    Ok(report)
}
