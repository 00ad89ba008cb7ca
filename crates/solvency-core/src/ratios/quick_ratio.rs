use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{latest_column, round_to_cents, RatioError, RatioKind};
use crate::data_source::{BalanceSheetSource, ReportFrequency};
use crate::domain::line_items;
use crate::{BalanceSheetColumn, PeriodDate, Symbol};

/// Quick Ratio result for one symbol and period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuickRatioReport {
    pub symbol: Symbol,
    /// Total Current Assets - Inventory.
    pub quick_assets: f64,
    pub current_liabilities: f64,
    pub quick_ratio: f64,
    pub date: PeriodDate,
}

impl QuickRatioReport {
    pub fn from_column(symbol: Symbol, column: &BalanceSheetColumn) -> Result<Self, RatioError> {
        let quick_assets = column.value_or_zero(line_items::TOTAL_CURRENT_ASSETS)
            - column.value_or_zero(line_items::INVENTORY);
        let current_liabilities = column.value_or_zero(line_items::TOTAL_CURRENT_LIABILITIES);

        if current_liabilities == 0.0 {
            debug!(%symbol, period_end = %column.period_end, "current liabilities are zero");
            return Err(RatioError::degenerate_denominator(
                RatioKind::QuickRatio,
                symbol.as_str(),
            ));
        }

        Ok(Self {
            quick_ratio: round_to_cents(quick_assets / current_liabilities),
            quick_assets,
            current_liabilities,
            date: column.period_end,
            symbol,
        })
    }
}

/// Quick Ratio from the latest annual balance sheet.
pub async fn quick_ratio<S>(source: &S, symbol: &str) -> Result<QuickRatioReport, RatioError>
where
    S: BalanceSheetSource + ?Sized,
{
    quick_ratio_with_frequency(source, symbol, ReportFrequency::Annual).await
}

pub async fn quick_ratio_with_frequency<S>(
    source: &S,
    symbol: &str,
    frequency: ReportFrequency,
) -> Result<QuickRatioReport, RatioError>
where
    S: BalanceSheetSource + ?Sized,
{
    let (symbol, column) = latest_column(source, RatioKind::QuickRatio, symbol, frequency).await?;
    let report = QuickRatioReport::from_column(symbol, &column)?;
    info!(
        symbol = %report.symbol,
        ratio = report.quick_ratio,
        date = %report.date,
        "computed quick ratio"
    );
    Ok(report)
}
