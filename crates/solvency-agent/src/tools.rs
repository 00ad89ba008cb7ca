use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde_json::Value;
use solvency_core::{
    debt_to_equity_with_frequency, quick_ratio_with_frequency, BalanceSheetSource, RatioKind,
    ReportFrequency,
};

use crate::tool::{symbol_argument, RatioTool, ToolOutput};

/// `debt_to_equity_ratio` tool.
#[derive(Clone)]
pub struct DebtToEquityTool {
    source: Arc<dyn BalanceSheetSource>,
    frequency: ReportFrequency,
}

impl DebtToEquityTool {
    pub fn new(source: Arc<dyn BalanceSheetSource>) -> Self {
        Self {
            source,
            frequency: ReportFrequency::Annual,
        }
    }

    pub fn with_frequency(mut self, frequency: ReportFrequency) -> Self {
        self.frequency = frequency;
        self
    }
}

impl RatioTool for DebtToEquityTool {
    fn name(&self) -> &'static str {
        RatioKind::DebtToEquity.tool_name()
    }

    fn description(&self) -> &'static str {
        "Calculate the Debt to Equity ratio for a given stock symbol"
    }

    fn run<'a>(&'a self, args: Value) -> Pin<Box<dyn Future<Output = ToolOutput> + Send + 'a>> {
        Box::pin(async move {
            let symbol = match symbol_argument(&args) {
                Ok(symbol) => symbol,
                Err(failure) => return ToolOutput::Failure(failure),
            };
            ToolOutput::from_result(
                debt_to_equity_with_frequency(self.source.as_ref(), symbol, self.frequency).await,
            )
        })
    }
}

/// `quick_ratio` tool.
#[derive(Clone)]
pub struct QuickRatioTool {
    source: Arc<dyn BalanceSheetSource>,
    frequency: ReportFrequency,
}

impl QuickRatioTool {
    pub fn new(source: Arc<dyn BalanceSheetSource>) -> Self {
        Self {
            source,
            frequency: ReportFrequency::Annual,
        }
    }

    pub fn with_frequency(mut self, frequency: ReportFrequency) -> Self {
        self.frequency = frequency;
        self
    }
}

impl RatioTool for QuickRatioTool {
    fn name(&self) -> &'static str {
        RatioKind::QuickRatio.tool_name()
    }

    fn description(&self) -> &'static str {
        "Calculate the Quick Ratio (Acid Test) for a given stock symbol"
    }

    fn run<'a>(&'a self, args: Value) -> Pin<Box<dyn Future<Output = ToolOutput> + Send + 'a>> {
        Box::pin(async move {
            let symbol = match symbol_argument(&args) {
                Ok(symbol) => symbol,
                Err(failure) => return ToolOutput::Failure(failure),
            };
            ToolOutput::from_result(
                quick_ratio_with_frequency(self.source.as_ref(), symbol, self.frequency).await,
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use solvency_core::{
        line_items, BalanceSheet, BalanceSheetColumn, FixtureSource, PeriodDate, RatioErrorKind,
        Symbol,
    };

    fn fixture() -> Arc<FixtureSource> {
        let column = BalanceSheetColumn::new(PeriodDate::parse("2024-09-28").expect("date"))
            .with_item(line_items::LONG_TERM_DEBT, 500.0)
            .and_then(|c| c.with_item(line_items::STOCKHOLDERS_EQUITY, 1000.0))
            .and_then(|c| c.with_item(line_items::TOTAL_CURRENT_ASSETS, 300.0))
            .and_then(|c| c.with_item(line_items::INVENTORY, 50.0))
            .expect("finite");
        let sheet =
            BalanceSheet::new(Symbol::parse("AAPL").expect("symbol"), vec![column]).expect("sheet");
        Arc::new(FixtureSource::new().with_sheet(sheet))
    }

    #[tokio::test]
    async fn debt_to_equity_tool_returns_report_mapping() {
        let tool = DebtToEquityTool::new(fixture());

        let output = tool.run(json!({"symbol": "AAPL"})).await;

        assert_eq!(
            serde_json::to_value(&output).expect("serializable"),
            json!({
                "symbol": "AAPL",
                "total_debt": 500.0,
                "total_equity": 1000.0,
                "debt_to_equity_ratio": 0.5,
                "date": "2024-09-28"
            })
        );
    }

    #[tokio::test]
    async fn quick_ratio_tool_reports_zero_liabilities() {
        let tool = QuickRatioTool::new(fixture());

        let output = tool.run(json!({"symbol": "AAPL"})).await;

        let failure = output.failure().expect("must fail");
        assert_eq!(failure.kind, RatioErrorKind::DegenerateDenominator);
        assert_eq!(
            output.render_text(),
            "Cannot calculate Quick Ratio for AAPL - Current Liabilities is 0"
        );
    }

    #[tokio::test]
    async fn missing_symbol_never_reaches_the_source() {
        let source = fixture();
        let tool = QuickRatioTool::new(source.clone());

        let output = tool.run(json!({"ticker": "AAPL"})).await;

        assert_eq!(
            output.failure().map(|failure| failure.kind),
            Some(RatioErrorKind::InvalidRequest)
        );
        assert_eq!(source.calls(), 0);
    }

    #[test]
    fn descriptors_advertise_symbol_parameter() {
        let descriptor = DebtToEquityTool::new(fixture()).descriptor();
        assert_eq!(descriptor.name, "debt_to_equity_ratio");
        assert_eq!(descriptor.parameters["symbol"]["type"], "string");
        assert_eq!(
            descriptor.parameters["symbol"]["description"],
            "Stock symbol (e.g., AAPL, MSFT)"
        );
    }
}
