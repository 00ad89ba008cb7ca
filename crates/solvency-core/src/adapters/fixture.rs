use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::data_source::{BalanceSheetRequest, BalanceSheetSource, SourceError};
use crate::{BalanceSheet, CoreError, ProviderId};

/// In-memory source serving caller-supplied snapshots.
///
/// Symbols with neither a sheet nor an error answer with an empty snapshot,
/// the same way a provider answers for an unknown ticker.
#[derive(Debug, Default)]
pub struct FixtureSource {
    sheets: HashMap<String, BalanceSheet>,
    errors: HashMap<String, SourceError>,
    calls: AtomicUsize,
}

impl FixtureSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads snapshots from a JSON array of serialized [`BalanceSheet`]s.
    ///
    /// Line items go through the same checks as [`insert`](crate::BalanceSheetColumn::insert);
    /// columns are re-sorted newest first and duplicate periods rejected.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let sheets: Vec<BalanceSheet> = serde_json::from_str(json)?;
        let mut source = Self::new();
        for sheet in sheets {
            let sheet = BalanceSheet::new(sheet.symbol.clone(), sheet.columns().to_vec())?;
            source = source.with_sheet(sheet);
        }
        Ok(source)
    }

    pub fn with_sheet(mut self, sheet: BalanceSheet) -> Self {
        self.sheets.insert(sheet.symbol.as_str().to_owned(), sheet);
        self
    }

    /// Makes every request for `symbol` fail with `error`.
    pub fn with_error(mut self, symbol: impl Into<String>, error: SourceError) -> Self {
        self.errors.insert(symbol.into(), error);
        self
    }

    /// Number of `balance_sheet` calls served so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl BalanceSheetSource for FixtureSource {
    fn id(&self) -> ProviderId {
        ProviderId::Fixture
    }

    fn balance_sheet<'a>(
        &'a self,
        req: BalanceSheetRequest,
    ) -> Pin<Box<dyn Future<Output = Result<BalanceSheet, SourceError>> + Send + 'a>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let key = req.symbol.as_str();

        let result = match (self.errors.get(key), self.sheets.get(key)) {
            (Some(error), _) => Err(error.clone()),
            (None, Some(sheet)) => Ok(sheet.clone()),
            (None, None) => Ok(BalanceSheet::empty(req.symbol.clone())),
        };
        Box::pin(async move { result })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BalanceSheetColumn, PeriodDate, Symbol};

    fn request(symbol: &str) -> BalanceSheetRequest {
        BalanceSheetRequest::annual(Symbol::parse(symbol).expect("symbol"))
    }

    #[tokio::test]
    async fn serves_registered_sheet_and_counts_calls() {
        let symbol = Symbol::parse("AAPL").expect("symbol");
        let column = BalanceSheetColumn::new(PeriodDate::parse("2024-09-28").expect("date"))
            .with_item("Inventory", 7.0)
            .expect("finite");
        let sheet = BalanceSheet::new(symbol, vec![column]).expect("sheet");
        let source = FixtureSource::new().with_sheet(sheet.clone());

        assert_eq!(source.balance_sheet(request("AAPL")).await, Ok(sheet));
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn loads_sheets_from_json_newest_first() {
        let json = r#"[{
            "symbol": "AAPL",
            "columns": [
                {"period_end": "2023-09-30", "items": {"Inventory": 6331.0}},
                {"period_end": "2024-09-28", "items": {"Inventory": 7286.0}}
            ]
        }]"#;
        let source = FixtureSource::from_json(json).expect("valid fixture");

        let sheet = source.balance_sheet(request("AAPL")).await.expect("sheet");
        let latest = sheet.latest().expect("latest");
        assert_eq!(latest.period_end.to_string(), "2024-09-28");
        assert_eq!(latest.value("Inventory"), Some(7286.0));
    }

    #[test]
    fn rejects_invalid_fixture_json() {
        let err = FixtureSource::from_json(r#"[{"symbol": "", "columns": []}]"#)
            .expect_err("must fail");
        assert!(matches!(err, CoreError::Serialization(_)));

        let duplicate = r#"[{"symbol": "AAPL", "columns": [
            {"period_end": "2024-09-28", "items": {}},
            {"period_end": "2024-09-28", "items": {}}
        ]}]"#;
        let err = FixtureSource::from_json(duplicate).expect_err("must fail");
        assert!(matches!(err, CoreError::Validation(_)));

        let blank_item = r#"[{"symbol": "AAPL", "columns": [
            {"period_end": "2024-09-28", "items": {"": 1.0}}
        ]}]"#;
        let err = FixtureSource::from_json(blank_item).expect_err("must fail");
        assert!(matches!(err, CoreError::Serialization(_)));
        assert!(err.to_string().contains("line item name cannot be empty"));
    }

    #[tokio::test]
    async fn unknown_symbol_is_empty_and_errors_take_precedence() {
        let source = FixtureSource::new().with_error("FAIL", SourceError::unavailable("down"));

        let sheet = source.balance_sheet(request("NOPE")).await.expect("empty");
        assert!(sheet.is_empty());

        let error = source.balance_sheet(request("FAIL")).await.expect_err("must fail");
        assert_eq!(error.message(), "down");
        assert_eq!(source.calls(), 2);
    }
}
