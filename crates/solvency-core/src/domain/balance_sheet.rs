use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{PeriodDate, Symbol, ValidationError};

/// Canonical line-item names used as balance-sheet row keys.
pub mod line_items {
    pub const SHORT_LONG_TERM_DEBT: &str = "Short Long Term Debt";
    pub const LONG_TERM_DEBT: &str = "Long Term Debt";
    pub const STOCKHOLDERS_EQUITY: &str = "Stockholders Equity";
    pub const TOTAL_CURRENT_ASSETS: &str = "Total Current Assets";
    pub const INVENTORY: &str = "Inventory";
    pub const TOTAL_CURRENT_LIABILITIES: &str = "Total Current Liabilities";
    pub const TOTAL_ASSETS: &str = "Total Assets";
    pub const TOTAL_LIABILITIES: &str = "Total Liabilities";
    pub const CASH_AND_CASH_EQUIVALENTS: &str = "Cash And Cash Equivalents";
    pub const TOTAL_DEBT: &str = "Total Debt";
}

/// One reporting period: named line items reported as of `period_end`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawColumn")]
pub struct BalanceSheetColumn {
    pub period_end: PeriodDate,
    items: BTreeMap<String, f64>,
}

#[derive(Deserialize)]
struct RawColumn {
    period_end: PeriodDate,
    #[serde(default)]
    items: BTreeMap<String, f64>,
}

impl TryFrom<RawColumn> for BalanceSheetColumn {
    type Error = ValidationError;

    fn try_from(raw: RawColumn) -> Result<Self, Self::Error> {
        let mut column = Self::new(raw.period_end);
        for (name, value) in raw.items {
            column.insert(name, value)?;
        }
        Ok(column)
    }
}

impl BalanceSheetColumn {
    pub fn new(period_end: PeriodDate) -> Self {
        Self {
            period_end,
            items: BTreeMap::new(),
        }
    }

    pub fn with_item(mut self, name: impl Into<String>, value: f64) -> Result<Self, ValidationError> {
        self.insert(name, value)?;
        Ok(self)
    }

    /// Sets a line item, replacing any earlier value under the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: f64) -> Result<(), ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyLineItem);
        }
        if !value.is_finite() {
            return Err(ValidationError::NonFiniteValue { field: name });
        }

        self.items.insert(name, value);
        Ok(())
    }

    /// Reported value, or `None` when the provider did not report the item.
    pub fn value(&self, name: &str) -> Option<f64> {
        self.items.get(name).copied()
    }

    /// Reported value, defaulting to `0.0` when the item is absent.
    ///
    /// A missing item and an item reported as zero are indistinguishable
    /// through this accessor; use [`value`](Self::value) when it matters.
    pub fn value_or_zero(&self, name: &str) -> f64 {
        self.value(name).unwrap_or(0.0)
    }

    pub fn items(&self) -> impl Iterator<Item = (&str, f64)> {
        self.items.iter().map(|(name, value)| (name.as_str(), *value))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Balance-sheet snapshot: dated columns ordered most-recent-first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceSheet {
    pub symbol: Symbol,
    columns: Vec<BalanceSheetColumn>,
}

impl BalanceSheet {
    /// Builds a snapshot, sorting columns newest first.
    pub fn new(symbol: Symbol, mut columns: Vec<BalanceSheetColumn>) -> Result<Self, ValidationError> {
        columns.sort_by(|left, right| right.period_end.cmp(&left.period_end));

        if let Some(pair) = columns
            .windows(2)
            .find(|pair| pair[0].period_end == pair[1].period_end)
        {
            return Err(ValidationError::DuplicatePeriod {
                date: pair[0].period_end.to_string(),
            });
        }

        Ok(Self { symbol, columns })
    }

    pub fn empty(symbol: Symbol) -> Self {
        Self {
            symbol,
            columns: Vec::new(),
        }
    }

    /// True when no column carries any line item.
    pub fn is_empty(&self) -> bool {
        self.columns.iter().all(BalanceSheetColumn::is_empty)
    }

    /// Most recent reporting period.
    pub fn latest(&self) -> Option<&BalanceSheetColumn> {
        self.columns.first()
    }

    pub fn columns(&self) -> &[BalanceSheetColumn] {
        &self.columns
    }
}
