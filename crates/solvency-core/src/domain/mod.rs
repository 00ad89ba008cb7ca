//! # Domain Models
//!
//! Canonical domain types for balance-sheet snapshots.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Symbol`] | Provider ticker, kept verbatim |
//! | [`PeriodDate`] | Fiscal period-end date (`YYYY-MM-DD`) |
//! | [`BalanceSheetColumn`] | Named line items for one period |
//! | [`BalanceSheet`] | Columns ordered most-recent-first |
//!
//! Line-item row keys live in [`line_items`].

mod balance_sheet;
mod period;
mod symbol;

pub use balance_sheet::{line_items, BalanceSheet, BalanceSheetColumn};
pub use period::PeriodDate;
pub use symbol::Symbol;
