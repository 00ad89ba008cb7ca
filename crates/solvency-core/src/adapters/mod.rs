//! Provider adapters implementing [`BalanceSheetSource`](crate::BalanceSheetSource).

mod fixture;
mod yahoo;

pub use fixture::FixtureSource;
pub use yahoo::{YahooAdapter, YahooAuthManager, EMPTY_MOCK_SYMBOL};
