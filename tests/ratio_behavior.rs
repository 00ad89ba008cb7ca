//! Behavior-driven tests for the solvency ratio pipeline
//!
//! These tests verify HOW Debt-to-Equity and Quick Ratio behave against a
//! scripted balance-sheet source: guards, rounding, defaults for missing line
//! items, error classification, and request accounting.

use solvency_core::{
    debt_to_equity, line_items, quick_ratio, quick_ratio_with_frequency, BalanceSheet,
    BalanceSheetColumn, FixtureSource, PeriodDate, RatioErrorKind, ReportFrequency, SourceError,
    Symbol, YahooAdapter,
};

fn column(date: &str, items: &[(&str, f64)]) -> BalanceSheetColumn {
    items.iter().fold(
        BalanceSheetColumn::new(PeriodDate::parse(date).expect("valid date")),
        |column, (name, value)| column.with_item(*name, *value).expect("finite value"),
    )
}

fn source_with(symbol: &str, columns: Vec<BalanceSheetColumn>) -> FixtureSource {
    let sheet = BalanceSheet::new(Symbol::parse(symbol).expect("valid symbol"), columns)
        .expect("valid sheet");
    FixtureSource::new().with_sheet(sheet)
}

// =============================================================================
// Debt to Equity
// =============================================================================

#[tokio::test]
async fn when_debt_and_equity_are_reported_ratio_is_their_quotient() {
    // Given: long-term debt 500, no short-term debt, equity 1000
    let source = source_with(
        "AAPL",
        vec![column(
            "2024-09-28",
            &[
                (line_items::LONG_TERM_DEBT, 500.0),
                (line_items::STOCKHOLDERS_EQUITY, 1000.0),
            ],
        )],
    );

    // When
    let report = debt_to_equity(&source, "AAPL").await.expect("ratio");

    // Then
    assert_eq!(report.symbol.as_str(), "AAPL");
    assert_eq!(report.total_debt, 500.0);
    assert_eq!(report.total_equity, 1000.0);
    assert_eq!(report.debt_to_equity_ratio, 0.5);
    assert_eq!(report.date.to_string(), "2024-09-28");
}

#[tokio::test]
async fn when_equity_is_zero_debt_to_equity_reports_guard_message() {
    // Given: equity absent from the latest column
    let source = source_with(
        "ZERO",
        vec![column("2024-06-30", &[(line_items::LONG_TERM_DEBT, 10.0)])],
    );

    // When
    let error = debt_to_equity(&source, "ZERO").await.expect_err("must fail");

    // Then
    assert_eq!(error.kind(), RatioErrorKind::DegenerateDenominator);
    assert_eq!(
        error.to_string(),
        "Cannot calculate Debt to Equity ratio for ZERO - Total Equity is 0"
    );
}

#[tokio::test]
async fn when_ratio_has_many_decimals_it_is_rounded_to_two() {
    // Given: debt / equity = 1.23456
    let source = source_with(
        "RND",
        vec![column(
            "2024-03-31",
            &[
                (line_items::SHORT_LONG_TERM_DEBT, 23_456.0),
                (line_items::LONG_TERM_DEBT, 100_000.0),
                (line_items::STOCKHOLDERS_EQUITY, 100_000.0),
            ],
        )],
    );

    // When
    let report = debt_to_equity(&source, "RND").await.expect("ratio");

    // Then
    assert_eq!(report.debt_to_equity_ratio, 1.23);
    assert_eq!(report.total_debt, 123_456.0);
}

// =============================================================================
// Quick Ratio
// =============================================================================

#[tokio::test]
async fn when_current_liabilities_are_zero_quick_ratio_reports_guard_message() {
    // Given: current assets 300, inventory 50, current liabilities 0
    let source = source_with(
        "XYZ",
        vec![column(
            "2024-12-31",
            &[
                (line_items::TOTAL_CURRENT_ASSETS, 300.0),
                (line_items::INVENTORY, 50.0),
                (line_items::TOTAL_CURRENT_LIABILITIES, 0.0),
            ],
        )],
    );

    // When
    let error = quick_ratio(&source, "XYZ").await.expect_err("must fail");

    // Then
    assert_eq!(error.kind(), RatioErrorKind::DegenerateDenominator);
    assert_eq!(
        error.to_string(),
        "Cannot calculate Quick Ratio for XYZ - Current Liabilities is 0"
    );
}

#[tokio::test]
async fn when_inventory_is_missing_quick_assets_equal_current_assets() {
    // Given
    let source = source_with(
        "SVC",
        vec![column(
            "2024-12-31",
            &[
                (line_items::TOTAL_CURRENT_ASSETS, 480.0),
                (line_items::TOTAL_CURRENT_LIABILITIES, 160.0),
            ],
        )],
    );

    // When
    let report = quick_ratio(&source, "SVC").await.expect("ratio");

    // Then
    assert_eq!(report.quick_assets, 480.0);
    assert_eq!(report.current_liabilities, 160.0);
    assert_eq!(report.quick_ratio, 3.0);
}

#[tokio::test]
async fn when_several_periods_exist_inputs_and_date_come_from_the_latest() {
    // Given: an older column with different figures, passed out of order
    let source = source_with(
        "MSFT",
        vec![
            column(
                "2022-06-30",
                &[
                    (line_items::TOTAL_CURRENT_ASSETS, 10.0),
                    (line_items::TOTAL_CURRENT_LIABILITIES, 100.0),
                ],
            ),
            column(
                "2024-06-30",
                &[
                    (line_items::TOTAL_CURRENT_ASSETS, 400.0),
                    (line_items::INVENTORY, 100.0),
                    (line_items::TOTAL_CURRENT_LIABILITIES, 200.0),
                ],
            ),
        ],
    );

    // When
    let report = quick_ratio(&source, "MSFT").await.expect("ratio");

    // Then
    assert_eq!(report.date.to_string(), "2024-06-30");
    assert_eq!(report.quick_assets, 300.0);
    assert_eq!(report.quick_ratio, 1.5);
}

// =============================================================================
// Failure classification
// =============================================================================

#[tokio::test]
async fn when_snapshot_is_empty_both_ratios_report_not_found() {
    // Given: no data registered for the symbol
    let source = FixtureSource::new();

    // When
    let dte = debt_to_equity(&source, "GHOST").await.expect_err("must fail");
    let quick = quick_ratio(&source, "GHOST").await.expect_err("must fail");

    // Then
    for error in [&dte, &quick] {
        assert_eq!(error.kind(), RatioErrorKind::NotFound);
        assert_eq!(
            error.to_string(),
            "Could not retrieve balance sheet data for GHOST"
        );
    }
}

#[tokio::test]
async fn when_provider_fails_error_message_wraps_underlying_cause() {
    // Given
    let source = FixtureSource::new()
        .with_error("AAPL", SourceError::unavailable("connection reset by peer"));

    // When
    let dte = debt_to_equity(&source, "AAPL").await.expect_err("must fail");
    let quick = quick_ratio(&source, "AAPL").await.expect_err("must fail");

    // Then
    assert_eq!(dte.kind(), RatioErrorKind::ProviderUnavailable);
    assert!(dte.retryable());
    assert_eq!(
        dte.to_string(),
        "Error calculating Debt to Equity ratio for AAPL: connection reset by peer"
    );
    assert_eq!(
        quick.to_string(),
        "Error calculating Quick Ratio for AAPL: connection reset by peer"
    );
}

#[tokio::test]
async fn when_provider_payload_is_malformed_failure_is_classified() {
    // Given
    let source =
        FixtureSource::new().with_error("BAD", SourceError::malformed("expected value at line 1"));

    // When
    let error = quick_ratio(&source, "BAD").await.expect_err("must fail");

    // Then
    assert_eq!(error.kind(), RatioErrorKind::MalformedData);
    assert_eq!(error.code(), "ratio.malformed_data");
}

#[tokio::test]
async fn when_symbol_is_blank_no_request_is_made() {
    // Given
    let source = FixtureSource::new();

    // When
    let error = debt_to_equity(&source, "   ").await.expect_err("must fail");

    // Then
    assert_eq!(error.kind(), RatioErrorKind::InvalidRequest);
    assert_eq!(source.calls(), 0);
}

#[tokio::test]
async fn when_symbol_is_unusual_it_reaches_the_provider_verbatim() {
    // Given: tickers with characters exchanges actually use
    let source = FixtureSource::new();

    // When / Then: each one is fetched and reported as not found by the provider
    for ticker in ["M&M.NS", "BRK/B", "ABCDEFGHIJKLMNOP", " AAPL "] {
        let error = debt_to_equity(&source, ticker).await.expect_err("empty snapshot");
        assert_eq!(error.kind(), RatioErrorKind::NotFound);
        assert_eq!(error.symbol(), ticker);
        assert_eq!(
            error.to_string(),
            format!("Could not retrieve balance sheet data for {ticker}")
        );
    }
    assert_eq!(source.calls(), 4);
}

// =============================================================================
// Request accounting and concurrency
// =============================================================================

#[tokio::test]
async fn each_invocation_issues_exactly_one_request() {
    // Given
    let source = source_with(
        "AAPL",
        vec![column(
            "2024-09-28",
            &[
                (line_items::STOCKHOLDERS_EQUITY, 1.0),
                (line_items::TOTAL_CURRENT_LIABILITIES, 1.0),
            ],
        )],
    );

    // When
    debt_to_equity(&source, "AAPL").await.expect("ratio");
    quick_ratio(&source, "AAPL").await.expect("ratio");
    let _ = debt_to_equity(&source, "MISSING").await;

    // Then
    assert_eq!(source.calls(), 3);
}

#[tokio::test]
async fn ratios_can_run_concurrently_against_one_source() {
    // Given: the mock Yahoo adapter
    let adapter = YahooAdapter::default();

    // When
    let (dte, quick) = tokio::join!(
        debt_to_equity(&adapter, "AAPL"),
        quick_ratio(&adapter, "AAPL")
    );

    // Then: both read the same latest period
    let dte = dte.expect("mock data has equity");
    let quick = quick.expect("mock data has liabilities");
    assert_eq!(dte.date, quick.date);
    assert!(dte.debt_to_equity_ratio > 0.0);
    assert!(quick.quick_ratio > 0.0);
}

#[tokio::test]
async fn quarterly_frequency_reads_latest_quarter() {
    // Given
    let adapter = YahooAdapter::default();

    // When
    let report = quick_ratio_with_frequency(&adapter, "MSFT", ReportFrequency::Quarterly)
        .await
        .expect("ratio");

    // Then
    assert_eq!(report.date.to_string(), "2024-09-30");
}
