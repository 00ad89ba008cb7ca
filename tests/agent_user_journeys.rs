//! Behavior-driven tests for agent user journeys
//!
//! These tests verify WHAT an AI agent can accomplish through the tool
//! registry: discover tools, invoke them by name, and receive envelopes.

use std::sync::Arc;

use serde_json::{json, Value};
use solvency_agent::{EnvelopeBuilder, ToolOutput, ToolRegistry};
use solvency_core::{
    BalanceSheetSource, FixtureSource, ProviderId, RatioErrorKind, ReportFrequency, SourceError,
    YahooAdapter, EMPTY_MOCK_SYMBOL, SCHEMA_VERSION,
};

fn mock_registry() -> ToolRegistry {
    let source: Arc<dyn BalanceSheetSource> = Arc::new(YahooAdapter::default());
    ToolRegistry::with_solvency_tools(source, ReportFrequency::Annual)
}

// =============================================================================
// Agent Journey: Tool Discovery
// =============================================================================

#[test]
fn agent_can_discover_both_ratio_tools() {
    // Given: a registry over the mock provider
    let registry = mock_registry();

    // When: the agent asks for tool descriptors
    let descriptors = serde_json::to_value(registry.describe_all()).expect("serializable");

    // Then: both tools declare a string symbol parameter
    let names = descriptors
        .as_array()
        .expect("array")
        .iter()
        .map(|descriptor| descriptor["name"].as_str().unwrap_or_default().to_owned())
        .collect::<Vec<_>>();
    assert_eq!(names, ["debt_to_equity_ratio", "quick_ratio"]);

    assert_eq!(
        descriptors[0]["description"],
        "Calculate the Debt to Equity ratio for a given stock symbol"
    );
    assert_eq!(
        descriptors[1]["description"],
        "Calculate the Quick Ratio (Acid Test) for a given stock symbol"
    );

    for descriptor in descriptors.as_array().expect("array") {
        assert_eq!(
            descriptor["parameters"],
            json!({
                "symbol": {
                    "type": "string",
                    "description": "Stock symbol (e.g., AAPL, MSFT)"
                }
            })
        );
    }
}

// =============================================================================
// Agent Journey: Ratio Lookups
// =============================================================================

#[tokio::test]
async fn agent_can_compute_quick_ratio_and_wrap_it_in_an_envelope() {
    // Given
    let registry = mock_registry();

    // When
    let output = registry
        .invoke("quick_ratio", json!({"symbol": "MSFT"}))
        .await
        .expect("known tool");
    let envelope = EnvelopeBuilder::new(SCHEMA_VERSION)
        .with_source_chain(vec![ProviderId::Yahoo])
        .with_tool_output(&output)
        .expect("valid output")
        .build()
        .expect("valid envelope");

    // Then: the report carries its inputs and the period they came from
    assert!(output.is_success());
    assert!(envelope.errors.is_empty());
    let data = &envelope.data;
    assert_eq!(data["symbol"], "MSFT");
    assert_eq!(data["date"], "2024-09-30");
    let quick_assets = data["quick_assets"].as_f64().expect("number");
    let liabilities = data["current_liabilities"].as_f64().expect("number");
    let ratio = data["quick_ratio"].as_f64().expect("number");
    assert!((ratio - quick_assets / liabilities).abs() <= 0.005);
}

#[tokio::test]
async fn agent_receives_kind_and_message_when_ticker_is_unknown() {
    // Given
    let registry = mock_registry();

    // When
    let output = registry
        .invoke("debt_to_equity_ratio", json!({"symbol": EMPTY_MOCK_SYMBOL}))
        .await
        .expect("known tool");

    // Then
    assert_eq!(
        serde_json::to_value(&output).expect("serializable"),
        json!({
            "kind": "not_found",
            "message": "Could not retrieve balance sheet data for EMPTY"
        })
    );
}

#[tokio::test]
async fn agent_sees_provider_outage_as_retryable_envelope_error() {
    // Given
    let source = FixtureSource::new().with_error("AAPL", SourceError::unavailable("upstream 503"));
    let registry = ToolRegistry::with_solvency_tools(Arc::new(source), ReportFrequency::Annual);

    // When
    let output = registry
        .invoke("quick_ratio", json!({"symbol": "AAPL"}))
        .await
        .expect("known tool");
    let envelope = EnvelopeBuilder::new(SCHEMA_VERSION)
        .with_source_chain(vec![ProviderId::Fixture])
        .with_tool_output(&output)
        .expect("valid output")
        .build()
        .expect("valid envelope");

    // Then
    assert!(matches!(
        &output,
        ToolOutput::Failure(failure) if failure.kind == RatioErrorKind::ProviderUnavailable
    ));
    assert_eq!(envelope.data, Value::Null);
    assert_eq!(envelope.errors[0].code, "ratio.provider_unavailable");
    assert_eq!(
        envelope.errors[0].message,
        "Error calculating Quick Ratio for AAPL: upstream 503"
    );
    assert_eq!(envelope.errors[0].retryable, Some(true));
}

#[tokio::test]
async fn agent_gets_invalid_request_for_malformed_arguments() {
    // Given
    let registry = mock_registry();

    // When
    let output = registry
        .invoke("quick_ratio", json!({"symbol": ["AAPL", "MSFT"]}))
        .await
        .expect("known tool");

    // Then
    assert_eq!(
        output.failure().map(|failure| failure.kind),
        Some(RatioErrorKind::InvalidRequest)
    );
}
