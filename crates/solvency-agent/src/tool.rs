//! # Tool Contract
//!
//! A tool advertises a name, a description and a JSON parameter map, and
//! turns a JSON argument object into a [`ToolOutput`].
//!
//! | Output | Serialized as |
//! |--------|---------------|
//! | [`ToolOutput::Success`] | the ratio report object |
//! | [`ToolOutput::Failure`] | `{"kind": ..., "message": ...}` |

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use solvency_core::{RatioError, RatioErrorKind};

/// Discovery payload for one tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// Parameter map shared by every single-symbol tool.
pub fn symbol_parameters() -> Value {
    json!({
        "symbol": {
            "type": "string",
            "description": "Stock symbol (e.g., AAPL, MSFT)"
        }
    })
}

/// Agent-invocable tool.
pub trait RatioTool: Send + Sync {
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    fn parameters(&self) -> Value {
        symbol_parameters()
    }

    /// Runs the tool. Never fails outside the returned [`ToolOutput`].
    fn run<'a>(&'a self, args: Value) -> Pin<Box<dyn Future<Output = ToolOutput> + Send + 'a>>;

    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: self.name().to_owned(),
            description: self.description().to_owned(),
            parameters: self.parameters(),
        }
    }
}

/// Failure half of a tool result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolFailure {
    pub kind: RatioErrorKind,
    pub message: String,
    #[serde(skip)]
    pub retryable: bool,
}

impl ToolFailure {
    pub fn invalid_arguments(message: impl Into<String>) -> Self {
        Self {
            kind: RatioErrorKind::InvalidRequest,
            message: message.into(),
            retryable: false,
        }
    }

    pub const fn code(&self) -> &'static str {
        self.kind.code()
    }
}

impl From<RatioError> for ToolFailure {
    fn from(error: RatioError) -> Self {
        Self {
            kind: error.kind(),
            message: error.to_string(),
            retryable: error.retryable(),
        }
    }
}

/// Tagged tool result.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ToolOutput {
    Success(Value),
    Failure(ToolFailure),
}

impl ToolOutput {
    /// Serializes a report; a report that fails to serialize becomes a failure.
    pub fn from_result<T: Serialize>(result: Result<T, RatioError>) -> Self {
        match result {
            Ok(report) => match serde_json::to_value(report) {
                Ok(value) => Self::Success(value),
                Err(error) => Self::Failure(ToolFailure {
                    kind: RatioErrorKind::MalformedData,
                    message: format!("failed to serialize report: {error}"),
                    retryable: false,
                }),
            },
            Err(error) => Self::Failure(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn failure(&self) -> Option<&ToolFailure> {
        match self {
            Self::Success(_) => None,
            Self::Failure(failure) => Some(failure),
        }
    }

    /// Plain rendering: compact JSON for a report, the bare message for a
    /// failure.
    pub fn render_text(&self) -> String {
        match self {
            Self::Success(value) => value.to_string(),
            Self::Failure(failure) => failure.message.clone(),
        }
    }
}

/// Reads the required `symbol` argument.
pub(crate) fn symbol_argument(args: &Value) -> Result<&str, ToolFailure> {
    match args.get("symbol") {
        Some(Value::String(symbol)) => Ok(symbol.as_str()),
        Some(other) => Err(ToolFailure::invalid_arguments(format!(
            "argument 'symbol' must be a string, got {other}"
        ))),
        None => Err(ToolFailure::invalid_arguments(
            "missing required argument 'symbol'",
        )),
    }
}
