use std::time::Instant;

use serde_json::{json, Value};
use solvency_agent::{ToolOutput, ToolRegistry};
use solvency_core::{EnvelopeError, ProviderId, RatioKind};

use crate::cli::SymbolArgs;
use crate::error::CliError;

use super::{elapsed_ms, CommandResult};

pub async fn run(
    kind: RatioKind,
    args: &SymbolArgs,
    registry: &ToolRegistry,
    source: ProviderId,
) -> Result<CommandResult, CliError> {
    let started = Instant::now();
    let output = registry
        .invoke(kind.tool_name(), json!({ "symbol": args.symbol }))
        .await?;
    let latency_ms = elapsed_ms(started);

    let result = match output {
        ToolOutput::Success(report) => CommandResult::ok(report, vec![source]),
        ToolOutput::Failure(failure) => {
            let error = EnvelopeError::new(failure.code(), failure.message.as_str())?
                .with_retryable(failure.retryable)
                .with_source(source);
            CommandResult::ok(Value::Null, vec![source]).with_error(error)
        }
    };

    Ok(result.with_latency(latency_ms))
}
