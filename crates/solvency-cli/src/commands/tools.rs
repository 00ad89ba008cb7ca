use serde::Serialize;
use solvency_agent::{ToolDescriptor, ToolRegistry};
use solvency_core::ProviderId;

use crate::error::CliError;

use super::CommandResult;

#[derive(Debug, Serialize)]
struct ToolsResponseData {
    tools: Vec<ToolDescriptor>,
}

pub fn run(registry: &ToolRegistry, source: ProviderId) -> Result<CommandResult, CliError> {
    let data = serde_json::to_value(ToolsResponseData {
        tools: registry.describe_all(),
    })?;
    Ok(CommandResult::ok(data, vec![source]))
}
