use std::sync::Arc;

use serde_json::Value;
use solvency_core::{BalanceSheetSource, ReportFrequency};
use tracing::{info, warn};

use crate::error::AgentError;
use crate::tool::{RatioTool, ToolDescriptor, ToolOutput};
use crate::tools::{DebtToEquityTool, QuickRatioTool};

/// Name-indexed collection of tools, in registration order.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<Box<dyn RatioTool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding both solvency tools over one shared source.
    pub fn with_solvency_tools(
        source: Arc<dyn BalanceSheetSource>,
        frequency: ReportFrequency,
    ) -> Self {
        Self {
            tools: vec![
                Box::new(DebtToEquityTool::new(Arc::clone(&source)).with_frequency(frequency)),
                Box::new(QuickRatioTool::new(source).with_frequency(frequency)),
            ],
        }
    }

    pub fn register(&mut self, tool: Box<dyn RatioTool>) -> Result<(), AgentError> {
        if self.get(tool.name()).is_some() {
            return Err(AgentError::DuplicateTool {
                name: tool.name().to_owned(),
            });
        }

        self.tools.push(tool);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&dyn RatioTool> {
        self.tools
            .iter()
            .find(|tool| tool.name() == name)
            .map(|tool| tool.as_ref())
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.tools.iter().map(|tool| tool.name()).collect()
    }

    /// Discovery payload for every registered tool.
    pub fn describe_all(&self) -> Vec<ToolDescriptor> {
        self.tools.iter().map(|tool| tool.descriptor()).collect()
    }

    pub async fn invoke(&self, name: &str, args: Value) -> Result<ToolOutput, AgentError> {
        let tool = self.get(name).ok_or_else(|| AgentError::UnknownTool {
            name: name.to_owned(),
        })?;

        info!(tool = name, "invoking tool");
        let output = tool.run(args).await;
        if let Some(failure) = output.failure() {
            warn!(tool = name, code = failure.code(), message = %failure.message, "tool failed");
        }
        Ok(output)
    }
}
