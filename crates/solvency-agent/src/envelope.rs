//! # Envelope Construction
//!
//! Fluent builder for [`Envelope`] values wrapping tool output.
//!
//! ```rust,ignore
//! use solvency_agent::EnvelopeBuilder;
//!
//! let envelope = EnvelopeBuilder::new(SCHEMA_VERSION)
//!     .with_source_chain(vec![ProviderId::Yahoo])
//!     .with_tool_output(&output)?
//!     .with_latency_ms(142)
//!     .build()?;
//! ```

use serde_json::Value;
use solvency_core::{Envelope, EnvelopeError, EnvelopeMeta, ProviderId, ValidationError};

use crate::tool::ToolOutput;

/// Builder for constructing valid envelopes.
#[derive(Debug, Clone)]
pub struct EnvelopeBuilder {
    schema_version: String,
    source_chain: Vec<ProviderId>,
    data: Value,
    latency_ms: u64,
    warnings: Vec<String>,
    errors: Vec<EnvelopeError>,
    request_id: Option<String>,
}

impl EnvelopeBuilder {
    /// The schema version must follow the pattern `vMAJOR.MINOR.PATCH`.
    pub fn new(schema_version: impl Into<String>) -> Self {
        Self {
            schema_version: schema_version.into(),
            source_chain: Vec::new(),
            data: Value::Null,
            latency_ms: 0,
            warnings: Vec::new(),
            errors: Vec::new(),
            request_id: None,
        }
    }

    pub fn with_source_chain(mut self, source_chain: Vec<ProviderId>) -> Self {
        self.source_chain = source_chain;
        self
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = data;
        self
    }

    /// Success becomes `data`; failure becomes an envelope error with
    /// `data: null`.
    pub fn with_tool_output(self, output: &ToolOutput) -> Result<Self, ValidationError> {
        match output {
            ToolOutput::Success(value) => Ok(self.with_data(value.clone())),
            ToolOutput::Failure(failure) => {
                let error = EnvelopeError::new(failure.code(), failure.message.as_str())?
                    .with_retryable(failure.retryable);
                Ok(self.with_data(Value::Null).with_error(error))
            }
        }
    }

    pub fn with_latency_ms(mut self, latency_ms: u64) -> Self {
        self.latency_ms = latency_ms;
        self
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    pub fn with_error(mut self, error: EnvelopeError) -> Self {
        self.errors.push(error);
        self
    }

    /// Defaults to a fresh UUID v4 when unset.
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    pub fn build(self) -> Result<Envelope<Value>, ValidationError> {
        let request_id = self
            .request_id
            .unwrap_or_else(|| uuid::Uuid::new_v4().hyphenated().to_string());

        let mut meta = EnvelopeMeta::new(
            request_id,
            self.schema_version,
            self.source_chain,
            self.latency_ms,
        )?;
        for warning in self.warnings {
            meta.push_warning(warning);
        }

        Envelope::with_errors(meta, self.data, self.errors)
    }
}
