//! # solvency-agent
//!
//! AI-agent tool surface for solvency: tool descriptors, a name-indexed
//! registry, and JSON envelopes.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`tool`] | `RatioTool` contract, descriptors, tagged `ToolOutput` |
//! | [`tools`] | `debt_to_equity_ratio` and `quick_ratio` tools |
//! | [`registry`] | Lookup, discovery and invocation by tool name |
//! | [`envelope`] | Envelope builder for machine-readable output |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use solvency_agent::ToolRegistry;
//! use solvency_core::{ReportFrequency, YahooAdapter};
//!
//! let registry =
//!     ToolRegistry::with_solvency_tools(Arc::new(YahooAdapter::default()), ReportFrequency::Annual);
//! let output = registry.invoke("quick_ratio", json!({"symbol": "MSFT"})).await?;
//! println!("{}", output.render_text());
//! ```

pub mod envelope;
pub mod error;
pub mod registry;
pub mod tool;
pub mod tools;

pub use envelope::EnvelopeBuilder;
pub use error::AgentError;
pub use registry::ToolRegistry;
pub use tool::{symbol_parameters, RatioTool, ToolDescriptor, ToolFailure, ToolOutput};
pub use tools::{DebtToEquityTool, QuickRatioTool};
