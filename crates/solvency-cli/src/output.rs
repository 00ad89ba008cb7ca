use std::io::{self, Write};

use serde_json::Value;
use solvency_core::Envelope;

use crate::cli::OutputFormat;
use crate::error::CliError;

pub fn render(envelope: &Envelope<Value>, format: OutputFormat, pretty: bool) -> Result<(), CliError> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_envelope(&mut out, envelope, format, pretty)?;
    out.flush()?;
    Ok(())
}

fn write_envelope(
    out: &mut impl Write,
    envelope: &Envelope<Value>,
    format: OutputFormat,
    pretty: bool,
) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => {
            let payload = if pretty {
                serde_json::to_string_pretty(envelope)?
            } else {
                serde_json::to_string(envelope)?
            };
            writeln!(out, "{payload}")?;
        }
        OutputFormat::Table => write_table(out, envelope)?,
    }

    Ok(())
}

fn write_table(out: &mut impl Write, envelope: &Envelope<Value>) -> Result<(), CliError> {
    writeln!(out, "request_id  : {}", envelope.meta.request_id)?;
    writeln!(out, "schema      : {}", envelope.meta.schema_version)?;
    writeln!(out, "generated_at: {}", envelope.meta.generated_at)?;
    writeln!(
        out,
        "sources     : {}",
        envelope
            .meta
            .source_chain
            .iter()
            .map(|source| source.as_str())
            .collect::<Vec<_>>()
            .join(",")
    )?;
    writeln!(out, "latency_ms  : {}", envelope.meta.latency_ms)?;

    if !envelope.meta.warnings.is_empty() {
        writeln!(out, "warnings:")?;
        for warning in &envelope.meta.warnings {
            writeln!(out, "  - {warning}")?;
        }
    }

    writeln!(out, "data:")?;
    match &envelope.data {
        Value::Object(fields) => {
            let width = fields.keys().map(String::len).max().unwrap_or(0);
            for (key, value) in fields {
                writeln!(out, "  {key:<width$} : {}", scalar(value))?;
            }
        }
        Value::Null => writeln!(out, "  (none)")?,
        other => {
            for line in serde_json::to_string_pretty(other)?.lines() {
                writeln!(out, "  {line}")?;
            }
        }
    }

    if !envelope.errors.is_empty() {
        writeln!(out, "errors:")?;
        for error in &envelope.errors {
            writeln!(out, "  - {}: {}", error.code, error.message)?;
        }
    }

    Ok(())
}

/// Strings unquoted, everything else as compact JSON.
fn scalar(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use solvency_core::{EnvelopeError, EnvelopeMeta, ProviderId, SCHEMA_VERSION};

    fn envelope(data: Value) -> Envelope<Value> {
        let meta = EnvelopeMeta::new("request-12345", SCHEMA_VERSION, vec![ProviderId::Yahoo], 7)
            .expect("valid meta");
        Envelope::success(meta, data)
    }

    fn rendered(envelope: &Envelope<Value>, format: OutputFormat, pretty: bool) -> String {
        let mut buffer = Vec::new();
        write_envelope(&mut buffer, envelope, format, pretty).expect("render");
        String::from_utf8(buffer).expect("utf8")
    }

    #[test]
    fn json_output_is_single_line_unless_pretty() {
        let envelope = envelope(json!({"quick_ratio": 0.83}));

        let compact = rendered(&envelope, OutputFormat::Json, false);
        assert_eq!(compact.lines().count(), 1);

        let pretty = rendered(&envelope, OutputFormat::Json, true);
        assert!(pretty.lines().count() > 1);
        let parsed: Value = serde_json::from_str(&pretty).expect("valid json");
        assert_eq!(parsed["data"]["quick_ratio"], 0.83);
    }

    #[test]
    fn table_aligns_report_fields_and_lists_errors() {
        let mut envelope = envelope(json!({"symbol": "AAPL", "quick_ratio": 0.83}));
        envelope
            .push_error(
                EnvelopeError::new("ratio.not_found", "Could not retrieve balance sheet data for AAPL")
                    .expect("valid error"),
            )
            .expect("valid error");

        let table = rendered(&envelope, OutputFormat::Table, false);
        assert!(table.contains("  symbol      : AAPL"));
        assert!(table.contains("  quick_ratio : 0.83"));
        assert!(table.contains("  - ratio.not_found: Could not retrieve balance sheet data for AAPL"));
    }
}
