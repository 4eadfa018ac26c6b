//! Sink for `LOG` messages emitted by the surface's own script.

use serde_json::Value;
use tracing::info;

pub trait DiagnosticsSink: Send + Sync {
    fn log(&self, values: &[Value]);
}

/// Forwards surface log lines to `tracing` under `richedit::surface`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics;

impl DiagnosticsSink for TracingDiagnostics {
    fn log(&self, values: &[Value]) {
        info!(target: "richedit::surface", "FROM EDIT: {}", format_log_line(values));
    }
}

/// Join log values with spaces; strings are written without quotes.
pub fn format_log_line(values: &[Value]) -> String {
    values
        .iter()
        .map(|value| match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}
