// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Semgrep JSON output parser.

use pc_core::{Finding, Severity};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::warn;

pub const TOOL: &str = "semgrep";

#[derive(Debug, Deserialize)]
struct SemgrepResult {
    #[serde(default)]
    rule_id: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    path: Option<String>,
    #[serde(default)]
    start: Option<Position>,
    #[serde(default)]
    metadata: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
struct Position {
    #[serde(default)]
    line: Option<u32>,
    #[serde(default)]
    col: Option<u32>,
}

/// Parse Semgrep's JSON report: `results[].results[]`.
pub fn parse(raw: &str) -> Vec<Finding> {
    let root: Value = match serde_json::from_str(raw) {
        Ok(v) => v,
        Err(e) => {
            warn!(error = %e, "unparseable semgrep output");
            return Vec::new();
        }
    };

    let mut findings = Vec::new();
    let runs = root.get("results").and_then(Value::as_array);
    for run in runs.into_iter().flatten() {
        let results = run.get("results").and_then(Value::as_array);
        for result in results.into_iter().flatten() {
            // Per-record tolerance: a malformed entry is dropped silently.
            let Ok(record) = serde_json::from_value::<SemgrepResult>(result.clone()) else {
                continue;
            };
            findings.push(to_finding(record));
        }
    }
    findings
}

fn to_finding(record: SemgrepResult) -> Finding {
    let metadata = record.metadata.unwrap_or(Value::Null);
    let severity = metadata
        .get("severity")
        .and_then(Value::as_str)
        .map(map_severity)
        .unwrap_or(Severity::Info);
    let start = record.start.unwrap_or_default();

    let cwe = metadata.get("cwe").and_then(|c| c.get("id")).cloned();
    let confidence = metadata
        .get("confidence")
        .and_then(Value::as_str)
        .unwrap_or("unknown");

    Finding::new(
        TOOL,
        record.rule_id.unwrap_or_else(|| "unknown".to_string()),
        record.message.unwrap_or_default(),
        severity,
        record.path.unwrap_or_default(),
        start.line.unwrap_or(0),
    )
    .with_span(start.col, None, None)
    .with_metadata(json!({"cwe": cwe, "confidence": confidence}))
}

fn map_severity(raw: &str) -> Severity {
    match raw.to_ascii_uppercase().as_str() {
        "ERROR" => Severity::Error,
        "WARNING" => Severity::Warning,
        _ => Severity::Info,
    }
}

#[cfg(test)]
#[path = "semgrep_tests.rs"]
mod tests;
