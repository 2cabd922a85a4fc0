// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Gitleaks report parser.

use pc_core::{Finding, Severity};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::warn;

pub const TOOL: &str = "gitleaks";

#[derive(Debug, Deserialize)]
struct GitleaksFinding {
    #[serde(default)]
    rule: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    file: Option<String>,
    #[serde(default)]
    start_line: Option<u32>,
    // Older report versions used a bare "line" field.
    #[serde(default)]
    line: Option<u32>,
    #[serde(default)]
    start_column: Option<u32>,
    #[serde(default)]
    fingerprint: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
}

/// Parse a Gitleaks JSON report.
///
/// Accepts both shapes the tool has produced: a bare list of findings and
/// an object wrapping them under `findings`.
pub fn parse(raw: &str) -> Vec<Finding> {
    let root: Value = match serde_json::from_str(raw) {
        Ok(v) => v,
        Err(e) => {
            warn!(error = %e, "unparseable gitleaks report");
            return Vec::new();
        }
    };

    let records = match &root {
        Value::Array(items) => items.as_slice(),
        Value::Object(map) => match map.get("findings").and_then(Value::as_array) {
            Some(items) => items.as_slice(),
            None => &[],
        },
        _ => &[],
    };

    records
        .iter()
        .filter_map(|record| serde_json::from_value::<GitleaksFinding>(record.clone()).ok())
        .map(to_finding)
        .collect()
}

fn to_finding(record: GitleaksFinding) -> Finding {
    let line = record.start_line.or(record.line).unwrap_or(0);
    Finding::new(
        TOOL,
        record.rule.unwrap_or_else(|| "gitleaks-secret".to_string()),
        record.description.unwrap_or_default(),
        // A committed secret is always critical.
        Severity::Error,
        record.file.unwrap_or_default(),
        line,
    )
    .with_span(record.start_column, None, None)
    .with_metadata(json!({
        "fingerprint": record.fingerprint,
        "tags": record.tags,
    }))
}

#[cfg(test)]
#[path = "gitleaks_tests.rs"]
mod tests;
