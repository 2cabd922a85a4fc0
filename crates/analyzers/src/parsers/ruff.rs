// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Ruff JSON output parser.

use pc_core::{Category, Finding, Severity};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::warn;

pub const TOOL: &str = "ruff";

#[derive(Debug, Deserialize)]
struct RuffItem {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    filename: Option<String>,
    #[serde(default)]
    location: Option<RuffLocation>,
    #[serde(default)]
    end_location: Option<RuffLocation>,
    #[serde(default)]
    fix: Option<Value>,
    #[serde(default)]
    url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RuffLocation {
    #[serde(default)]
    row: Option<u32>,
    #[serde(default)]
    column: Option<u32>,
}

/// Parse `ruff check --output-format=json` output.
pub fn parse(raw: &str) -> Vec<Finding> {
    let items: Vec<Value> = match serde_json::from_str(raw) {
        Ok(Value::Array(items)) => items,
        Ok(_) => return Vec::new(),
        Err(e) => {
            warn!(error = %e, "unparseable ruff output");
            return Vec::new();
        }
    };

    items
        .into_iter()
        .filter_map(|item| serde_json::from_value::<RuffItem>(item).ok())
        .map(to_finding)
        .collect()
}

fn to_finding(item: RuffItem) -> Finding {
    let code = item.code.unwrap_or_else(|| "RUFF".to_string());
    let location = item.location.unwrap_or_default();
    let end = item.end_location.unwrap_or_default();

    // A rule without an autofix is worth more attention.
    let has_fix = item.fix.as_ref().is_some_and(|f| !f.is_null());
    let severity = if has_fix {
        Severity::Warning
    } else {
        Severity::Error
    };

    let fix_suggestion = item
        .fix
        .as_ref()
        .and_then(|f| f.get("message"))
        .and_then(Value::as_str)
        .map(str::to_string);

    let mut finding = Finding::new(
        TOOL,
        code.clone(),
        item.message.unwrap_or_default(),
        severity,
        item.filename.unwrap_or_default(),
        location.row.unwrap_or(0),
    )
    .with_span(location.column, end.row, end.column)
    .with_category(categorize(&code))
    .with_metadata(json!({"url": item.url, "fix": item.fix}));

    if let Some(suggestion) = fix_suggestion {
        finding = finding.with_fix(suggestion);
    }
    finding
}

fn categorize(code: &str) -> Category {
    match code.chars().next() {
        Some('E') | Some('W') => Category::Style,
        Some('F') => Category::ErrorProne,
        Some('B') => Category::Bugbear,
        _ => Category::Other,
    }
}

#[cfg(test)]
#[path = "ruff_tests.rs"]
mod tests;
