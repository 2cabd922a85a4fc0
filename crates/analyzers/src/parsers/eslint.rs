// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! ESLint JSON output parser.

use pc_core::{Category, Finding, Severity};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::warn;

pub const TOOL: &str = "eslint";

#[derive(Debug, Deserialize)]
struct FileResult {
    #[serde(rename = "filePath", default)]
    file_path: Option<String>,
    #[serde(default)]
    messages: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct EslintMessage {
    #[serde(rename = "ruleId", default)]
    rule_id: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    severity: Option<u8>,
    #[serde(default)]
    line: Option<u32>,
    #[serde(default)]
    column: Option<u32>,
    #[serde(rename = "endLine", default)]
    end_line: Option<u32>,
    #[serde(rename = "endColumn", default)]
    end_column: Option<u32>,
    #[serde(default)]
    suggestions: Vec<Value>,
}

/// Parse `eslint --format=json` output.
pub fn parse(raw: &str) -> Vec<Finding> {
    let files: Vec<Value> = match serde_json::from_str(raw) {
        Ok(Value::Array(files)) => files,
        Ok(_) => return Vec::new(),
        Err(e) => {
            warn!(error = %e, "unparseable eslint output");
            return Vec::new();
        }
    };

    let mut findings = Vec::new();
    for file in files {
        let Ok(file_result) = serde_json::from_value::<FileResult>(file) else {
            continue;
        };
        let path = file_result.file_path.unwrap_or_default();
        for message in file_result.messages {
            let Ok(message) = serde_json::from_value::<EslintMessage>(message) else {
                continue;
            };
            findings.push(to_finding(message, &path));
        }
    }
    findings
}

fn to_finding(message: EslintMessage, path: &str) -> Finding {
    let rule_id = message.rule_id.unwrap_or_else(|| "ESLINT".to_string());
    let severity = match message.severity {
        Some(2) => Severity::Error,
        Some(1) => Severity::Warning,
        _ => Severity::Info,
    };
    let fix_suggestion = message
        .suggestions
        .last()
        .and_then(|s| s.get("desc"))
        .and_then(Value::as_str)
        .map(str::to_string);

    let mut finding = Finding::new(
        TOOL,
        rule_id.clone(),
        message.message.unwrap_or_default(),
        severity,
        path,
        message.line.unwrap_or(0),
    )
    .with_span(message.column, message.end_line, message.end_column)
    .with_category(categorize(&rule_id))
    .with_metadata(json!({"ruleId": rule_id, "suggestions": message.suggestions}));

    if let Some(suggestion) = fix_suggestion {
        finding = finding.with_fix(suggestion);
    }
    finding
}

fn categorize(rule_id: &str) -> Category {
    if rule_id.starts_with("no-") {
        Category::ErrorProne
    } else if rule_id.starts_with("prefer-") {
        Category::Style
    } else if rule_id.contains("import") {
        Category::Imports
    } else {
        Category::Other
    }
}

#[cfg(test)]
#[path = "eslint_tests.rs"]
mod tests;
