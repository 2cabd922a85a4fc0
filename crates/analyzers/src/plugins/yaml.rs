// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! YAML syntax validation plugin.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use pc_core::{Category, Finding, Severity};
use serde_json::json;

use super::SyntaxPlugin;

pub const TOOL: &str = "yaml-syntax";

/// Indentation deeper than this suggests the document needs restructuring.
const MAX_INDENT: usize = 20;

#[derive(Debug, Default)]
pub struct YamlSyntaxPlugin;

#[async_trait]
impl SyntaxPlugin for YamlSyntaxPlugin {
    fn name(&self) -> &'static str {
        TOOL
    }

    fn version(&self) -> &'static str {
        "1.0.0"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &[".yaml", ".yml"]
    }

    async fn analyze(&self, files: &[PathBuf]) -> Vec<Finding> {
        let mut findings = Vec::new();
        for file in files {
            analyze_file(file, &mut findings);
        }
        findings
    }
}

fn analyze_file(file: &Path, findings: &mut Vec<Finding>) {
    let path = file.display().to_string();
    let content = match std::fs::read_to_string(file) {
        Ok(content) => content,
        Err(e) => {
            findings.push(issue(
                &path,
                "yaml-file-error",
                format!("Error reading YAML file: {}", e),
                Severity::Error,
                1,
                None,
            ));
            return;
        }
    };

    if content.is_empty() {
        findings.push(issue(&path, "yaml-empty-file", "YAML file is empty", Severity::Info, 1, None));
        return;
    }

    if let Err(e) = serde_yaml::from_str::<serde_yaml::Value>(&content) {
        let line = e.location().map(|l| l.line() as u32).unwrap_or(1);
        findings.push(issue(
            &path,
            "yaml-syntax-error",
            format!("YAML syntax error: {}", e),
            Severity::Error,
            line,
            None,
        ));
    }

    check_lines(&path, &content, findings);
}

fn check_lines(path: &str, content: &str, findings: &mut Vec<Finding>) {
    for (index, line) in content.lines().enumerate() {
        let line_number = index as u32 + 1;
        let stripped = line.trim();

        if !stripped.is_empty() && line.starts_with('\t') {
            findings.push(issue(
                path,
                "yaml-tab-indentation",
                "YAML uses spaces for indentation, not tabs",
                Severity::Error,
                line_number,
                Some("Replace tabs with 2 spaces"),
            ));
        }

        if stripped.is_empty() || stripped.starts_with('#') {
            continue;
        }

        if let Some(column) = missing_space_after_colon(stripped) {
            findings.push(
                issue(
                    path,
                    "yaml-missing-space-after-colon",
                    "Missing space after colon in YAML",
                    Severity::Warning,
                    line_number,
                    Some("Add a space after the colon"),
                )
                .with_span(Some(column as u32 + 1), None, None),
            );
        }

        let indent = line.len() - line.trim_start_matches(' ').len();
        if indent > MAX_INDENT {
            findings.push(issue(
                path,
                "yaml-excessive-indentation",
                format!(
                    "YAML indentation too deep ({} spaces). Consider restructuring.",
                    indent
                ),
                Severity::Info,
                line_number,
                None,
            ));
        }

        if line.ends_with(' ') {
            findings.push(issue(
                path,
                "yaml-trailing-whitespace",
                "Trailing whitespace in YAML",
                Severity::Info,
                line_number,
                None,
            ));
        }
    }
}

/// Column of a `key:value` colon with no space after it, if any.
fn missing_space_after_colon(stripped: &str) -> Option<usize> {
    if stripped.starts_with('-') {
        return None;
    }
    let colon = stripped.find(':')?;
    let after = stripped[colon + 1..].chars().next()?;
    if after == ' ' || after == '\t' {
        return None;
    }
    // Block scalars and URLs (http://) are not key-value pairs.
    if stripped.ends_with('|') || stripped.ends_with('>') || after == '/' {
        return None;
    }
    Some(colon + 1)
}

fn issue(
    path: &str,
    rule_id: &str,
    message: impl Into<String>,
    severity: Severity,
    line: u32,
    suggestion: Option<&str>,
) -> Finding {
    let mut finding = Finding::new(TOOL, rule_id, message, severity, path, line)
        .with_category(Category::Syntax)
        .with_metadata(json!({"plugin": TOOL}));
    if let Some(suggestion) = suggestion {
        finding = finding.with_fix(suggestion);
    }
    finding
}

#[cfg(test)]
#[path = "yaml_tests.rs"]
mod tests;
