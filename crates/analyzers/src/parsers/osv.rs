// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! OSV scanner report parser.

use pc_core::{Finding, Severity};
use serde_json::{json, Value};
use tracing::warn;

pub const TOOL: &str = "osv-scanner";

/// Parse an OSV scanner JSON report: `results[].packages[].vulnerabilities[]`.
///
/// Vulnerabilities are package-scoped, so the location is synthetic: the
/// project root at line 1.
pub fn parse(raw: &str, project_root: &str) -> Vec<Finding> {
    let root: Value = match serde_json::from_str(raw) {
        Ok(v) => v,
        Err(e) => {
            warn!(error = %e, "unparseable osv-scanner report");
            return Vec::new();
        }
    };

    let mut findings = Vec::new();
    let results = root.get("results").and_then(Value::as_array);
    for result in results.into_iter().flatten() {
        let packages = result.get("packages").and_then(Value::as_array);
        for package in packages.into_iter().flatten() {
            let info = package.get("package").unwrap_or(&Value::Null);
            let name = info.get("name").and_then(Value::as_str).unwrap_or("");
            let ecosystem = info.get("ecosystem").and_then(Value::as_str).unwrap_or("");

            let vulns = package.get("vulnerabilities").and_then(Value::as_array);
            for vuln in vulns.into_iter().flatten() {
                if let Some(finding) = to_finding(vuln, name, ecosystem, project_root) {
                    findings.push(finding);
                }
            }
        }
    }
    findings
}

fn to_finding(vuln: &Value, package: &str, ecosystem: &str, project_root: &str) -> Option<Finding> {
    let id = vuln.get("id").and_then(Value::as_str).unwrap_or("unknown");
    let message = vuln
        .get("summary")
        .or_else(|| vuln.get("details"))
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string();
    if id == "unknown" && message.is_empty() {
        return None;
    }

    let severity = vuln
        .get("database_specific")
        .and_then(|d| d.get("severity"))
        .or_else(|| vuln.get("severity"))
        .and_then(Value::as_str)
        .map(map_severity)
        .unwrap_or(Severity::Warning);

    let aliases = vuln.get("aliases").cloned().unwrap_or(Value::Null);

    Some(
        Finding::new(
            TOOL,
            format!("osv-{}", id),
            message,
            severity,
            project_root,
            1,
        )
        .with_metadata(json!({
            "package": package,
            "ecosystem": ecosystem,
            "vulnerability_id": id,
            "aliases": aliases,
        })),
    )
}

fn map_severity(raw: &str) -> Severity {
    match raw.to_ascii_uppercase().as_str() {
        "CRITICAL" | "HIGH" => Severity::Error,
        "MEDIUM" | "MODERATE" => Severity::Warning,
        "LOW" => Severity::Info,
        _ => Severity::Warning,
    }
}

#[cfg(test)]
#[path = "osv_tests.rs"]
mod tests;
