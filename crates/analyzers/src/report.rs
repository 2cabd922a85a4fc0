// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Aggregation of findings into report summaries.

use std::collections::BTreeMap;

use pc_core::{Category, Finding, Severity, TopIssue};

/// Count findings per severity.
pub fn severity_breakdown(findings: &[Finding]) -> BTreeMap<Severity, usize> {
    let mut breakdown = BTreeMap::new();
    for finding in findings {
        *breakdown.entry(finding.severity).or_insert(0) += 1;
    }
    breakdown
}

/// Count findings per category; uncategorized findings land in `Other`.
pub fn category_breakdown(findings: &[Finding]) -> BTreeMap<Category, usize> {
    let mut breakdown = BTreeMap::new();
    for finding in findings {
        let category = finding.category.unwrap_or(Category::Other);
        *breakdown.entry(category).or_insert(0) += 1;
    }
    breakdown
}

/// Worst offenders: by severity rank, then descending score.
pub fn top_issues(findings: &[Finding], limit: usize) -> Vec<TopIssue> {
    let mut ranked: Vec<&Finding> = findings.iter().collect();
    ranked.sort_by(|a, b| {
        a.severity
            .rank()
            .cmp(&b.severity.rank())
            .then_with(|| {
                b.score
                    .unwrap_or(0.0)
                    .partial_cmp(&a.score.unwrap_or(0.0))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
    });
    ranked.into_iter().take(limit).map(TopIssue::from).collect()
}

/// Human summary for a quality run, tiered by finding count.
pub fn quality_summary(findings_count: usize, tools_used: &[String]) -> String {
    let tools = tools_used.join(", ");
    match findings_count {
        0 => format!("No quality issues found. Analyzed with: {}", tools),
        1..=5 => format!("Found {} minor quality issues. Tools: {}", findings_count, tools),
        6..=15 => format!(
            "Found {} quality issues. Some attention recommended. Tools: {}",
            findings_count, tools
        ),
        _ => format!(
            "Found {} quality issues. Significant refactoring may be needed. Tools: {}",
            findings_count, tools
        ),
    }
}

/// Human summary for a security run.
pub fn security_summary(
    findings: &[Finding],
    tools_used: &[String],
    scan_time_ms: u64,
    files_scanned: usize,
) -> String {
    let breakdown = severity_breakdown(findings);
    let count = |severity: Severity| breakdown.get(&severity).copied().unwrap_or(0);
    format!(
        "Security analysis completed using {}. Found {} issues: {} critical, {} warnings, {} info. \
         Analysis took {:.2} seconds scanning {} files.",
        tools_used.join(", "),
        findings.len(),
        count(Severity::Error),
        count(Severity::Warning),
        count(Severity::Info),
        scan_time_ms as f64 / 1000.0,
        files_scanned,
    )
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod tests;
