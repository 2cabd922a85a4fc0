// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn finding(severity: Severity, category: Option<Category>, score: Option<f64>) -> Finding {
    let mut f = Finding::new("tool", "rule", "message", severity, "a.py", 1);
    f.category = category;
    f.score = score;
    f
}

#[test]
fn severity_breakdown_counts() {
    let findings = vec![
        finding(Severity::Error, None, None),
        finding(Severity::Error, None, None),
        finding(Severity::Info, None, None),
    ];
    let breakdown = severity_breakdown(&findings);
    assert_eq!(breakdown.get(&Severity::Error), Some(&2));
    assert_eq!(breakdown.get(&Severity::Warning), None);
    assert_eq!(breakdown.get(&Severity::Info), Some(&1));
}

#[test]
fn category_breakdown_defaults_to_other() {
    let findings = vec![
        finding(Severity::Warning, Some(Category::Style), None),
        finding(Severity::Warning, None, None),
    ];
    let breakdown = category_breakdown(&findings);
    assert_eq!(breakdown.get(&Category::Style), Some(&1));
    assert_eq!(breakdown.get(&Category::Other), Some(&1));
}

#[test]
fn top_issues_ranks_severity_then_score() {
    let findings = vec![
        finding(Severity::Info, None, Some(99.0)),
        finding(Severity::Error, None, Some(10.0)),
        finding(Severity::Error, None, Some(25.0)),
        finding(Severity::Warning, None, None),
    ];
    let top = top_issues(&findings, 10);
    assert_eq!(top[0].severity, Severity::Error);
    assert_eq!(top[0].score, Some(25.0));
    assert_eq!(top[1].score, Some(10.0));
    assert_eq!(top[2].severity, Severity::Warning);
    assert_eq!(top[3].severity, Severity::Info);
}

#[test]
fn top_issues_honours_the_limit() {
    let findings: Vec<Finding> = (0..20)
        .map(|_| finding(Severity::Warning, None, None))
        .collect();
    assert_eq!(top_issues(&findings, 10).len(), 10);
}

#[test]
fn quality_summary_tiers() {
    let tools = vec!["ruff".to_string(), "eslint".to_string()];
    assert!(quality_summary(0, &tools).starts_with("No quality issues found"));
    assert!(quality_summary(3, &tools).contains("3 minor quality issues"));
    assert!(quality_summary(12, &tools).contains("Some attention recommended"));
    assert!(quality_summary(40, &tools).contains("Significant refactoring"));
    assert!(quality_summary(40, &tools).contains("ruff, eslint"));
}

#[test]
fn security_summary_counts_severities() {
    let findings = vec![
        finding(Severity::Error, None, None),
        finding(Severity::Warning, None, None),
        finding(Severity::Warning, None, None),
    ];
    let summary = security_summary(&findings, &["semgrep".to_string()], 2500, 7);
    assert!(summary.contains("using semgrep"));
    assert!(summary.contains("Found 3 issues"));
    assert!(summary.contains("1 critical"));
    assert!(summary.contains("2 warnings"));
    assert!(summary.contains("0 info"));
    assert!(summary.contains("2.50 seconds"));
    assert!(summary.contains("7 files"));
}
