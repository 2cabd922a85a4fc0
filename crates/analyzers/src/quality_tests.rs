// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use pc_core::Severity;
use serde_json::json;
use std::path::Path;

// Tool binaries are not assumed on PATH; these tests drive the pipeline
// through the in-process analyzers (duplication, syntax plugins) only.
fn hermetic_config(extra: serde_json::Value) -> serde_json::Value {
    let mut config = json!({
        "ruff_enabled": false,
        "eslint_enabled": false,
        "lizard_enabled": false,
        "scan_complexity": false,
        "scan_duplication": false,
        "yaml_syntax_enabled": false,
        "typescript_syntax_enabled": false,
    });
    if let (Some(base), Some(overlay)) = (config.as_object_mut(), extra.as_object()) {
        for (key, value) in overlay {
            base.insert(key.clone(), value.clone());
        }
    }
    config
}

fn write(dir: &Path, name: &str, content: &str) -> String {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path.display().to_string()
}

#[tokio::test]
async fn empty_scope_completes_with_no_tools() {
    let analyzer = QualityAnalyzer;
    let results = analyzer
        .analyze(&TaskId::new("t1"), &TaskPayload::default())
        .await
        .unwrap();
    assert_eq!(results.findings_count, 0);
    assert!(results.tools_used.is_empty());
    assert_eq!(results.files_analyzed, Some(0));
}

#[tokio::test]
async fn duplication_only_run_reports_findings_and_writes_sarif() {
    let dir = tempfile::tempdir().unwrap();
    let shared = "def a():\n    return 1\n\ndef b():\n    return 2\n";
    let first = write(dir.path(), "one.py", shared);
    write(dir.path(), "two.py", shared);
    let output = dir.path().join("report.sarif");

    let payload = TaskPayload {
        scope: vec![dir.path().display().to_string()],
        output: Some(output.clone()),
        config: Some(hermetic_config(json!({"scan_duplication": true}))),
        ..TaskPayload::default()
    };

    let analyzer = QualityAnalyzer;
    let results = analyzer.analyze(&TaskId::new("t2"), &payload).await.unwrap();

    assert_eq!(results.tools_used, vec!["duplication"]);
    assert_eq!(results.findings_count, 1);
    assert_eq!(results.severity_breakdown.get(&Severity::Warning), Some(&1));
    assert_eq!(results.files_analyzed, Some(2));
    assert!(results.analysis_summary.unwrap().contains("1 minor quality issues"));

    let report: crate::sarif::SarifLog =
        serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(report.runs.len(), 1);
    assert_eq!(report.runs[0].tool.driver.name, "duplication");
    let result = &report.runs[0].results[0];
    assert_eq!(result.level, "warning");
    assert_eq!(
        result.locations[0].physical_location.artifact_location.uri,
        first
    );
}

#[tokio::test]
async fn yaml_strict_mode_runs_only_the_yaml_plugin() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "bad.yaml", "key:value\n");
    write(dir.path(), "code.py", "x = 1\n");

    let payload = TaskPayload {
        scope: vec![dir.path().display().to_string()],
        config: Some(hermetic_config(json!({"yaml_syntax_enabled": true}))),
        mode: AnalysisMode::YamlStrict,
        ..TaskPayload::default()
    };

    let analyzer = QualityAnalyzer;
    let results = analyzer.analyze(&TaskId::new("t3"), &payload).await.unwrap();

    assert_eq!(results.tools_used, vec!["yaml-syntax"]);
    // yaml_strict restricts the scope to YAML files only
    assert_eq!(results.files_analyzed, Some(1));
    assert!(results.findings_count >= 1);
}

#[tokio::test]
async fn syntax_extended_mode_runs_both_plugins() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "bad.yaml", "\tkey: 1\n");
    write(dir.path(), "bad.ts", "function f() {\n");

    let payload = TaskPayload {
        scope: vec![dir.path().display().to_string()],
        config: Some(hermetic_config(json!({
            "yaml_syntax_enabled": true,
            "typescript_syntax_enabled": true,
        }))),
        mode: AnalysisMode::SyntaxExtended,
        ..TaskPayload::default()
    };

    let analyzer = QualityAnalyzer;
    let results = analyzer.analyze(&TaskId::new("t4"), &payload).await.unwrap();

    assert_eq!(results.tools_used, vec!["typescript-syntax", "yaml-syntax"]);
    assert!(results.findings_count >= 2);
    let categories = results.category_breakdown;
    assert!(categories.contains_key(&pc_core::Category::Syntax));
}

#[tokio::test]
async fn plugins_do_not_run_in_standard_mode() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "bad.ts", "function f() {\n");

    let payload = TaskPayload {
        scope: vec![dir.path().display().to_string()],
        config: Some(hermetic_config(json!({"typescript_syntax_enabled": true}))),
        ..TaskPayload::default()
    };

    let analyzer = QualityAnalyzer;
    let results = analyzer.analyze(&TaskId::new("t5"), &payload).await.unwrap();
    assert!(results.tools_used.is_empty());
    assert_eq!(results.findings_count, 0);
}

#[tokio::test]
async fn rerunning_the_same_task_is_deterministic() {
    let dir = tempfile::tempdir().unwrap();
    let shared = "line one\nline two\nline three\n";
    write(dir.path(), "a.py", shared);
    write(dir.path(), "b.py", shared);
    write(dir.path(), "bad.yaml", "k:v\n");

    let payload = TaskPayload {
        scope: vec![dir.path().display().to_string()],
        config: Some(hermetic_config(json!({
            "scan_duplication": true,
            "yaml_syntax_enabled": true,
        }))),
        mode: AnalysisMode::SyntaxExtended,
        ..TaskPayload::default()
    };

    let analyzer = QualityAnalyzer;
    let first = analyzer.analyze(&TaskId::new("t6"), &payload).await.unwrap();
    let second = analyzer.analyze(&TaskId::new("t6"), &payload).await.unwrap();
    assert_eq!(first.findings_count, second.findings_count);
    assert_eq!(first.severity_breakdown, second.severity_breakdown);
    assert_eq!(first.tools_used, second.tools_used);
}

#[test]
fn capabilities_advertise_the_quality_toolbox() {
    let capabilities = QualityAnalyzer.capabilities();
    assert!(capabilities.supports_tasks);
    assert!(capabilities.tools.contains(&"ruff".to_string()));
    assert!(capabilities.tools.contains(&"yaml-syntax".to_string()));
    assert_eq!(capabilities.output_formats, vec!["sarif"]);
}
