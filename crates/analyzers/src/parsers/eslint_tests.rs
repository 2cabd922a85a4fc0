// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

const SAMPLE: &str = r#"[
  {
    "filePath": "src/index.js",
    "messages": [
      {
        "ruleId": "no-unused-vars",
        "severity": 2,
        "message": "'x' is defined but never used.",
        "line": 4,
        "column": 7,
        "endLine": 4,
        "endColumn": 8,
        "suggestions": [{"desc": "Remove the variable."}]
      },
      {
        "ruleId": "prefer-const",
        "severity": 1,
        "message": "'y' is never reassigned.",
        "line": 9,
        "column": 5
      }
    ]
  },
  {"filePath": "src/clean.js", "messages": []}
]"#;

#[test]
fn parses_messages_per_file() {
    let findings = parse(SAMPLE);
    assert_eq!(findings.len(), 2);

    let unused = &findings[0];
    assert_eq!(unused.tool, "eslint");
    assert_eq!(unused.rule_id, "no-unused-vars");
    assert_eq!(unused.file_path, "src/index.js");
    assert_eq!(unused.start_line, 4);
    assert_eq!(unused.start_column, Some(7));
    assert_eq!(unused.end_line, Some(4));
    assert_eq!(unused.end_column, Some(8));
    assert_eq!(unused.fix_suggestion.as_deref(), Some("Remove the variable."));
}

#[parameterized(
    two_is_error = { 2, Severity::Error },
    one_is_warning = { 1, Severity::Warning },
    zero_is_info = { 0, Severity::Info },
)]
fn numeric_severity_mapping(raw: u8, expected: Severity) {
    let report = format!(
        r#"[{{"filePath":"a.js","messages":[{{"ruleId":"r","severity":{},"line":1}}]}}]"#,
        raw
    );
    assert_eq!(parse(&report)[0].severity, expected);
}

#[parameterized(
    no_prefix = { "no-console", Category::ErrorProne },
    prefer_prefix = { "prefer-const", Category::Style },
    import_rule = { "import/no-cycle", Category::Imports },
    other = { "eqeqeq", Category::Other },
)]
fn rule_id_categories(rule_id: &str, expected: Category) {
    assert_eq!(categorize(rule_id), expected);
}

#[test]
fn null_rule_id_gets_fallback() {
    let report = r#"[{"filePath":"a.js","messages":[{"ruleId":null,"severity":2,"message":"parse error","line":1}]}]"#;
    let findings = parse(report);
    assert_eq!(findings[0].rule_id, "ESLINT");
}

#[test]
fn malformed_messages_are_dropped() {
    let report = r#"[{"filePath":"a.js","messages":[{"line":"not a number"},{"ruleId":"ok","severity":1,"line":2}]}]"#;
    let findings = parse(report);
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].rule_id, "ok");
}

#[test]
fn non_array_output_yields_nothing() {
    assert!(parse(r#"{"messages":[]}"#).is_empty());
    assert!(parse("garbage").is_empty());
}
