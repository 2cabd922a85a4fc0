// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lizard complexity output parser.
//!
//! Lizard's JSON support varies across versions, so the fixed-width text
//! table is the parsing contract. Rows that don't parse are skipped.

use pc_core::{Category, Finding, Severity};
use serde_json::json;

pub const TOOL: &str = "lizard";

const HEADER: [&str; 6] = ["NLOC", "CCN", "token", "PARAM", "length", "location"];

#[derive(Debug)]
struct FunctionRow {
    nloc: u32,
    ccn: u32,
    name: String,
    file: String,
    start_line: u32,
    end_line: Option<u32>,
}

/// Parse Lizard's function table, keeping rows whose CCN exceeds `threshold`.
pub fn parse(raw: &str, threshold: u32) -> Vec<Finding> {
    let mut findings = Vec::new();
    let mut in_table = false;

    for line in raw.lines() {
        let tokens: Vec<&str> = line.split_whitespace().collect();

        if !in_table {
            in_table = tokens == HEADER;
            continue;
        }
        // A second ruler ends the per-function table (file summary follows).
        if line.trim_start().starts_with("==") {
            break;
        }
        let Some(row) = parse_row(&tokens) else {
            continue;
        };
        if row.ccn > threshold {
            findings.push(to_finding(row, threshold));
        }
    }
    findings
}

/// Row format: `NLOC CCN token PARAM length name@start-end@file`.
fn parse_row(tokens: &[&str]) -> Option<FunctionRow> {
    if tokens.len() < 6 {
        return None;
    }
    let nloc: u32 = tokens[0].parse().ok()?;
    let ccn: u32 = tokens[1].parse().ok()?;

    let location = tokens.last()?;
    let mut parts = location.splitn(3, '@');
    let name = parts.next()?.to_string();
    let span = parts.next()?;
    let file = parts.next().unwrap_or("").to_string();

    let (start_line, end_line) = match span.split_once('-') {
        Some((start, end)) => (start.parse().ok()?, end.parse().ok()),
        None => (span.parse().ok()?, None),
    };

    Some(FunctionRow {
        nloc,
        ccn,
        name,
        file,
        start_line,
        end_line,
    })
}

fn to_finding(row: FunctionRow, threshold: u32) -> Finding {
    Finding::new(
        TOOL,
        "COMPLEXITY",
        format!(
            "Function '{}' has high cyclomatic complexity: {}",
            row.name, row.ccn
        ),
        severity_for(row.ccn),
        row.file,
        row.start_line,
    )
    .with_span(None, row.end_line, None)
    .with_category(Category::Complexity)
    .with_score(row.ccn as f64)
    .with_fix(format!(
        "Consider refactoring this function to reduce complexity below {}",
        threshold
    ))
    .with_metadata(json!({
        "function_name": row.name,
        "complexity": row.ccn,
        "nloc": row.nloc,
    }))
}

fn severity_for(ccn: u32) -> Severity {
    if ccn >= 20 {
        Severity::Error
    } else if ccn >= 15 {
        Severity::Warning
    } else {
        Severity::Info
    }
}

#[cfg(test)]
#[path = "lizard_tests.rs"]
mod tests;
