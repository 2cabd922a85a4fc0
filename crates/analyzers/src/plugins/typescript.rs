// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! TypeScript/JavaScript syntax validation plugin.
//!
//! A string- and comment-aware scan for unbalanced delimiters and
//! unterminated literals. Deliberately shallow: anything deeper belongs to
//! the external linters.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use pc_core::{Category, Finding, Severity};
use serde_json::json;

use super::SyntaxPlugin;

pub const TOOL: &str = "typescript-syntax";

#[derive(Debug, Default)]
pub struct TypeScriptSyntaxPlugin;

#[async_trait]
impl SyntaxPlugin for TypeScriptSyntaxPlugin {
    fn name(&self) -> &'static str {
        TOOL
    }

    fn version(&self) -> &'static str {
        "1.0.0"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &[".ts", ".tsx", ".js", ".jsx", ".mjs", ".cjs"]
    }

    async fn analyze(&self, files: &[PathBuf]) -> Vec<Finding> {
        let mut findings = Vec::new();
        for file in files {
            analyze_file(file, &mut findings);
        }
        findings
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Code,
    LineComment,
    BlockComment,
    Single,
    Double,
    Template,
}

fn analyze_file(file: &Path, findings: &mut Vec<Finding>) {
    let path = file.display().to_string();
    let content = match std::fs::read_to_string(file) {
        Ok(content) => content,
        Err(e) => {
            findings.push(issue(
                &path,
                "ts-file-error",
                format!("Error reading file: {}", e),
                1,
                1,
            ));
            return;
        }
    };
    scan(&path, &content, findings);
}

fn scan(path: &str, content: &str, findings: &mut Vec<Finding>) {
    let mut state = State::Code;
    // (opener, line, column) of each delimiter still open
    let mut stack: Vec<(char, u32, u32)> = Vec::new();
    // where the current literal/comment started
    let mut started_at = (1u32, 1u32);
    let mut line = 1u32;
    let mut column = 0u32;
    let mut previous = '\0';
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\n' {
            if matches!(state, State::Single | State::Double) {
                findings.push(issue(
                    path,
                    "ts-unterminated-string",
                    "String literal is not terminated before end of line",
                    started_at.0,
                    started_at.1,
                ));
                state = State::Code;
            }
            if state == State::LineComment {
                state = State::Code;
            }
            line += 1;
            column = 0;
            previous = '\0';
            continue;
        }
        column += 1;

        match state {
            State::Code => match c {
                '/' if chars.peek() == Some(&'/') => {
                    chars.next();
                    column += 1;
                    state = State::LineComment;
                }
                '/' if chars.peek() == Some(&'*') => {
                    chars.next();
                    column += 1;
                    started_at = (line, column.saturating_sub(1));
                    state = State::BlockComment;
                }
                '\'' => {
                    started_at = (line, column);
                    state = State::Single;
                }
                '"' => {
                    started_at = (line, column);
                    state = State::Double;
                }
                '`' => {
                    started_at = (line, column);
                    state = State::Template;
                }
                '(' | '[' | '{' => stack.push((c, line, column)),
                ')' | ']' | '}' => match stack.pop() {
                    Some((opener, ..)) if matching(opener) == c => {}
                    Some((opener, open_line, open_column)) => {
                        findings.push(issue(
                            path,
                            "ts-unbalanced-delimiter",
                            format!(
                                "Found '{}' but the open delimiter at {}:{} is '{}'",
                                c, open_line, open_column, opener
                            ),
                            line,
                            column,
                        ));
                    }
                    None => {
                        findings.push(issue(
                            path,
                            "ts-unbalanced-delimiter",
                            format!("Closing '{}' has no matching open delimiter", c),
                            line,
                            column,
                        ));
                    }
                },
                _ => {}
            },
            State::Single => {
                if c == '\'' && previous != '\\' {
                    state = State::Code;
                }
            }
            State::Double => {
                if c == '"' && previous != '\\' {
                    state = State::Code;
                }
            }
            State::Template => {
                if c == '`' && previous != '\\' {
                    state = State::Code;
                }
            }
            State::BlockComment => {
                if c == '/' && previous == '*' {
                    state = State::Code;
                }
            }
            State::LineComment => {}
        }

        // A doubled backslash must not mask the next delimiter.
        previous = if c == '\\' && previous == '\\' { '\0' } else { c };
    }

    match state {
        State::Single | State::Double => findings.push(issue(
            path,
            "ts-unterminated-string",
            "String literal is not terminated before end of file",
            started_at.0,
            started_at.1,
        )),
        State::Template => findings.push(issue(
            path,
            "ts-unterminated-template",
            "Template literal is not terminated before end of file",
            started_at.0,
            started_at.1,
        )),
        State::BlockComment => findings.push(issue(
            path,
            "ts-unterminated-comment",
            "Block comment is not terminated before end of file",
            started_at.0,
            started_at.1,
        )),
        _ => {}
    }

    for (opener, open_line, open_column) in stack {
        findings.push(issue(
            path,
            "ts-unbalanced-delimiter",
            format!("'{}' is never closed", opener),
            open_line,
            open_column,
        ));
    }
}

fn matching(opener: char) -> char {
    match opener {
        '(' => ')',
        '[' => ']',
        _ => '}',
    }
}

fn issue(path: &str, rule_id: &str, message: impl Into<String>, line: u32, column: u32) -> Finding {
    Finding::new(TOOL, rule_id, message, Severity::Error, path, line)
        .with_span(Some(column.max(1)), None, None)
        .with_category(Category::Syntax)
        .with_metadata(json!({"plugin": TOOL}))
}

#[cfg(test)]
#[path = "typescript_tests.rs"]
mod tests;
