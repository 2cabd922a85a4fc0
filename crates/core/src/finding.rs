// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The uniform finding record shared by every analyzer.

use serde::{Deserialize, Serialize};

/// Normalized severity of a finding.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl Severity {
    /// SARIF `level` for this severity.
    pub fn sarif_level(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "note",
        }
    }

    /// Sort rank; errors first.
    pub fn rank(self) -> u8 {
        match self {
            Severity::Error => 0,
            Severity::Warning => 1,
            Severity::Info => 2,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        };
        write!(f, "{}", name)
    }
}

/// Coarse classification of a finding.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Complexity,
    Style,
    ErrorProne,
    Duplication,
    Syntax,
    Imports,
    Bugbear,
    Other,
}

/// One analyzer result, normalized across tools.
///
/// `metadata` is the single intentionally free-form slot; everything else
/// is typed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub tool: String,
    pub rule_id: String,
    pub message: String,
    pub severity: Severity,
    pub file_path: String,
    /// 1-based; constructors clamp zero to one.
    pub start_line: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_column: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_line: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_column: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fix_suggestion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

impl Finding {
    pub fn new(
        tool: impl Into<String>,
        rule_id: impl Into<String>,
        message: impl Into<String>,
        severity: Severity,
        file_path: impl Into<String>,
        start_line: u32,
    ) -> Self {
        Self {
            tool: tool.into(),
            rule_id: rule_id.into(),
            message: message.into(),
            severity,
            file_path: file_path.into(),
            start_line: start_line.max(1),
            start_column: None,
            end_line: None,
            end_column: None,
            category: None,
            score: None,
            fix_suggestion: None,
            metadata: None,
        }
    }

    pub fn with_span(
        mut self,
        start_column: Option<u32>,
        end_line: Option<u32>,
        end_column: Option<u32>,
    ) -> Self {
        self.start_column = start_column;
        self.end_line = end_line.map(|l| l.max(self.start_line));
        self.end_column = end_column;
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }

    pub fn with_fix(mut self, suggestion: impl Into<String>) -> Self {
        self.fix_suggestion = Some(suggestion.into());
        self
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// Compact finding view used in the top-issues section of a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopIssue {
    pub tool: String,
    pub rule_id: String,
    pub message: String,
    pub severity: Severity,
    pub file_path: String,
    pub line: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl From<&Finding> for TopIssue {
    fn from(f: &Finding) -> Self {
        TopIssue {
            tool: f.tool.clone(),
            rule_id: f.rule_id.clone(),
            message: f.message.clone(),
            severity: f.severity,
            file_path: f.file_path.clone(),
            line: f.start_line,
            score: f.score,
        }
    }
}

#[cfg(test)]
#[path = "finding_tests.rs"]
mod tests;
