// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task payloads and responses.

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::finding::{Category, Severity, TopIssue};

/// Quality analysis mode requested by a task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisMode {
    #[default]
    Standard,
    SyntaxExtended,
    YamlStrict,
}

/// Inbound `type=task` payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskPayload {
    /// Paths, directories, or glob patterns to analyze.
    #[serde(default)]
    pub scope: Vec<String>,
    /// Opaque context forwarded into the report (`repo_root`, `commit_hash`, ...).
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub context: HashMap<String, serde_json::Value>,
    /// Where to write the SARIF report, if anywhere.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
    /// Per-task config overrides, resolved into typed records at the boundary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<serde_json::Value>,
    #[serde(default)]
    pub mode: AnalysisMode,
    /// Hard upper bound on task wall time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_seconds: Option<u64>,
}

impl TaskPayload {
    /// Effective task deadline.
    pub fn timeout(&self, default: Duration) -> Duration {
        self.timeout_seconds
            .map(Duration::from_secs)
            .unwrap_or(default)
    }

    pub fn repo_root(&self) -> Option<&str> {
        self.context.get("repo_root").and_then(|v| v.as_str())
    }
}

/// Terminal status of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Done,
    Failed,
    Timeout,
    Rejected,
}

/// Aggregated results reported back for a task.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskResults {
    #[serde(default)]
    pub findings_count: usize,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub severity_breakdown: BTreeMap<Severity, usize>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub category_breakdown: BTreeMap<Category, usize>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools_used: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files_analyzed: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_issues: Option<Vec<TopIssue>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_file: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis_summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    /// Seconds left of the agent's error cooldown, on cooldown rejections.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cooldown_remaining: Option<u64>,
}

impl TaskResults {
    /// Results carrying only an error message and category.
    pub fn error(message: impl Into<String>, error_type: impl Into<String>) -> Self {
        TaskResults {
            error: Some(message.into()),
            error_type: Some(error_type.into()),
            ..TaskResults::default()
        }
    }
}

/// Outbound `type=task` response payload; `id` matches the task message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskResponse {
    pub status: TaskStatus,
    pub results: TaskResults,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    pub agent: String,
    pub timestamp: String,
}

#[cfg(test)]
#[path = "task_tests.rs"]
mod tests;
