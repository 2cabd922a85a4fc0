// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The analyzer seam and the machinery shared by both pipelines.

use std::collections::BTreeMap;
use std::path::PathBuf;

use async_trait::async_trait;
use pc_core::{Capabilities, Finding, TaskId, TaskPayload, TaskResults};

use crate::error::PipelineError;
use crate::report;
use crate::sarif;

/// One task pipeline, as seen by the agent core.
#[async_trait]
pub trait Analyzer: Send + Sync + 'static {
    /// Agent name used on the wire (`security`, `quality`).
    fn name(&self) -> &'static str;

    /// Capabilities advertised at registration.
    fn capabilities(&self) -> Capabilities;

    /// Run one task end-to-end and return the aggregated results.
    async fn analyze(
        &self,
        task_id: &TaskId,
        payload: &TaskPayload,
    ) -> Result<TaskResults, PipelineError>;
}

/// Output of one tool (or plugin) invocation inside a task.
#[derive(Debug)]
pub(crate) struct ToolExecution {
    pub tool: String,
    pub findings: Vec<Finding>,
    pub wall_time_ms: u64,
    pub file_count: usize,
}

/// Accumulates per-tool executions for one task.
#[derive(Debug, Default)]
pub(crate) struct RunSummary {
    pub findings: Vec<Finding>,
    pub tools_used: Vec<String>,
    pub analysis_time_ms: BTreeMap<String, u64>,
    pub file_counts: BTreeMap<String, usize>,
}

impl RunSummary {
    pub fn absorb(&mut self, execution: ToolExecution) {
        self.tools_used.push(execution.tool.clone());
        self.analysis_time_ms
            .insert(execution.tool.clone(), execution.wall_time_ms);
        self.file_counts
            .insert(execution.tool, execution.file_count);
        self.findings.extend(execution.findings);
    }
}

/// How many top issues a report carries.
const TOP_ISSUE_LIMIT: usize = 10;

/// Results for a scope with no eligible files; nothing ran, nothing written.
pub(crate) fn empty_results(payload: &TaskPayload, analysis_summary: &str) -> TaskResults {
    TaskResults {
        findings_count: 0,
        files_analyzed: Some(0),
        output_file: payload.output.clone(),
        analysis_summary: Some(analysis_summary.to_string()),
        ..TaskResults::default()
    }
}

/// Build the SARIF document, write it if the task asked for a file, and
/// fold the run into the response record.
pub(crate) fn finalize(
    payload: &TaskPayload,
    mut summary: RunSummary,
    files_analyzed: usize,
    analysis_summary: String,
) -> Result<TaskResults, PipelineError> {
    // Tool fan-in completes in arbitrary order; sort for reproducible output.
    summary.tools_used.sort();

    let repo_root = payload.repo_root().map(PathBuf::from);
    let log = sarif::build(&summary.findings, repo_root.as_deref());
    if let Some(path) = &payload.output {
        sarif::write_report(&log, path)?;
        tracing::info!(path = %path.display(), "report written");
    }

    Ok(TaskResults {
        findings_count: summary.findings.len(),
        severity_breakdown: report::severity_breakdown(&summary.findings),
        category_breakdown: report::category_breakdown(&summary.findings),
        tools_used: summary.tools_used,
        files_analyzed: Some(files_analyzed),
        top_issues: Some(report::top_issues(&summary.findings, TOP_ISSUE_LIMIT)),
        output_file: payload.output.clone(),
        analysis_summary: Some(analysis_summary),
        error: None,
        error_type: None,
        cooldown_remaining: None,
    })
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
