// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The security pipeline: SAST, secrets, and dependency scanning.

use std::path::PathBuf;
use std::time::Instant;

use async_trait::async_trait;
use pc_core::{Capabilities, SecurityConfig, TaskId, TaskPayload, TaskResults};
use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::error::PipelineError;
use crate::parsers::{gitleaks, osv, semgrep};
use crate::pipeline::{empty_results, finalize, Analyzer, RunSummary, ToolExecution};
use crate::report;
use crate::runner::{run_tool, ExitPolicy, ToolCommand};
use crate::scope::{FilterProfile, SECURITY_MANIFESTS};

#[derive(Debug, Default)]
pub struct SecurityAnalyzer;

#[async_trait]
impl Analyzer for SecurityAnalyzer {
    fn name(&self) -> &'static str {
        "security"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            supports_heartbeat: true,
            supports_tasks: true,
            supports_events: true,
            tools: ["semgrep", "gitleaks", "osv-scanner"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            languages: ["python", "javascript", "typescript", "java", "go", "rust", "c", "cpp"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            scan_types: ["sast", "secrets", "dependencies"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            output_formats: vec!["sarif".to_string()],
        }
    }

    async fn analyze(
        &self,
        task_id: &TaskId,
        payload: &TaskPayload,
    ) -> Result<TaskResults, PipelineError> {
        let config = SecurityConfig::resolve(payload.config.as_ref());
        let profile = FilterProfile::security(config.max_file_size_mb);
        let files = profile.filter_scope(&payload.scope);

        if files.is_empty() {
            warn!(task_id = %task_id, "no security-relevant files found in scope");
            return Ok(empty_results(payload, "No security-relevant files found"));
        }
        info!(task_id = %task_id, files = files.len(), "scanning files for security issues");

        let scratch = tempfile::tempdir().map_err(PipelineError::Scratch)?;
        let source = payload.repo_root().unwrap_or(".").to_string();
        let started = Instant::now();

        let mut tools: JoinSet<Option<ToolExecution>> = JoinSet::new();
        tools.spawn(run_semgrep(config.clone(), files.clone()));

        if config.scan_secrets && config.gitleaks_enabled {
            let report_path = scratch.path().join("gitleaks-report.json");
            tools.spawn(run_gitleaks(config.clone(), source.clone(), report_path, files.len()));
        }

        if config.scan_dependencies && config.osv_scanner_enabled {
            let manifests: Vec<PathBuf> = files
                .iter()
                .filter(|f| {
                    f.file_name()
                        .and_then(|n| n.to_str())
                        .is_some_and(|n| SECURITY_MANIFESTS.contains(&n))
                })
                .cloned()
                .collect();
            if !manifests.is_empty() {
                let report_path = scratch.path().join("osv-results.json");
                tools.spawn(run_osv(config.clone(), manifests, report_path, source.clone()));
            }
        }

        let mut summary = RunSummary::default();
        while let Some(joined) = tools.join_next().await {
            match joined {
                Ok(Some(execution)) => summary.absorb(execution),
                Ok(None) => {}
                Err(e) => warn!(error = %e, "security tool task aborted"),
            }
        }

        let scan_time_ms = started.elapsed().as_millis() as u64;
        let mut tools_used = summary.tools_used.clone();
        tools_used.sort();
        let analysis_summary =
            report::security_summary(&summary.findings, &tools_used, scan_time_ms, files.len());

        // Scratch removal happens on drop, covering the error paths too.
        let results = finalize(payload, summary, files.len(), analysis_summary)?;
        scratch.close().map_err(PipelineError::Scratch)?;
        Ok(results)
    }
}

async fn run_semgrep(config: SecurityConfig, files: Vec<PathBuf>) -> Option<ToolExecution> {
    let mut spec = ToolCommand::new("semgrep", config.tool_timeout(), ExitPolicy::ZeroOrOne)
        .args(["--json", "--quiet"]);
    for rule in &config.semgrep_rules {
        spec = spec.arg("--config").arg(rule.clone());
    }
    spec = spec.args(files.iter().map(|f| f.display().to_string()));

    let run = run_tool(&spec).await;
    if !run.succeeded() {
        return None;
    }
    Some(ToolExecution {
        tool: semgrep::TOOL.to_string(),
        findings: semgrep::parse(&run.stdout),
        wall_time_ms: run.wall_time_ms,
        file_count: files.len(),
    })
}

async fn run_gitleaks(
    config: SecurityConfig,
    source: String,
    report_path: PathBuf,
    file_count: usize,
) -> Option<ToolExecution> {
    let spec = ToolCommand::new("gitleaks", config.tool_timeout(), ExitPolicy::ZeroOrOne).args([
        "detect".to_string(),
        format!("--source={}", source),
        "--report-format=json".to_string(),
        format!("--report-path={}", report_path.display()),
        "--no-banner".to_string(),
    ]);

    let run = run_tool(&spec).await;
    if !run.succeeded() {
        return None;
    }
    // Exit 1 means leaks were found and the report was written.
    let report = std::fs::read_to_string(&report_path).unwrap_or_default();
    let findings = if report.is_empty() {
        Vec::new()
    } else {
        gitleaks::parse(&report)
    };
    Some(ToolExecution {
        tool: gitleaks::TOOL.to_string(),
        findings,
        wall_time_ms: run.wall_time_ms,
        file_count,
    })
}

async fn run_osv(
    config: SecurityConfig,
    manifests: Vec<PathBuf>,
    report_path: PathBuf,
    project_root: String,
) -> Option<ToolExecution> {
    let spec = ToolCommand::new("osv-scanner", config.tool_timeout(), ExitPolicy::ZeroOnly)
        .args([
            "--format".to_string(),
            "json".to_string(),
            "--output".to_string(),
            report_path.display().to_string(),
        ])
        .args(manifests.iter().map(|f| f.display().to_string()));

    let run = run_tool(&spec).await;
    if !run.succeeded() {
        return None;
    }
    // The scanner may exit clean without writing a report; tolerate that.
    let report = std::fs::read_to_string(&report_path).unwrap_or_default();
    let findings = if report.is_empty() {
        Vec::new()
    } else {
        osv::parse(&report, &project_root)
    };
    Some(ToolExecution {
        tool: osv::TOOL.to_string(),
        findings,
        wall_time_ms: run.wall_time_ms,
        file_count: manifests.len(),
    })
}

#[cfg(test)]
#[path = "security_tests.rs"]
mod tests;
