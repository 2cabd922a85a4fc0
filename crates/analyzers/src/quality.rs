// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The quality pipeline: linting, complexity, duplication, and syntax plugins.

use std::path::PathBuf;
use std::time::Instant;

use async_trait::async_trait;
use pc_core::{AnalysisMode, Capabilities, QualityConfig, TaskId, TaskPayload, TaskResults};
use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::duplication;
use crate::error::PipelineError;
use crate::parsers::{eslint, lizard, ruff};
use crate::pipeline::{empty_results, finalize, Analyzer, RunSummary, ToolExecution};
use crate::plugins::{
    safe_analyze, PluginStatus, SyntaxPlugin, TypeScriptSyntaxPlugin, YamlSyntaxPlugin,
};
use crate::report;
use crate::runner::{run_tool, ExitPolicy, ToolCommand};
use crate::scope::{files_with_extensions, FilterProfile};

const JS_TS_EXTENSIONS: &[&str] = &["js", "jsx", "ts", "tsx", "mjs", "cjs"];

#[derive(Debug, Default)]
pub struct QualityAnalyzer;

#[async_trait]
impl Analyzer for QualityAnalyzer {
    fn name(&self) -> &'static str {
        "quality"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            supports_heartbeat: true,
            supports_tasks: true,
            supports_events: true,
            tools: [
                "ruff",
                "eslint",
                "lizard",
                "duplication",
                "yaml-syntax",
                "typescript-syntax",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            languages: ["python", "javascript", "typescript", "yaml"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            scan_types: ["linting", "complexity", "duplication", "style", "syntax"]
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
        let config = QualityConfig::resolve(payload.config.as_ref(), payload.mode);
        let profile = FilterProfile::quality(config.mode, config.max_file_size_mb);
        let files = profile.filter_scope(&payload.scope);

        if files.is_empty() {
            warn!(task_id = %task_id, "no quality-relevant files found in scope");
            return Ok(empty_results(payload, "No quality-relevant files found"));
        }
        info!(task_id = %task_id, files = files.len(), mode = ?config.mode, "running quality analysis");

        let python: Vec<PathBuf> = files_with_extensions(&files, &["py"])
            .into_iter()
            .cloned()
            .collect();
        let js_ts: Vec<PathBuf> = files_with_extensions(&files, JS_TS_EXTENSIONS)
            .into_iter()
            .cloned()
            .collect();

        let mut tools: JoinSet<Option<ToolExecution>> = JoinSet::new();

        if config.ruff_enabled && !python.is_empty() {
            tools.spawn(run_ruff(config.clone(), python));
        }
        if config.eslint_enabled && !js_ts.is_empty() {
            tools.spawn(run_eslint(config.clone(), js_ts));
        }
        if config.scan_complexity && config.lizard_enabled {
            tools.spawn(run_lizard(config.clone(), files.clone()));
        }
        if config.scan_duplication {
            tools.spawn(run_duplication(config.clone(), files.clone()));
        }
        spawn_plugins(&config, &files, &mut tools);

        let mut summary = RunSummary::default();
        while let Some(joined) = tools.join_next().await {
            match joined {
                Ok(Some(execution)) => summary.absorb(execution),
                Ok(None) => {}
                Err(e) => warn!(error = %e, "quality tool task aborted"),
            }
        }

        let mut tools_used = summary.tools_used.clone();
        tools_used.sort();
        let analysis_summary = report::quality_summary(summary.findings.len(), &tools_used);
        finalize(payload, summary, files.len(), analysis_summary)
    }
}

/// Queue the syntax plugins the current mode asks for.
fn spawn_plugins(config: &QualityConfig, files: &[PathBuf], tools: &mut JoinSet<Option<ToolExecution>>) {
    let yaml_wanted = config.yaml_syntax_enabled
        && matches!(
            config.mode,
            AnalysisMode::SyntaxExtended | AnalysisMode::YamlStrict
        );
    if yaml_wanted {
        tools.spawn(run_plugin(YamlSyntaxPlugin, files.to_vec()));
    }

    let typescript_wanted =
        config.typescript_syntax_enabled && config.mode == AnalysisMode::SyntaxExtended;
    if typescript_wanted {
        tools.spawn(run_plugin(TypeScriptSyntaxPlugin, files.to_vec()));
    }
}

async fn run_plugin<P: SyntaxPlugin>(plugin: P, files: Vec<PathBuf>) -> Option<ToolExecution> {
    let started = Instant::now();
    let plugin_report = safe_analyze(&plugin, &files).await;
    if plugin_report.status == PluginStatus::Skipped {
        return None;
    }
    Some(ToolExecution {
        tool: plugin_report.plugin.to_string(),
        findings: plugin_report.findings,
        wall_time_ms: started.elapsed().as_millis() as u64,
        file_count: plugin_report.files_analyzed,
    })
}

async fn run_ruff(config: QualityConfig, files: Vec<PathBuf>) -> Option<ToolExecution> {
    let spec = ToolCommand::new("ruff", config.tool_timeout(), ExitPolicy::ZeroOrOne)
        .args(["check", "--output-format=json", "--no-fix"])
        .args(files.iter().map(|f| f.display().to_string()));

    let run = run_tool(&spec).await;
    if !run.succeeded() {
        return None;
    }
    Some(ToolExecution {
        tool: ruff::TOOL.to_string(),
        findings: ruff::parse(&run.stdout),
        wall_time_ms: run.wall_time_ms,
        file_count: files.len(),
    })
}

async fn run_eslint(config: QualityConfig, files: Vec<PathBuf>) -> Option<ToolExecution> {
    let spec = ToolCommand::new("npx", config.tool_timeout(), ExitPolicy::ZeroOrOne)
        .args(["eslint", "--format=json"])
        .args(files.iter().map(|f| f.display().to_string()));

    let run = run_tool(&spec).await;
    if !run.succeeded() {
        return None;
    }
    Some(ToolExecution {
        tool: eslint::TOOL.to_string(),
        findings: eslint::parse(&run.stdout),
        wall_time_ms: run.wall_time_ms,
        file_count: files.len(),
    })
}

async fn run_lizard(config: QualityConfig, files: Vec<PathBuf>) -> Option<ToolExecution> {
    let spec = ToolCommand::new("lizard", config.tool_timeout(), ExitPolicy::ZeroOrOne)
        .args(["--CCN".to_string(), config.complexity_threshold.to_string()])
        .args(files.iter().map(|f| f.display().to_string()));

    let run = run_tool(&spec).await;
    if !run.succeeded() {
        return None;
    }
    Some(ToolExecution {
        tool: lizard::TOOL.to_string(),
        findings: lizard::parse(&run.stdout, config.complexity_threshold),
        wall_time_ms: run.wall_time_ms,
        file_count: files.len(),
    })
}

async fn run_duplication(config: QualityConfig, files: Vec<PathBuf>) -> Option<ToolExecution> {
    let started = Instant::now();
    let threshold = config.duplication_threshold;
    let file_count = files.len();
    let findings = tokio::task::spawn_blocking(move || duplication::detect(&files, threshold))
        .await
        .unwrap_or_default();
    Some(ToolExecution {
        tool: duplication::TOOL.to_string(),
        findings,
        wall_time_ms: started.elapsed().as_millis() as u64,
        file_count,
    })
}

#[cfg(test)]
#[path = "quality_tests.rs"]
mod tests;
