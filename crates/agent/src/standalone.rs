// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Standalone mode: one in-process analysis of the current directory,
//! without an orchestrator.

use std::collections::HashMap;
use std::path::PathBuf;

use pc_analyzers::{Analyzer, PipelineError};
use pc_core::{TaskId, TaskPayload};
use serde_json::json;
use tracing::info;

use crate::env;

/// Analyze the CWD and write a timestamped SARIF report under
/// `${OBS_PATH:-./obs}/reports`. Returns the report path.
pub async fn run(analyzer: &dyn Analyzer) -> Result<PathBuf, PipelineError> {
    let repo_root =
        std::env::current_dir().map_err(|e| PipelineError::Analysis(e.to_string()))?;
    let reports_dir = env::obs_path().join("reports");

    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let output = reports_dir.join(format!("{}-standalone-{}.sarif", analyzer.name(), timestamp));
    let task_id = TaskId::new(format!("standalone-{}", timestamp));

    let mut context = HashMap::new();
    context.insert(
        "repo_root".to_string(),
        json!(repo_root.display().to_string()),
    );
    context.insert("commit_hash".to_string(), json!("standalone"));
    context.insert("branch".to_string(), json!("main"));

    let payload = TaskPayload {
        scope: vec![repo_root.display().to_string()],
        context,
        output: Some(output.clone()),
        ..TaskPayload::default()
    };

    info!(root = %repo_root.display(), "starting standalone analysis");
    let results = analyzer.analyze(&task_id, &payload).await?;
    info!(
        findings = results.findings_count,
        tools = ?results.tools_used,
        report = %output.display(),
        "standalone analysis completed"
    );
    if let Some(summary) = &results.analysis_summary {
        info!("{}", summary);
    }
    Ok(output)
}

#[cfg(test)]
#[path = "standalone_tests.rs"]
mod tests;
