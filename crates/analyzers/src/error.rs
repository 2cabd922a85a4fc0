// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pipeline error taxonomy.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that terminate a task as `failed`.
///
/// Tool-level problems (missing binaries, bad exits, timeouts, unparseable
/// output) never surface here; they degrade to warnings inside the pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed to create scratch directory: {0}")]
    Scratch(#[source] std::io::Error),

    #[error("failed to write report to {path}: {source}")]
    ReportWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("analysis failed: {0}")]
    Analysis(String),

    #[error("analysis task aborted: {0}")]
    Join(String),
}

impl PipelineError {
    /// Error category reported as `error_type` in a failed task response.
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::Scratch(_) | PipelineError::ReportWrite { .. } => "fatal",
            PipelineError::Analysis(_) => "analysis_error",
            PipelineError::Join(_) => "internal_error",
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
