// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scripted analyzer for tests.

use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use pc_core::{Capabilities, TaskId, TaskPayload, TaskResults};

use crate::error::PipelineError;
use crate::pipeline::Analyzer;

/// Analyzer double: replays queued responses, then a default.
pub struct FakeAnalyzer {
    name: &'static str,
    delay: Option<Duration>,
    default_response: Result<TaskResults, String>,
    queued: Mutex<VecDeque<Result<TaskResults, String>>>,
    seen: Mutex<Vec<(TaskId, TaskPayload)>>,
}

impl FakeAnalyzer {
    /// Succeeds every task with empty results.
    pub fn succeeding() -> Self {
        FakeAnalyzer {
            name: "fake",
            delay: None,
            default_response: Ok(TaskResults::default()),
            queued: Mutex::new(VecDeque::new()),
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Fails every task with the given message.
    pub fn failing(message: impl Into<String>) -> Self {
        FakeAnalyzer {
            default_response: Err(message.into()),
            ..FakeAnalyzer::succeeding()
        }
    }

    /// Sleep this long inside each task before responding.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Queue one success served before the default response.
    pub fn queue_success(&self, results: TaskResults) {
        self.queued.lock().push_back(Ok(results));
    }

    /// Queue one failure served before the default response.
    pub fn queue_failure(&self, message: impl Into<String>) {
        self.queued.lock().push_back(Err(message.into()));
    }

    /// Number of tasks that reached `analyze`.
    pub fn calls(&self) -> usize {
        self.seen.lock().len()
    }

    /// Payloads seen so far.
    pub fn payloads(&self) -> Vec<(TaskId, TaskPayload)> {
        self.seen.lock().clone()
    }
}

#[async_trait]
impl Analyzer for FakeAnalyzer {
    fn name(&self) -> &'static str {
        self.name
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            supports_heartbeat: true,
            supports_tasks: true,
            supports_events: true,
            tools: vec!["fake".to_string()],
            languages: Vec::new(),
            scan_types: Vec::new(),
            output_formats: vec!["sarif".to_string()],
        }
    }

    async fn analyze(
        &self,
        task_id: &TaskId,
        payload: &TaskPayload,
    ) -> Result<TaskResults, PipelineError> {
        self.seen.lock().push((task_id.clone(), payload.clone()));
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let response = self
            .queued
            .lock()
            .pop_front()
            .unwrap_or_else(|| self.default_response.clone());
        response.map_err(PipelineError::Analysis)
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
