// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The agent core: admission, dispatch, and task lifecycle.
//!
//! Task states: admitted → running → (completed | failed | timeout), or
//! rejected at the gate. Every terminal state removes the ActiveTask entry
//! and emits exactly one response.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use parking_lot::Mutex;
use pc_analyzers::{Analyzer, PipelineError};
use pc_core::{
    now_rfc3339, IpcMessage, MessageType, TaskId, TaskPayload, TaskResponse, TaskResults,
    TaskStatus,
};
use serde_json::Value;
use tracing::{error, info, warn};

use crate::client::{ClientHandler, MessageSender, TaskLoad};
use crate::cooldown::ErrorStreak;
use crate::tasks::{ActiveTasks, AdmitOutcome};

/// Glues the IPC client to an analyzer pipeline.
#[derive(Clone)]
pub struct AgentCore {
    agent: String,
    analyzer: Arc<dyn Analyzer>,
    tasks: ActiveTasks,
    streak: Arc<Mutex<ErrorStreak>>,
    sender: MessageSender,
}

impl AgentCore {
    pub fn new(analyzer: Arc<dyn Analyzer>, sender: MessageSender) -> Self {
        AgentCore {
            agent: analyzer.name().to_string(),
            analyzer,
            tasks: ActiveTasks::default(),
            streak: Arc::new(Mutex::new(ErrorStreak::new(Instant::now()))),
            sender,
        }
    }

    pub fn active_tasks(&self) -> &ActiveTasks {
        &self.tasks
    }

    fn respond(
        &self,
        task_id: &TaskId,
        status: TaskStatus,
        results: TaskResults,
        duration_ms: Option<u64>,
    ) {
        let response = TaskResponse {
            status,
            results,
            duration_ms,
            agent: self.agent.clone(),
            timestamp: now_rfc3339(),
        };
        let data = serde_json::to_value(&response).unwrap_or(Value::Null);
        let msg = IpcMessage::with_data(task_id.as_str(), MessageType::Task, data);
        if !self.sender.send(msg) {
            warn!(task_id = %task_id, "failed to send task response");
        }
    }

    async fn run_task(self, task_id: TaskId, payload: TaskPayload) {
        let started = Instant::now();
        let result = self.analyzer.analyze(&task_id, &payload).await;
        let duration_ms = started.elapsed().as_millis() as u64;

        // Exactly-once: the heartbeat sweep may have already emitted a
        // timeout response and removed the entry.
        if self.tasks.remove(&task_id).is_none() {
            warn!(task_id = %task_id, "task already finalized, dropping late result");
            return;
        }

        match result {
            Ok(results) => {
                info!(
                    task_id = %task_id,
                    findings = results.findings_count,
                    duration_ms,
                    "task completed"
                );
                self.streak.lock().record_success(Instant::now());
                self.respond(&task_id, TaskStatus::Done, results, Some(duration_ms));
            }
            Err(e) => {
                let streak = self.streak.lock().record_failure();
                let config = self.sender.shared().config();
                error!(
                    task_id = %task_id,
                    error = %e,
                    consecutive_errors = streak,
                    max = config.max_consecutive_errors,
                    "task failed"
                );
                self.respond(
                    &task_id,
                    TaskStatus::Failed,
                    failure_results(&e),
                    Some(duration_ms),
                );
            }
        }
    }
}

fn failure_results(error: &PipelineError) -> TaskResults {
    TaskResults::error(error.to_string(), error.kind())
}

#[async_trait]
impl ClientHandler for AgentCore {
    async fn handle_task(&self, msg: IpcMessage) {
        let task_id = TaskId::new(msg.id);
        let Some(data) = msg.data else {
            warn!(task_id = %task_id, "task message missing data");
            return;
        };
        let payload: TaskPayload = match serde_json::from_value(data) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(task_id = %task_id, error = %e, "invalid task payload");
                self.respond(
                    &task_id,
                    TaskStatus::Failed,
                    TaskResults::error(format!("invalid task payload: {}", e), "protocol"),
                    None,
                );
                return;
            }
        };
        info!(task_id = %task_id, scope = payload.scope.len(), "received task");

        let config = self.sender.shared().config();

        // 1. Error cooldown closes admission entirely.
        let cooldown = self.streak.lock().cooldown_remaining(
            Instant::now(),
            config.max_consecutive_errors,
            config.error_cooldown,
        );
        if let Some(remaining) = cooldown {
            let streak = self.streak.lock().consecutive();
            error!(
                task_id = %task_id,
                consecutive_errors = streak,
                cooldown_remaining_s = remaining.as_secs(),
                "agent in error state, rejecting task"
            );
            let mut results = TaskResults::error(
                format!(
                    "Agent in error state: too many consecutive failures ({})",
                    streak
                ),
                "cooldown",
            );
            results.cooldown_remaining = Some(remaining.as_secs());
            self.respond(&task_id, TaskStatus::Failed, results, None);
            return;
        }

        // 2. Capacity gate; check and insert are atomic.
        let timeout = payload.timeout(config.default_task_timeout);
        match self
            .tasks
            .try_admit(task_id.clone(), timeout, config.max_active_tasks)
        {
            AdmitOutcome::AtCapacity => {
                warn!(
                    task_id = %task_id,
                    active = self.tasks.len(),
                    limit = config.max_active_tasks,
                    "agent overloaded, rejecting task"
                );
                let results = TaskResults::error(
                    format!(
                        "Agent overloaded: {}/{} tasks running",
                        self.tasks.len(),
                        config.max_active_tasks
                    ),
                    "overload",
                );
                self.respond(&task_id, TaskStatus::Rejected, results, None);
            }
            AdmitOutcome::Admitted => {
                // Runs concurrently with the IPC loops; never blocks listen.
                let core = self.clone();
                tokio::spawn(core.run_task(task_id, payload));
            }
        }
    }

    async fn sweep_and_load(&self) -> TaskLoad {
        for (task_id, task) in self.tasks.sweep_expired() {
            warn!(
                task_id = %task_id,
                timeout_s = task.timeout.as_secs(),
                "task timed out"
            );
            let results = TaskResults::error(
                format!("Task exceeded {}s timeout", task.timeout.as_secs()),
                "timeout",
            );
            self.respond(&task_id, TaskStatus::Timeout, results, None);
        }
        TaskLoad {
            active: self.tasks.len(),
            limit: self.sender.shared().config().max_active_tasks,
        }
    }
}

#[cfg(test)]
#[path = "core_tests.rs"]
mod tests;
