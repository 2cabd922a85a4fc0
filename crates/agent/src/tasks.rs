// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The in-flight task table.
//!
//! Inserted from admission (listen loop), swept from the heartbeat loop,
//! removed on completion; one mutex guards all three.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use pc_core::TaskId;

#[derive(Debug, Clone)]
pub struct ActiveTask {
    pub started: Instant,
    pub timeout: Duration,
}

/// Outcome of the admission capacity check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmitOutcome {
    Admitted,
    AtCapacity,
}

/// Table of admitted-but-not-terminated tasks.
#[derive(Debug, Clone, Default)]
pub struct ActiveTasks {
    inner: Arc<Mutex<HashMap<TaskId, ActiveTask>>>,
}

impl ActiveTasks {
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Capacity check and insert under one lock, so the limit can never be
    /// oversubscribed by racing admissions.
    pub fn try_admit(&self, id: TaskId, timeout: Duration, limit: usize) -> AdmitOutcome {
        let mut tasks = self.inner.lock();
        if tasks.len() >= limit {
            return AdmitOutcome::AtCapacity;
        }
        tasks.insert(
            id,
            ActiveTask {
                started: Instant::now(),
                timeout,
            },
        );
        AdmitOutcome::Admitted
    }

    /// Remove an entry; `Some` means the caller owns the terminal response.
    pub fn remove(&self, id: &TaskId) -> Option<ActiveTask> {
        self.inner.lock().remove(id)
    }

    /// Remove every task past its deadline and return them.
    pub fn sweep_expired(&self) -> Vec<(TaskId, ActiveTask)> {
        let now = Instant::now();
        let mut tasks = self.inner.lock();
        let expired: Vec<TaskId> = tasks
            .iter()
            .filter(|(_, task)| now.duration_since(task.started) > task.timeout)
            .map(|(id, _)| id.clone())
            .collect();
        expired
            .into_iter()
            .filter_map(|id| tasks.remove(&id).map(|task| (id, task)))
            .collect()
    }
}

#[cfg(test)]
#[path = "tasks_tests.rs"]
mod tests;
