// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tracing setup for the agent binaries.

use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;

/// Maximum log file size before rotation (10 MB).
const MAX_LOG_SIZE: u64 = 10 * 1024 * 1024;

/// Number of rotated log files to keep.
const MAX_ROTATED_LOGS: u32 = 3;

/// Where an agent's log file lives.
pub fn log_path(agent: &str) -> PathBuf {
    PathBuf::from(format!("/tmp/pit-crew-{}-agent.log", agent))
}

/// Install the subscriber: env-filtered, stderr plus a non-blocking file
/// appender. Keep the returned guard alive for the process lifetime.
pub fn setup(agent: &str) -> Option<WorkerGuard> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let path = log_path(agent);
    rotate_log_if_needed(&path);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let (directory, file_name) = match (path.parent(), path.file_name()) {
        (Some(directory), Some(file_name)) => (directory.to_path_buf(), file_name.to_owned()),
        _ => return None,
    };
    let file_appender = tracing_appender::rolling::never(directory, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let initialized = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .try_init()
        .is_ok();

    initialized.then_some(guard)
}

/// Rotate the log file if it exceeds [`MAX_LOG_SIZE`].
///
/// Shifts `agent.log` → `agent.log.1` → `.2` → `.3`, deleting the oldest.
/// Best-effort: rotation failures never stop the agent.
fn rotate_log_if_needed(path: &Path) {
    let size = match std::fs::metadata(path) {
        Ok(meta) => meta.len(),
        Err(_) => return,
    };
    if size < MAX_LOG_SIZE {
        return;
    }

    let base = path.display().to_string();
    for i in (1..MAX_ROTATED_LOGS).rev() {
        let from = format!("{}.{}", base, i);
        let to = format!("{}.{}", base, i + 1);
        let _ = std::fs::rename(&from, &to);
    }
    let _ = std::fs::rename(path, format!("{}.1", base));
}

#[cfg(test)]
#[path = "logging_tests.rs"]
mod tests;
