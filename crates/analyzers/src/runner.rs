// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! External analyzer execution.
//!
//! One implementation of spawn / bounded wait / terminate / reap for every
//! tool, so no path can leak a child process or its pipes.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::{Duration, Instant};

use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use tokio::io::AsyncReadExt;
use tokio::process::{Child, Command};
use tracing::{debug, warn};

/// Grace period between SIGTERM and SIGKILL on timeout.
pub const KILL_GRACE: Duration = Duration::from_secs(5);

/// How a tool's exit code is classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitPolicy {
    /// 0 is clean, 1 means findings exist; anything else is an error.
    /// (ruff, eslint, semgrep, lizard, gitleaks)
    ZeroOrOne,
    /// Only 0 is clean. (osv-scanner)
    ZeroOnly,
}

/// Classified result of one tool invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolOutcome {
    /// Clean exit, no findings signalled by the exit code.
    Ok,
    /// Clean exit with findings (exit code 1 under `ZeroOrOne`).
    Findings,
    /// The wall budget elapsed; the child was reaped.
    Timeout,
    /// The executable is not installed; degrade silently.
    MissingTool,
    /// Spawn failure or an exit code outside the tool's allow-list.
    Error,
}

/// Raw output plus classification for one tool run.
#[derive(Debug)]
pub struct ToolRun {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: Option<i32>,
    pub wall_time_ms: u64,
    pub outcome: ToolOutcome,
}

impl ToolRun {
    /// Whether the output is usable for parsing.
    pub fn succeeded(&self) -> bool {
        matches!(self.outcome, ToolOutcome::Ok | ToolOutcome::Findings)
    }

    fn failed(outcome: ToolOutcome, stderr: String, wall_time_ms: u64) -> Self {
        ToolRun {
            stdout: String::new(),
            stderr,
            exit_code: None,
            wall_time_ms,
            outcome,
        }
    }
}

/// One tool invocation: argv, working directory, wall budget, exit policy.
#[derive(Debug, Clone)]
pub struct ToolCommand {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    pub timeout: Duration,
    pub policy: ExitPolicy,
}

impl ToolCommand {
    pub fn new(program: impl Into<String>, timeout: Duration, policy: ExitPolicy) -> Self {
        ToolCommand {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            timeout,
            policy,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn cwd(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }
}

/// Run one external analyzer to completion or timeout.
///
/// Guarantees under every exit path: the child is reaped and both pipes are
/// drained. On timeout: SIGTERM, wait up to [`KILL_GRACE`], then SIGKILL.
pub async fn run_tool(spec: &ToolCommand) -> ToolRun {
    let started = Instant::now();

    let mut command = Command::new(&spec.program);
    command
        .args(&spec.args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    if let Some(dir) = &spec.cwd {
        command.current_dir(dir);
    }

    let mut child = match command.spawn() {
        Ok(child) => child,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!(tool = %spec.program, "tool not found on PATH, skipping");
            return ToolRun::failed(ToolOutcome::MissingTool, String::new(), 0);
        }
        Err(e) => {
            warn!(tool = %spec.program, error = %e, "failed to spawn tool");
            return ToolRun::failed(ToolOutcome::Error, e.to_string(), 0);
        }
    };

    // Drain both pipes concurrently so the child can't stall on a full pipe.
    let stdout_task = tokio::spawn(slurp(child.stdout.take()));
    let stderr_task = tokio::spawn(slurp(child.stderr.take()));

    let status = match tokio::time::timeout(spec.timeout, child.wait()).await {
        Ok(Ok(status)) => Some(status),
        Ok(Err(e)) => {
            warn!(tool = %spec.program, error = %e, "wait on tool failed");
            None
        }
        Err(_) => {
            warn!(
                tool = %spec.program,
                timeout_s = spec.timeout.as_secs(),
                "tool exceeded wall budget, terminating"
            );
            reap(&mut child).await;
            None
        }
    };

    let stdout = stdout_task.await.unwrap_or_default();
    let stderr = stderr_task.await.unwrap_or_default();
    let wall_time_ms = started.elapsed().as_millis() as u64;

    let Some(status) = status else {
        return ToolRun {
            stdout,
            stderr,
            exit_code: None,
            wall_time_ms,
            outcome: ToolOutcome::Timeout,
        };
    };

    let exit_code = status.code();
    let outcome = classify(exit_code, spec.policy);
    debug!(
        tool = %spec.program,
        exit_code = ?exit_code,
        wall_time_ms,
        outcome = ?outcome,
        "tool finished"
    );

    ToolRun {
        stdout,
        stderr,
        exit_code,
        wall_time_ms,
        outcome,
    }
}

fn classify(exit_code: Option<i32>, policy: ExitPolicy) -> ToolOutcome {
    match (policy, exit_code) {
        (_, Some(0)) => ToolOutcome::Ok,
        (ExitPolicy::ZeroOrOne, Some(1)) => ToolOutcome::Findings,
        _ => ToolOutcome::Error,
    }
}

/// Timeout path: SIGTERM, bounded wait, then SIGKILL and a final reap.
async fn reap(child: &mut Child) {
    if let Some(pid) = child.id() {
        let _ = kill(Pid::from_raw(pid as i32), Signal::SIGTERM);
    }
    if tokio::time::timeout(KILL_GRACE, child.wait()).await.is_err() {
        let _ = child.kill().await;
        let _ = child.wait().await;
    }
}

async fn slurp<R: AsyncReadExt + Unpin>(pipe: Option<R>) -> String {
    let Some(mut pipe) = pipe else {
        return String::new();
    };
    let mut buf = Vec::new();
    let _ = pipe.read_to_end(&mut buf).await;
    String::from_utf8_lossy(&buf).into_owned()
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
