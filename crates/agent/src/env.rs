// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Environment variable handling.

use std::path::PathBuf;
use std::time::Duration;

use pc_core::AgentConfig;

/// Socket used when `SOCKET_PATH` is unset.
pub const DEFAULT_SOCKET_PATH: &str = "/tmp/pit-crew-orchestrator.sock";

/// Orchestrator socket path from `SOCKET_PATH`.
pub fn socket_path() -> PathBuf {
    std::env::var("SOCKET_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_SOCKET_PATH))
}

/// `STANDALONE_MODE=true` runs one in-process analysis instead of connecting.
pub fn standalone_mode() -> bool {
    std::env::var("STANDALONE_MODE").is_ok_and(|v| v.eq_ignore_ascii_case("true"))
}

/// Output root from `OBS_PATH`, default `./obs`.
pub fn obs_path() -> PathBuf {
    std::env::var("OBS_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("./obs"))
}

// Timing overrides (env vars in milliseconds), mainly for tests
fn parse_duration_ms(var: &str) -> Option<Duration> {
    std::env::var(var)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
}

/// Runtime config with any env overrides applied.
pub fn agent_config() -> AgentConfig {
    let mut config = AgentConfig::default();
    if let Some(v) = parse_duration_ms("PC_HEARTBEAT_MS") {
        config.heartbeat_interval = v;
    }
    if let Some(v) = parse_duration_ms("PC_RECONNECT_BASE_MS") {
        config.reconnect_base = v;
    }
    if let Some(v) = parse_duration_ms("PC_RECONNECT_CAP_MS") {
        config.reconnect_cap = v;
    }
    config
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
