// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Connection health metrics.

use std::time::{Duration, Instant};

use serde::Serialize;

/// Counters updated by the connection state transitions.
#[derive(Debug, Default)]
pub struct ConnectionMetrics {
    connect_count: u64,
    disconnect_count: u64,
    failed_connections: u64,
    heartbeat_success_count: u64,
    heartbeat_failure_count: u64,
    total_connected: Duration,
    connected_since: Option<Instant>,
}

/// Snapshot returned by `connection_stats`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectionStats {
    pub is_connected: bool,
    pub connect_count: u64,
    pub disconnect_count: u64,
    pub failed_connections: u64,
    pub heartbeat_success_count: u64,
    pub heartbeat_failure_count: u64,
    pub total_connected_secs: f64,
    pub current_connection_secs: f64,
}

impl ConnectionMetrics {
    pub fn record_connect(&mut self) {
        self.connect_count += 1;
        self.connected_since = Some(Instant::now());
    }

    pub fn record_disconnect(&mut self) {
        if let Some(since) = self.connected_since.take() {
            self.total_connected += since.elapsed();
        }
        self.disconnect_count += 1;
    }

    pub fn record_failed_connect(&mut self) {
        self.failed_connections += 1;
    }

    pub fn record_heartbeat(&mut self, ok: bool) {
        if ok {
            self.heartbeat_success_count += 1;
        } else {
            self.heartbeat_failure_count += 1;
        }
    }

    pub fn stats(&self) -> ConnectionStats {
        let current = self
            .connected_since
            .map(|since| since.elapsed())
            .unwrap_or_default();
        ConnectionStats {
            is_connected: self.connected_since.is_some(),
            connect_count: self.connect_count,
            disconnect_count: self.disconnect_count,
            failed_connections: self.failed_connections,
            heartbeat_success_count: self.heartbeat_success_count,
            heartbeat_failure_count: self.heartbeat_failure_count,
            total_connected_secs: self.total_connected.as_secs_f64(),
            current_connection_secs: current.as_secs_f64(),
        }
    }
}

#[cfg(test)]
#[path = "metrics_tests.rs"]
mod tests;
