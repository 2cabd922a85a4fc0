// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Messages exchanged with the orchestrator.
//!
//! Wire format: one JSON object per line, UTF-8, `\n`-terminated.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Closed set of message types understood on the orchestrator socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    Task,
    Event,
    Heartbeat,
    Ping,
    Pong,
}

impl std::fmt::Display for MessageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            MessageType::Task => "task",
            MessageType::Event => "event",
            MessageType::Heartbeat => "heartbeat",
            MessageType::Ping => "ping",
            MessageType::Pong => "pong",
        };
        write!(f, "{}", name)
    }
}

/// One framed message on the socket.
///
/// `agent` and `timestamp` are filled in by the sender when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IpcMessage {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: MessageType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl IpcMessage {
    pub fn new(id: impl Into<String>, kind: MessageType) -> Self {
        Self {
            id: id.into(),
            kind,
            agent: None,
            timestamp: None,
            data: None,
        }
    }

    pub fn with_data(id: impl Into<String>, kind: MessageType, data: serde_json::Value) -> Self {
        Self {
            id: id.into(),
            kind,
            agent: None,
            timestamp: None,
            data: Some(data),
        }
    }

    /// Fill in sender fields left empty by the caller.
    pub fn stamp(&mut self, agent: &str) {
        if self.agent.is_none() {
            self.agent = Some(agent.to_string());
        }
        if self.timestamp.is_none() {
            self.timestamp = Some(now_rfc3339());
        }
    }
}

/// Current time as an RFC 3339 string.
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// What an agent can do, advertised in the registration event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Capabilities {
    pub supports_heartbeat: bool,
    pub supports_tasks: bool,
    pub supports_events: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub languages: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scan_types: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub output_formats: Vec<String>,
}

/// Registration event payload, sent exactly once per successful connect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Registration {
    pub agent: String,
    pub pid: u32,
    pub version: String,
    pub capabilities: Capabilities,
}

/// Agent load state reported in heartbeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    Idle,
    Busy,
}

/// Heartbeat payload, sent on a fixed interval while connected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heartbeat {
    pub agent: String,
    pub pid: u32,
    pub status: AgentStatus,
    pub active_tasks: usize,
    pub active_tasks_limit: usize,
    /// Seconds since the agent process started.
    pub uptime: f64,
}

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;
