// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! pc-agent: the Pit Crew agent runtime.
//!
//! Socket IPC client (framing, reconnect state machine, heartbeat and
//! listen loops), task admission and lifecycle, cooldown policy, standalone
//! mode, and the two agent binaries.

pub mod client;
pub mod cooldown;
pub mod core;
pub mod env;
pub mod logging;
pub mod metrics;
pub mod run;
pub mod standalone;
pub mod tasks;
pub mod wire;

pub use self::core::AgentCore;
pub use client::{ClientError, ClientHandler, ClientShared, IpcClient, MessageSender, TaskLoad};
pub use metrics::{ConnectionMetrics, ConnectionStats};
pub use run::agent_main;
pub use tasks::ActiveTasks;
pub use wire::{LineDecoder, ProtocolError};
