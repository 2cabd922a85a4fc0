// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The socket IPC client.
//!
//! One duplex Unix-socket connection to the orchestrator, three cooperating
//! loops: the main loop owns the write half and the reconnect state machine,
//! the listen loop owns the read half, the heartbeat loop reports load on a
//! fixed interval. A shared cancellation token stops all three.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use parking_lot::Mutex;
use pc_core::{
    id::fresh_id, now_rfc3339, AgentConfig, AgentStatus, Capabilities, Heartbeat, IpcMessage,
    MessageType, Registration,
};
use serde_json::Value;
use thiserror::Error;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::unix::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::UnixStream;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::metrics::{ConnectionMetrics, ConnectionStats};
use crate::wire::{self, LineDecoder};

/// Consecutive loop errors before a loop gives up on itself.
const LOOP_ERROR_LIMIT: u32 = 5;

/// Read timeout of the listen loop; bounds shutdown latency.
const READ_POLL: Duration = Duration::from_secs(1);

/// Idle poll of the connected main loop.
const IDLE_POLL: Duration = Duration::from_secs(1);

/// Bounded join for the loop workers during shutdown.
const JOIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Outbound queue depth; sends beyond it while draining are dropped.
const OUTBOX_CAPACITY: usize = 64;

/// Client errors
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("gave up after {0} reconnect attempts")]
    ReconnectsExhausted(u32),
}

/// Load snapshot reported in heartbeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskLoad {
    pub active: usize,
    pub limit: usize,
}

/// Inbound message handling, implemented by the agent core.
#[async_trait]
pub trait ClientHandler: Send + Sync {
    /// One inbound `task` message: admission plus dispatch. Must not block.
    async fn handle_task(&self, msg: IpcMessage);

    /// Sweep expired tasks (emitting their timeout responses) and report load.
    async fn sweep_and_load(&self) -> TaskLoad;
}

/// State shared between the loops and the send handle.
pub struct ClientShared {
    agent: String,
    config: AgentConfig,
    socket_path: PathBuf,
    connected: AtomicBool,
    metrics: Mutex<ConnectionMetrics>,
    started: Instant,
    cancel: CancellationToken,
}

impl ClientShared {
    pub fn agent(&self) -> &str {
        &self.agent
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    /// Seconds since the client started.
    pub fn uptime(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }

    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn connection_stats(&self) -> ConnectionStats {
        self.metrics.lock().stats()
    }

    fn mark_connected(&self) {
        self.connected.store(true, Ordering::SeqCst);
        self.metrics.lock().record_connect();
    }

    /// Flip to disconnected; idempotent across racing failure paths.
    fn mark_disconnected(&self, reason: &str) {
        if self.connected.swap(false, Ordering::SeqCst) {
            warn!(reason, "disconnected from orchestrator");
            self.metrics.lock().record_disconnect();
        }
    }

    fn record_failed_connect(&self) {
        self.metrics.lock().record_failed_connect();
    }

    fn record_heartbeat(&self, ok: bool) {
        self.metrics.lock().record_heartbeat(ok);
    }
}

#[cfg(test)]
impl ClientShared {
    pub(crate) fn force_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }
}

/// Cloneable send handle; enqueues onto the main loop's write path.
#[derive(Clone)]
pub struct MessageSender {
    shared: Arc<ClientShared>,
    tx: mpsc::Sender<IpcMessage>,
}

impl MessageSender {
    /// Queue a message for sending. Returns false when disconnected or the
    /// queue is full; dropped messages are not replayed.
    pub fn send(&self, mut msg: IpcMessage) -> bool {
        if !self.shared.is_connected() {
            debug!(kind = %msg.kind, id = %msg.id, "not connected, dropping message");
            return false;
        }
        msg.stamp(&self.shared.agent);
        match self.tx.try_send(msg) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "outbound queue rejected message");
                false
            }
        }
    }

    pub fn shared(&self) -> &Arc<ClientShared> {
        &self.shared
    }
}

pub type Outbox = mpsc::Receiver<IpcMessage>;

pub struct IpcClient {
    shared: Arc<ClientShared>,
    sender: MessageSender,
    outbox: Outbox,
    capabilities: Capabilities,
    handler: Arc<dyn ClientHandler>,
}

impl IpcClient {
    /// Create the shared state and send handle first, so the task handler
    /// can be built around the sender before the client exists.
    pub fn channel(
        socket_path: PathBuf,
        agent: impl Into<String>,
        config: AgentConfig,
        cancel: CancellationToken,
    ) -> (MessageSender, Outbox, Arc<ClientShared>) {
        let shared = Arc::new(ClientShared {
            agent: agent.into(),
            config,
            socket_path,
            connected: AtomicBool::new(false),
            metrics: Mutex::new(ConnectionMetrics::default()),
            started: Instant::now(),
            cancel,
        });
        let (tx, rx) = mpsc::channel(OUTBOX_CAPACITY);
        let sender = MessageSender {
            shared: Arc::clone(&shared),
            tx,
        };
        (sender, rx, shared)
    }

    pub fn new(
        shared: Arc<ClientShared>,
        sender: MessageSender,
        outbox: Outbox,
        capabilities: Capabilities,
        handler: Arc<dyn ClientHandler>,
    ) -> Self {
        IpcClient {
            shared,
            sender,
            outbox,
            capabilities,
            handler,
        }
    }

    /// Run until shutdown or until the reconnect budget is exhausted.
    pub async fn run(mut self) -> Result<(), ClientError> {
        let shared = Arc::clone(&self.shared);
        let cancel = shared.cancel.clone();

        let (reader_tx, reader_rx) = mpsc::channel::<OwnedReadHalf>(1);
        let listen = tokio::spawn(listen_loop(
            Arc::clone(&shared),
            reader_rx,
            Arc::clone(&self.handler),
            self.sender.clone(),
        ));
        let heartbeat = tokio::spawn(heartbeat_loop(
            Arc::clone(&shared),
            Arc::clone(&self.handler),
            self.sender.clone(),
        ));

        let mut writer: Option<OwnedWriteHalf> = None;
        let mut attempts: u32 = 0;

        let result = loop {
            if cancel.is_cancelled() {
                break Ok(());
            }

            if !shared.is_connected() {
                writer = None;
                if attempts >= shared.config.max_reconnect_attempts {
                    error!(
                        attempts,
                        "max reconnection attempts reached, check orchestrator availability"
                    );
                    break Err(ClientError::ReconnectsExhausted(attempts));
                }
                info!(
                    attempt = attempts + 1,
                    max = shared.config.max_reconnect_attempts,
                    socket = %shared.socket_path.display(),
                    "connecting to orchestrator"
                );
                match UnixStream::connect(&shared.socket_path).await {
                    Ok(stream) => {
                        let (read_half, mut write_half) = stream.into_split();
                        // Messages queued while disconnected are stale; drop them.
                        while self.outbox.try_recv().is_ok() {}
                        shared.mark_connected();
                        attempts = 0;

                        // Registration is the first message on every fresh connection.
                        let mut registration = registration_message(&shared, &self.capabilities);
                        registration.stamp(&shared.agent);
                        match write_frame(&mut write_half, &registration).await {
                            Ok(()) => {
                                info!("connected and registered");
                                writer = Some(write_half);
                                let _ = reader_tx.send(read_half).await;
                            }
                            Err(e) => {
                                warn!(error = %e, "failed to send registration");
                                shared.mark_disconnected("registration send failed");
                            }
                        }
                    }
                    Err(e) => {
                        shared.record_failed_connect();
                        let delay = backoff_delay(&shared.config, attempts);
                        attempts += 1;
                        warn!(
                            error = %e,
                            retry_in_s = delay.as_secs(),
                            "failed to connect to orchestrator"
                        );
                        tokio::select! {
                            _ = cancel.cancelled() => break Ok(()),
                            _ = tokio::time::sleep(delay) => {}
                        }
                    }
                }
                continue;
            }

            // Connected: pump the outbox, staying responsive to shutdown and
            // to disconnects flagged by the listen loop.
            tokio::select! {
                _ = cancel.cancelled() => break Ok(()),
                queued = self.outbox.recv() => match queued {
                    Some(msg) => {
                        if let Some(write_half) = writer.as_mut() {
                            if let Err(e) = write_frame(write_half, &msg).await {
                                warn!(error = %e, "send failed");
                                shared.mark_disconnected("send failed");
                            } else {
                                debug!(kind = %msg.kind, id = %msg.id, "message sent");
                            }
                        }
                    }
                    None => break Ok(()),
                },
                _ = tokio::time::sleep(IDLE_POLL) => {}
            }
        };

        // Shutdown: stop the loops, join them bounded, close the socket.
        cancel.cancel();
        join_bounded("listen", listen).await;
        join_bounded("heartbeat", heartbeat).await;
        if let Some(mut write_half) = writer {
            let _ = write_half.shutdown().await;
        }
        shared.mark_disconnected("shutdown");
        info!("client stopped");
        result
    }
}

/// Exponential backoff: `base * 2^attempt`, capped.
fn backoff_delay(config: &AgentConfig, attempt: u32) -> Duration {
    let doublings = attempt.min(6);
    let delay = config.reconnect_base.saturating_mul(1u32 << doublings);
    delay.min(config.reconnect_cap)
}

fn registration_message(shared: &ClientShared, capabilities: &Capabilities) -> IpcMessage {
    let registration = Registration {
        agent: shared.agent.clone(),
        pid: std::process::id(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        capabilities: capabilities.clone(),
    };
    let data = serde_json::to_value(&registration).unwrap_or(Value::Null);
    IpcMessage::with_data("registration", MessageType::Event, data)
}

async fn write_frame(
    writer: &mut OwnedWriteHalf,
    msg: &IpcMessage,
) -> Result<(), wire::ProtocolError> {
    let bytes = wire::encode(msg)?;
    writer.write_all(&bytes).await?;
    writer.flush().await?;
    Ok(())
}

/// Heartbeat loop: sweep deadlines, then report load while connected.
async fn heartbeat_loop(
    shared: Arc<ClientShared>,
    handler: Arc<dyn ClientHandler>,
    sender: MessageSender,
) {
    debug!("heartbeat loop started");
    let mut failures: u32 = 0;

    loop {
        // Sweep first so deadline expiry is observed even while disconnected.
        let load = handler.sweep_and_load().await;

        if shared.is_connected() {
            let heartbeat = Heartbeat {
                agent: shared.agent.clone(),
                pid: std::process::id(),
                status: if load.active == 0 {
                    AgentStatus::Idle
                } else {
                    AgentStatus::Busy
                },
                active_tasks: load.active,
                active_tasks_limit: load.limit,
                uptime: shared.uptime(),
            };
            let data = serde_json::to_value(&heartbeat).unwrap_or(Value::Null);
            let msg = IpcMessage::with_data(fresh_id("heartbeat"), MessageType::Heartbeat, data);
            if sender.send(msg) {
                shared.record_heartbeat(true);
                failures = 0;
            } else {
                shared.record_heartbeat(false);
                failures += 1;
                if failures >= LOOP_ERROR_LIMIT {
                    error!(failures, "too many heartbeat failures, stopping loop");
                    break;
                }
            }
        }

        tokio::select! {
            _ = shared.cancel.cancelled() => break,
            _ = tokio::time::sleep(shared.config.heartbeat_interval) => {}
        }
    }
    debug!("heartbeat loop ended");
}

/// Listen loop: short-timeout reads so shutdown is observed within a second.
async fn listen_loop(
    shared: Arc<ClientShared>,
    mut reader_rx: mpsc::Receiver<OwnedReadHalf>,
    handler: Arc<dyn ClientHandler>,
    sender: MessageSender,
) {
    debug!("listen loop started");
    let mut reader: Option<OwnedReadHalf> = None;
    let mut decoder = LineDecoder::default();
    let mut consecutive_errors: u32 = 0;
    let mut buf = [0u8; 4096];

    loop {
        if shared.cancel.is_cancelled() {
            break;
        }

        // Adopt the freshest connection the main loop handed over.
        while let Ok(fresh) = reader_rx.try_recv() {
            reader = Some(fresh);
            decoder.clear();
            consecutive_errors = 0;
        }

        let Some(read_half) = reader.as_mut() else {
            tokio::select! {
                _ = shared.cancel.cancelled() => break,
                handed = reader_rx.recv() => match handed {
                    Some(fresh) => {
                        reader = Some(fresh);
                        decoder.clear();
                        consecutive_errors = 0;
                    }
                    None => break,
                },
                _ = tokio::time::sleep(READ_POLL) => {}
            }
            continue;
        };

        match tokio::time::timeout(READ_POLL, read_half.read(&mut buf)).await {
            Err(_) => {} // poll timeout; loop to observe shutdown
            Ok(Ok(0)) => {
                // Zero-byte read is an orderly close.
                shared.mark_disconnected("closed by orchestrator");
                reader = None;
            }
            Ok(Ok(n)) => {
                consecutive_errors = 0;
                if let Err(e) = decoder.extend(&buf[..n]) {
                    warn!(error = %e, "dropping oversized frame");
                }
                while let Some(line) = decoder.next_line() {
                    match wire::decode_line(&line) {
                        Ok(msg) => dispatch(msg, &shared, &handler, &sender).await,
                        // Malformed JSON never tears down the connection.
                        Err(e) => warn!(error = %e, "skipping malformed message"),
                    }
                }
            }
            Ok(Err(e)) => {
                consecutive_errors += 1;
                warn!(error = %e, consecutive_errors, "listen error");
                shared.mark_disconnected("read failed");
                reader = None;
                if consecutive_errors >= LOOP_ERROR_LIMIT {
                    error!("too many listen errors, stopping loop");
                    break;
                }
            }
        }
    }
    debug!("listen loop ended");
}

/// Route one inbound message by type.
async fn dispatch(
    msg: IpcMessage,
    shared: &Arc<ClientShared>,
    handler: &Arc<dyn ClientHandler>,
    sender: &MessageSender,
) {
    debug!(kind = %msg.kind, id = %msg.id, "message received");
    match msg.kind {
        MessageType::Task => handler.handle_task(msg).await,
        MessageType::Ping => {
            let pong = IpcMessage::with_data(
                format!("pong-{}", msg.id),
                MessageType::Pong,
                serde_json::json!({
                    "agent": shared.agent,
                    "timestamp": now_rfc3339(),
                    "uptime": shared.uptime(),
                }),
            );
            sender.send(pong);
        }
        MessageType::Pong => {
            let server_time = msg
                .data
                .as_ref()
                .and_then(|d| d.get("server_time"))
                .and_then(Value::as_f64);
            if let Some(server_time) = server_time {
                let now = chrono::Utc::now().timestamp_millis() as f64 / 1000.0;
                debug!(latency_s = now - server_time, "pong received");
            }
        }
        MessageType::Event | MessageType::Heartbeat => {
            debug!(kind = %msg.kind, "no handler for inbound message type");
        }
    }
}

async fn join_bounded(name: &str, handle: tokio::task::JoinHandle<()>) {
    if tokio::time::timeout(JOIN_TIMEOUT, handle).await.is_err() {
        warn!(worker = name, "loop did not stop within the join timeout");
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
