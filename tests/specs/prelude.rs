//! Shared harness: an orchestrator stub plus an agent under test.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use pc_agent::{AgentCore, ClientError, IpcClient};
use pc_analyzers::Analyzer;
use pc_core::AgentConfig;
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{UnixListener, UnixStream};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

pub const SPEC_TIMEOUT: Duration = Duration::from_secs(5);

/// Agent config tuned for fast specs.
pub fn fast_config() -> AgentConfig {
    AgentConfig {
        heartbeat_interval: Duration::from_millis(150),
        reconnect_base: Duration::from_millis(50),
        reconnect_cap: Duration::from_millis(200),
        ..AgentConfig::default()
    }
}

/// Orchestrator stub bound to a socket in its own tempdir.
pub struct Orchestrator {
    pub listener: UnixListener,
    pub socket_path: PathBuf,
    _dir: tempfile::TempDir,
}

impl Orchestrator {
    pub fn bind() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let socket_path = dir.path().join("orchestrator.sock");
        let listener = UnixListener::bind(&socket_path).expect("bind socket");
        Orchestrator {
            listener,
            socket_path,
            _dir: dir,
        }
    }

    pub async fn accept(&self) -> Conn {
        let (stream, _) = tokio::time::timeout(SPEC_TIMEOUT, self.listener.accept())
            .await
            .expect("timed out waiting for the agent to connect")
            .expect("accept failed");
        Conn::new(stream)
    }
}

/// One accepted agent connection, framed as JSON lines.
pub struct Conn {
    reader: BufReader<tokio::net::unix::OwnedReadHalf>,
    writer: tokio::net::unix::OwnedWriteHalf,
}

impl Conn {
    fn new(stream: UnixStream) -> Self {
        let (read_half, write_half) = stream.into_split();
        Conn {
            reader: BufReader::new(read_half),
            writer: write_half,
        }
    }

    /// Next frame from the agent.
    pub async fn recv(&mut self) -> Value {
        loop {
            let mut line = String::new();
            let n = tokio::time::timeout(SPEC_TIMEOUT, self.reader.read_line(&mut line))
                .await
                .expect("timed out waiting for a frame")
                .expect("read failed");
            assert!(n > 0, "agent closed the connection");
            if line.trim().is_empty() {
                continue;
            }
            return serde_json::from_str(&line).expect("frame is not valid JSON");
        }
    }

    /// Skip frames until one of the given type arrives.
    pub async fn recv_kind(&mut self, kind: &str) -> Value {
        loop {
            let frame = self.recv().await;
            if frame["type"] == kind {
                return frame;
            }
        }
    }

    /// Send one frame to the agent.
    pub async fn send(&mut self, frame: &Value) {
        let mut bytes = serde_json::to_vec(frame).expect("encode frame");
        bytes.push(b'\n');
        self.writer.write_all(&bytes).await.expect("write failed");
        self.writer.flush().await.expect("flush failed");
    }

    /// Send a raw line, newline included, as-is.
    pub async fn send_raw(&mut self, line: &[u8]) {
        self.writer.write_all(line).await.expect("write failed");
        self.writer.flush().await.expect("flush failed");
    }
}

/// Agent under test, running in-process against the stub's socket.
pub struct AgentUnderTest {
    pub cancel: CancellationToken,
    pub handle: JoinHandle<Result<(), ClientError>>,
}

impl AgentUnderTest {
    pub fn spawn(socket_path: &Path, analyzer: Arc<dyn Analyzer>, config: AgentConfig) -> Self {
        let cancel = CancellationToken::new();
        let (sender, outbox, shared) = IpcClient::channel(
            socket_path.to_path_buf(),
            analyzer.name(),
            config,
            cancel.clone(),
        );
        let capabilities = analyzer.capabilities();
        let core = AgentCore::new(analyzer, sender.clone());
        let client = IpcClient::new(shared, sender, outbox, capabilities, Arc::new(core));
        let handle = tokio::spawn(client.run());
        AgentUnderTest { cancel, handle }
    }

    pub async fn shutdown(self) {
        self.cancel.cancel();
        let _ = tokio::time::timeout(SPEC_TIMEOUT, self.handle).await;
    }
}
