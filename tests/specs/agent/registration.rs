//! Registration is the first message on every fresh connection.

use std::sync::Arc;

use crate::prelude::*;
use pc_analyzers::{FakeAnalyzer, SecurityAnalyzer};

#[tokio::test]
async fn registration_is_the_first_frame() {
    let orchestrator = Orchestrator::bind();
    let agent = AgentUnderTest::spawn(
        &orchestrator.socket_path,
        Arc::new(FakeAnalyzer::succeeding()),
        fast_config(),
    );

    let mut conn = orchestrator.accept().await;
    let first = conn.recv().await;
    assert_eq!(first["type"], "event");
    assert_eq!(first["id"], "registration");

    agent.shutdown().await;
}

#[tokio::test]
async fn registration_carries_identity_and_capabilities() {
    let orchestrator = Orchestrator::bind();
    let agent = AgentUnderTest::spawn(
        &orchestrator.socket_path,
        Arc::new(SecurityAnalyzer),
        fast_config(),
    );

    let mut conn = orchestrator.accept().await;
    let registration = conn.recv().await;
    assert_eq!(registration["agent"], "security");
    assert!(registration["timestamp"].is_string());

    let data = &registration["data"];
    assert_eq!(data["agent"], "security");
    assert!(data["pid"].as_u64().unwrap() > 0);
    assert!(data["version"].is_string());

    let capabilities = &data["capabilities"];
    assert_eq!(capabilities["supports_heartbeat"], true);
    assert_eq!(capabilities["supports_tasks"], true);
    assert_eq!(capabilities["supports_events"], true);
    let tools: Vec<&str> = capabilities["tools"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|v| v.as_str())
        .collect();
    assert!(tools.contains(&"semgrep"));
    assert!(tools.contains(&"gitleaks"));

    agent.shutdown().await;
}
