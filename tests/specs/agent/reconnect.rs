//! Reconnection: orderly close is detected and a fresh registration opens
//! every new connection.

use std::sync::Arc;

use crate::prelude::*;
use pc_analyzers::FakeAnalyzer;
use serde_json::json;

#[tokio::test]
async fn agent_reregisters_after_connection_drop() {
    let orchestrator = Orchestrator::bind();
    let agent = AgentUnderTest::spawn(
        &orchestrator.socket_path,
        Arc::new(FakeAnalyzer::succeeding()),
        fast_config(),
    );

    let mut conn = orchestrator.accept().await;
    let first = conn.recv().await;
    assert_eq!(first["id"], "registration");

    // orchestrator drops the agent
    drop(conn);

    // the agent reconnects with backoff and registers before anything else
    let mut conn = orchestrator.accept().await;
    let reregistration = conn.recv().await;
    assert_eq!(reregistration["type"], "event");
    assert_eq!(reregistration["id"], "registration");

    // the fresh connection works end-to-end
    conn.send(&json!({"id": "p1", "type": "ping"})).await;
    let pong = conn.recv_kind("pong").await;
    assert_eq!(pong["id"], "pong-p1");

    agent.shutdown().await;
}

#[tokio::test]
async fn agent_survives_repeated_drops() {
    let orchestrator = Orchestrator::bind();
    let agent = AgentUnderTest::spawn(
        &orchestrator.socket_path,
        Arc::new(FakeAnalyzer::succeeding()),
        fast_config(),
    );

    for _ in 0..3 {
        let mut conn = orchestrator.accept().await;
        let registration = conn.recv().await;
        assert_eq!(registration["id"], "registration");
        drop(conn);
    }

    // still healthy after three drops
    let mut conn = orchestrator.accept().await;
    conn.recv().await;
    conn.send(&json!({"id": "alive", "type": "ping"})).await;
    let pong = conn.recv_kind("pong").await;
    assert_eq!(pong["id"], "pong-alive");

    agent.shutdown().await;
}

#[tokio::test]
async fn shutdown_stops_the_agent_cleanly() {
    let orchestrator = Orchestrator::bind();
    let agent = AgentUnderTest::spawn(
        &orchestrator.socket_path,
        Arc::new(FakeAnalyzer::succeeding()),
        fast_config(),
    );

    let mut conn = orchestrator.accept().await;
    conn.recv().await; // registration

    agent.cancel.cancel();
    let result = tokio::time::timeout(SPEC_TIMEOUT, agent.handle)
        .await
        .expect("agent did not stop in time")
        .expect("client task panicked");
    assert!(result.is_ok());
}
