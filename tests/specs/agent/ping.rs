//! Ping/pong handling.

use std::sync::Arc;

use crate::prelude::*;
use pc_analyzers::FakeAnalyzer;
use serde_json::json;

#[tokio::test]
async fn ping_is_answered_with_a_correlated_pong() {
    let orchestrator = Orchestrator::bind();
    let agent = AgentUnderTest::spawn(
        &orchestrator.socket_path,
        Arc::new(FakeAnalyzer::succeeding()),
        fast_config(),
    );

    let mut conn = orchestrator.accept().await;
    conn.recv().await; // registration

    conn.send(&json!({"id": "p1", "type": "ping"})).await;

    let pong = conn.recv_kind("pong").await;
    assert_eq!(pong["id"], "pong-p1");
    assert_eq!(pong["agent"], "fake");
    assert!(pong["data"]["uptime"].as_f64().unwrap() >= 0.0);
    assert!(pong["data"]["timestamp"].is_string());

    agent.shutdown().await;
}

#[tokio::test]
async fn inbound_pong_is_absorbed_silently() {
    let orchestrator = Orchestrator::bind();
    let agent = AgentUnderTest::spawn(
        &orchestrator.socket_path,
        Arc::new(FakeAnalyzer::succeeding()),
        fast_config(),
    );

    let mut conn = orchestrator.accept().await;
    conn.recv().await; // registration

    conn.send(&json!({
        "id": "pong-x",
        "type": "pong",
        "data": {"server_time": 1700000000.0}
    }))
    .await;

    // the connection stays healthy: a ping still gets its pong
    conn.send(&json!({"id": "p2", "type": "ping"})).await;
    let pong = conn.recv_kind("pong").await;
    assert_eq!(pong["id"], "pong-p2");

    agent.shutdown().await;
}
