//! Idle heartbeats on a fixed interval after registration.

use std::sync::Arc;

use crate::prelude::*;
use pc_analyzers::FakeAnalyzer;

#[tokio::test]
async fn idle_heartbeats_follow_registration() {
    let orchestrator = Orchestrator::bind();
    let agent = AgentUnderTest::spawn(
        &orchestrator.socket_path,
        Arc::new(FakeAnalyzer::succeeding()),
        fast_config(),
    );

    let mut conn = orchestrator.accept().await;
    let registration = conn.recv().await;
    assert_eq!(registration["type"], "event");

    let heartbeat = conn.recv_kind("heartbeat").await;
    let data = &heartbeat["data"];
    assert_eq!(data["agent"], "fake");
    assert_eq!(data["status"], "idle");
    assert_eq!(data["active_tasks"], 0);
    assert_eq!(data["active_tasks_limit"], 10);
    assert!(data["uptime"].as_f64().unwrap() >= 0.0);
    assert!(data["pid"].as_u64().unwrap() > 0);

    // and they keep coming
    let next = conn.recv_kind("heartbeat").await;
    assert_ne!(next["id"], heartbeat["id"]);

    agent.shutdown().await;
}
