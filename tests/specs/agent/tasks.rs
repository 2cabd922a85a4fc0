//! Task lifecycle over the wire: happy path, overload, cooldown, timeout.

use std::sync::Arc;
use std::time::Duration;

use crate::prelude::*;
use pc_analyzers::{FakeAnalyzer, QualityAnalyzer};
use pc_core::{AgentConfig, TaskResults};
use serde_json::json;

#[tokio::test]
async fn accepted_task_gets_exactly_one_done_response() {
    let orchestrator = Orchestrator::bind();
    let analyzer = FakeAnalyzer::succeeding();
    analyzer.queue_success(TaskResults {
        findings_count: 3,
        tools_used: vec!["fake".to_string()],
        ..TaskResults::default()
    });
    let agent = AgentUnderTest::spawn(
        &orchestrator.socket_path,
        Arc::new(analyzer),
        fast_config(),
    );

    let mut conn = orchestrator.accept().await;
    conn.recv().await; // registration

    conn.send(&json!({
        "id": "t1",
        "type": "task",
        "data": {"scope": ["a.py"], "timeout_seconds": 30}
    }))
    .await;

    let response = conn.recv_kind("task").await;
    assert_eq!(response["id"], "t1");
    assert_eq!(response["data"]["status"], "done");
    assert_eq!(response["data"]["results"]["findings_count"], 3);
    assert_eq!(response["data"]["results"]["tools_used"][0], "fake");
    assert!(response["data"]["duration_ms"].as_u64().is_some());
    assert_eq!(response["data"]["agent"], "fake");

    agent.shutdown().await;
}

#[tokio::test]
async fn empty_scope_completes_with_no_tools() {
    let dir = tempfile::tempdir().unwrap();
    let orchestrator = Orchestrator::bind();
    let agent = AgentUnderTest::spawn(
        &orchestrator.socket_path,
        Arc::new(QualityAnalyzer),
        fast_config(),
    );

    let mut conn = orchestrator.accept().await;
    conn.recv().await; // registration

    // an empty directory has no quality-relevant files
    conn.send(&json!({
        "id": "t2",
        "type": "task",
        "data": {"scope": [dir.path().display().to_string()]}
    }))
    .await;

    let response = conn.recv_kind("task").await;
    assert_eq!(response["id"], "t2");
    assert_eq!(response["data"]["status"], "done");
    assert_eq!(response["data"]["results"]["findings_count"], 0);
    // empty tools_used serializes as an absent field
    assert!(response["data"]["results"]["tools_used"].is_null());

    agent.shutdown().await;
}

#[tokio::test]
async fn second_task_is_rejected_at_capacity() {
    let orchestrator = Orchestrator::bind();
    let config = AgentConfig {
        max_active_tasks: 1,
        ..fast_config()
    };
    let analyzer = FakeAnalyzer::succeeding().with_delay(Duration::from_millis(500));
    let agent = AgentUnderTest::spawn(&orchestrator.socket_path, Arc::new(analyzer), config);

    let mut conn = orchestrator.accept().await;
    conn.recv().await; // registration

    conn.send(&json!({"id": "slow", "type": "task", "data": {}})).await;
    conn.send(&json!({"id": "extra", "type": "task", "data": {}})).await;

    let rejection = conn.recv_kind("task").await;
    assert_eq!(rejection["id"], "extra");
    assert_eq!(rejection["data"]["status"], "rejected");
    assert!(rejection["data"]["results"]["error"]
        .as_str()
        .unwrap()
        .contains("overloaded"));

    let done = conn.recv_kind("task").await;
    assert_eq!(done["id"], "slow");
    assert_eq!(done["data"]["status"], "done");

    agent.shutdown().await;
}

#[tokio::test]
async fn cooldown_closes_admission_after_repeated_failures() {
    let orchestrator = Orchestrator::bind();
    let config = AgentConfig {
        max_consecutive_errors: 2,
        ..fast_config()
    };
    let agent = AgentUnderTest::spawn(
        &orchestrator.socket_path,
        Arc::new(FakeAnalyzer::failing("injected failure")),
        config,
    );

    let mut conn = orchestrator.accept().await;
    conn.recv().await; // registration

    for id in ["f1", "f2"] {
        conn.send(&json!({"id": id, "type": "task", "data": {}})).await;
        let response = conn.recv_kind("task").await;
        assert_eq!(response["data"]["status"], "failed");
    }

    conn.send(&json!({"id": "f3", "type": "task", "data": {}})).await;
    let refused = conn.recv_kind("task").await;
    assert_eq!(refused["id"], "f3");
    assert_eq!(refused["data"]["status"], "failed");
    assert!(refused["data"]["results"]["cooldown_remaining"].as_u64().unwrap() > 0);

    agent.shutdown().await;
}

#[tokio::test]
async fn expired_task_times_out_via_the_heartbeat_sweep() {
    let orchestrator = Orchestrator::bind();
    let analyzer = FakeAnalyzer::succeeding().with_delay(Duration::from_secs(30));
    let agent = AgentUnderTest::spawn(
        &orchestrator.socket_path,
        Arc::new(analyzer),
        fast_config(),
    );

    let mut conn = orchestrator.accept().await;
    conn.recv().await; // registration

    conn.send(&json!({
        "id": "t9",
        "type": "task",
        "data": {"timeout_seconds": 0}
    }))
    .await;

    // the next heartbeat sweep (150ms interval) reaps the task
    let response = conn.recv_kind("task").await;
    assert_eq!(response["id"], "t9");
    assert_eq!(response["data"]["status"], "timeout");
    assert!(response["data"]["results"]["error"]
        .as_str()
        .unwrap()
        .contains("timeout"));

    // heartbeats no longer count it
    let heartbeat = conn.recv_kind("heartbeat").await;
    assert_eq!(heartbeat["data"]["active_tasks"], 0);

    agent.shutdown().await;
}
