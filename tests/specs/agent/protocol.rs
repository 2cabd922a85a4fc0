//! Protocol-error tolerance: bad frames never tear down the connection.

use std::sync::Arc;

use crate::prelude::*;
use pc_analyzers::FakeAnalyzer;
use serde_json::json;

#[tokio::test]
async fn malformed_json_is_skipped() {
    let orchestrator = Orchestrator::bind();
    let agent = AgentUnderTest::spawn(
        &orchestrator.socket_path,
        Arc::new(FakeAnalyzer::succeeding()),
        fast_config(),
    );

    let mut conn = orchestrator.accept().await;
    conn.recv().await; // registration

    conn.send_raw(b"this is not json\n").await;
    conn.send_raw(b"{\"truncated\": \n").await;

    // the agent is still listening
    conn.send(&json!({"id": "p1", "type": "ping"})).await;
    let pong = conn.recv_kind("pong").await;
    assert_eq!(pong["id"], "pong-p1");

    agent.shutdown().await;
}

#[tokio::test]
async fn unknown_message_type_is_skipped() {
    let orchestrator = Orchestrator::bind();
    let agent = AgentUnderTest::spawn(
        &orchestrator.socket_path,
        Arc::new(FakeAnalyzer::succeeding()),
        fast_config(),
    );

    let mut conn = orchestrator.accept().await;
    conn.recv().await; // registration

    conn.send(&json!({"id": "x1", "type": "gossip", "data": {}})).await;

    conn.send(&json!({"id": "p1", "type": "ping"})).await;
    let pong = conn.recv_kind("pong").await;
    assert_eq!(pong["id"], "pong-p1");

    agent.shutdown().await;
}

#[tokio::test]
async fn frames_split_across_writes_are_reassembled() {
    let orchestrator = Orchestrator::bind();
    let agent = AgentUnderTest::spawn(
        &orchestrator.socket_path,
        Arc::new(FakeAnalyzer::succeeding()),
        fast_config(),
    );

    let mut conn = orchestrator.accept().await;
    conn.recv().await; // registration

    let frame = b"{\"id\": \"p1\", \"type\": \"ping\"}\n";
    let (head, tail) = frame.split_at(12);
    conn.send_raw(head).await;
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    conn.send_raw(tail).await;

    let pong = conn.recv_kind("pong").await;
    assert_eq!(pong["id"], "pong-p1");

    agent.shutdown().await;
}

#[tokio::test]
async fn two_frames_in_one_write_are_both_handled() {
    let orchestrator = Orchestrator::bind();
    let agent = AgentUnderTest::spawn(
        &orchestrator.socket_path,
        Arc::new(FakeAnalyzer::succeeding()),
        fast_config(),
    );

    let mut conn = orchestrator.accept().await;
    conn.recv().await; // registration

    conn.send_raw(b"{\"id\":\"a\",\"type\":\"ping\"}\n{\"id\":\"b\",\"type\":\"ping\"}\n")
        .await;

    let first = conn.recv_kind("pong").await;
    let second = conn.recv_kind("pong").await;
    assert_eq!(first["id"], "pong-a");
    assert_eq!(second["id"], "pong-b");

    agent.shutdown().await;
}
