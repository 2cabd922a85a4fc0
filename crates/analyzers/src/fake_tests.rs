// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[tokio::test]
async fn succeeding_fake_returns_empty_results() {
    let fake = FakeAnalyzer::succeeding();
    let results = fake
        .analyze(&TaskId::new("t1"), &TaskPayload::default())
        .await
        .unwrap();
    assert_eq!(results.findings_count, 0);
    assert_eq!(fake.calls(), 1);
}

#[tokio::test]
async fn failing_fake_returns_analysis_error() {
    let fake = FakeAnalyzer::failing("synthetic failure");
    let err = fake
        .analyze(&TaskId::new("t1"), &TaskPayload::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "analysis_error");
    assert!(err.to_string().contains("synthetic failure"));
}

#[tokio::test]
async fn queued_responses_are_served_in_order() {
    let fake = FakeAnalyzer::succeeding();
    fake.queue_failure("first fails");
    fake.queue_success(TaskResults {
        findings_count: 7,
        ..TaskResults::default()
    });

    let first = fake.analyze(&TaskId::new("a"), &TaskPayload::default()).await;
    assert!(first.is_err());

    let second = fake
        .analyze(&TaskId::new("b"), &TaskPayload::default())
        .await
        .unwrap();
    assert_eq!(second.findings_count, 7);

    // queue exhausted: default response again
    let third = fake
        .analyze(&TaskId::new("c"), &TaskPayload::default())
        .await
        .unwrap();
    assert_eq!(third.findings_count, 0);
}

#[tokio::test]
async fn payloads_are_recorded() {
    let fake = FakeAnalyzer::succeeding();
    let payload = TaskPayload {
        scope: vec!["src/".to_string()],
        ..TaskPayload::default()
    };
    fake.analyze(&TaskId::new("t9"), &payload).await.unwrap();

    let seen = fake.payloads();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].0, "t9");
    assert_eq!(seen[0].1.scope, vec!["src/"]);
}
