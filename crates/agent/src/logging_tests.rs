// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn log_path_embeds_the_agent_name() {
    assert_eq!(
        log_path("security"),
        PathBuf::from("/tmp/pit-crew-security-agent.log")
    );
}

#[test]
fn small_log_is_not_rotated() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("agent.log");
    std::fs::write(&path, b"a few lines\n").unwrap();

    rotate_log_if_needed(&path);
    assert!(path.exists());
    assert!(!dir.path().join("agent.log.1").exists());
}

#[test]
fn oversized_log_is_shifted() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("agent.log");
    std::fs::write(&path, vec![b'x'; (MAX_LOG_SIZE + 1) as usize]).unwrap();

    rotate_log_if_needed(&path);
    assert!(!path.exists());
    assert!(dir.path().join("agent.log.1").exists());
}

#[test]
fn rotation_keeps_a_bounded_history() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("agent.log");
    std::fs::write(dir.path().join("agent.log.1"), b"one").unwrap();
    std::fs::write(dir.path().join("agent.log.2"), b"two").unwrap();
    std::fs::write(dir.path().join("agent.log.3"), b"three").unwrap();
    std::fs::write(&path, vec![b'x'; (MAX_LOG_SIZE + 1) as usize]).unwrap();

    rotate_log_if_needed(&path);
    assert_eq!(std::fs::read(dir.path().join("agent.log.2")).unwrap(), b"one");
    assert_eq!(std::fs::read(dir.path().join("agent.log.3")).unwrap(), b"two");
    // the oldest rotation was overwritten; nothing beyond .3 exists
    assert!(!dir.path().join("agent.log.4").exists());
}

#[test]
fn missing_log_is_a_no_op() {
    let dir = tempfile::tempdir().unwrap();
    rotate_log_if_needed(&dir.path().join("missing.log"));
}
