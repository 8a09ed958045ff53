//! Verbose sink tests
//!
//! Routing and file-mode behavior of the injected conversation log.

use std::fs;

use ros_api::{VerboseLog, Verbosity};
use tempfile::TempDir;

#[test]
fn test_disabled_sink_accepts_messages() {
    let log = VerboseLog::disabled();
    log.log(">>> /login");
    log.log("");
}

#[test]
fn test_file_sink_writes_lines() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("conversation.log");

    let log = VerboseLog::new(&Verbosity::File {
        path: path.clone(),
        append: false,
    })
    .unwrap();
    log.log(">>> /system/identity/print");
    log.log("<<< !done");
    drop(log);

    let contents = fs::read_to_string(&path).unwrap();
    assert!(contents.contains(">>> /system/identity/print"));
    assert!(contents.contains("<<< !done"));
}

#[test]
fn test_truncate_mode_discards_previous_log() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("conversation.log");
    fs::write(&path, "stale line\n").unwrap();

    let log = VerboseLog::new(&Verbosity::File {
        path: path.clone(),
        append: false,
    })
    .unwrap();
    log.log("fresh line");
    drop(log);

    let contents = fs::read_to_string(&path).unwrap();
    assert!(!contents.contains("stale line"));
    assert!(contents.contains("fresh line"));
}

#[test]
fn test_append_mode_keeps_previous_log() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("conversation.log");
    fs::write(&path, "old session\n").unwrap();

    let log = VerboseLog::new(&Verbosity::File {
        path: path.clone(),
        append: true,
    })
    .unwrap();
    log.log("new session");
    drop(log);

    let contents = fs::read_to_string(&path).unwrap();
    assert!(contents.contains("old session"));
    assert!(contents.contains("new session"));
}

#[test]
fn test_both_mode_writes_the_file_side() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("conversation.log");

    let log = VerboseLog::new(&Verbosity::Both {
        path: path.clone(),
        append: false,
    })
    .unwrap();
    log.log("mirrored line");
    drop(log);

    let contents = fs::read_to_string(&path).unwrap();
    assert!(contents.contains("mirrored line"));
}

#[test]
fn test_bad_log_path_fails_at_construction() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing").join("conversation.log");

    let result = VerboseLog::new(&Verbosity::File {
        path,
        append: false,
    });
    assert!(result.is_err());
}
