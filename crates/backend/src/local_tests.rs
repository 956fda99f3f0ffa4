use super::*;
use std::time::Duration;

fn capture() -> (Vec<(chrono::DateTime<Utc>, String)>, Vec<(chrono::DateTime<Utc>, String)>) {
    (Vec::new(), Vec::new())
}

#[tokio::test]
async fn write_then_read_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let mut backend = LocalBackend::new(dir.path());
    backend.connect(None, None).await.unwrap();

    backend.write_file("job.sh", b"#!/bin/sh\necho hi\n").await.unwrap();
    let read_back = backend.read_file("job.sh").await.unwrap();

    assert_eq!(read_back, b"#!/bin/sh\necho hi\n");
}

#[tokio::test]
async fn listdir_attr_reports_written_files() {
    let dir = tempfile::tempdir().unwrap();
    let mut backend = LocalBackend::new(dir.path());
    backend.write_file("a.txt", b"one").await.unwrap();
    backend.write_file("b.txt", b"two").await.unwrap();

    let mut names: Vec<String> = backend
        .listdir_attr()
        .await
        .unwrap()
        .into_iter()
        .map(|e| e.filename)
        .collect();
    names.sort();

    assert_eq!(names, vec!["a.txt".to_string(), "b.txt".to_string()]);
}

#[tokio::test]
async fn exec_command_reports_success_and_captures_stdout() {
    let dir = tempfile::tempdir().unwrap();
    let mut backend = LocalBackend::new(dir.path());
    let (mut out, mut err) = capture();

    let ok = backend
        .exec_command(
            &["echo".to_string(), "hello".to_string()],
            Path::new("."),
            None,
            &mut |now, chunk| out.push((now, chunk.to_string())),
            &mut |now, chunk| err.push((now, chunk.to_string())),
        )
        .await
        .unwrap();

    assert!(ok);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].1, "hello\n");
    assert!(err.is_empty());
}

#[tokio::test]
async fn exec_command_delivers_raw_chunks_with_newlines_intact() {
    let dir = tempfile::tempdir().unwrap();
    let mut backend = LocalBackend::new(dir.path());
    let (mut out, mut err) = capture();

    backend
        .exec_command(
            &["printf".to_string(), "a\\nb\\n".to_string()],
            Path::new("."),
            None,
            &mut |now, chunk| out.push((now, chunk.to_string())),
            &mut |now, chunk| err.push((now, chunk.to_string())),
        )
        .await
        .unwrap();

    // One read of the whole output, delivered verbatim rather than split
    // into per-line chunks with the newline stripped (spec.md §4.3).
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].1, "a\nb\n");
}

#[tokio::test]
async fn exec_command_splits_large_output_into_1024_byte_chunks() {
    let dir = tempfile::tempdir().unwrap();
    let mut backend = LocalBackend::new(dir.path());
    let (mut out, mut err) = capture();

    // 2500 'x' characters: three chunks of at most 1024 bytes each.
    let script = "printf 'x%.0s' $(seq 1 2500)".to_string();
    backend
        .exec_command(
            &["sh".to_string(), "-c".to_string(), script],
            Path::new("."),
            None,
            &mut |now, chunk| out.push((now, chunk.to_string())),
            &mut |now, chunk| err.push((now, chunk.to_string())),
        )
        .await
        .unwrap();

    assert_eq!(out.len(), 3);
    assert_eq!(out[0].1.len(), 1024);
    assert_eq!(out[1].1.len(), 1024);
    assert_eq!(out[2].1.len(), 452);
    let joined: String = out.iter().map(|(_, s)| s.as_str()).collect();
    assert_eq!(joined, "x".repeat(2500));
}

#[tokio::test]
async fn exec_command_reports_failure_on_nonzero_exit() {
    let dir = tempfile::tempdir().unwrap();
    let mut backend = LocalBackend::new(dir.path());
    let (mut out, mut err) = capture();

    let ok = backend
        .exec_command(
            &["sh".to_string(), "-c".to_string(), "exit 1".to_string()],
            Path::new("."),
            None,
            &mut |now, chunk| out.push((now, chunk.to_string())),
            &mut |now, chunk| err.push((now, chunk.to_string())),
        )
        .await
        .unwrap();

    assert!(!ok);
}

#[tokio::test]
async fn exec_command_times_out_long_running_process() {
    let dir = tempfile::tempdir().unwrap();
    let mut backend = LocalBackend::new(dir.path());
    let (mut out, mut err) = capture();

    let ok = backend
        .exec_command(
            &["sleep".to_string(), "5".to_string()],
            Path::new("."),
            Some(Duration::from_millis(200)),
            &mut |now, chunk| out.push((now, chunk.to_string())),
            &mut |now, chunk| err.push((now, chunk.to_string())),
        )
        .await
        .unwrap();

    assert!(!ok);
}

#[tokio::test]
async fn chdir_is_relative_to_workdir_and_does_not_touch_process_state() {
    let dir = tempfile::tempdir().unwrap();
    let mut backend = LocalBackend::new(dir.path());
    backend.chdir(Path::new("nested")).await.unwrap();
    backend.write_file("inside.txt", b"x").await.unwrap();

    assert!(dir.path().join("nested").join("inside.txt").exists());
}
