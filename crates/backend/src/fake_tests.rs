use super::*;

#[tokio::test]
async fn write_then_read_round_trips() {
    let mut backend = FakeBackend::new();
    backend.write_file("job.sh", b"echo hi").await.unwrap();

    let read_back = backend.read_file("job.sh").await.unwrap();

    assert_eq!(read_back, b"echo hi");
}

#[tokio::test]
async fn exec_command_replays_scripted_run() {
    let mut backend = FakeBackend::new();
    backend.push_run(ScriptedRun {
        stdout: vec!["line one".to_string(), "line two".to_string()],
        stderr: vec!["warn".to_string()],
        success: true,
    });

    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let ok = backend
        .exec_command(
            &["job.sh".to_string()],
            Path::new("."),
            None,
            &mut |_, chunk| stdout.push(chunk.to_string()),
            &mut |_, chunk| stderr.push(chunk.to_string()),
        )
        .await
        .unwrap();

    assert!(ok);
    assert_eq!(stdout, vec!["line one", "line two"]);
    assert_eq!(stderr, vec!["warn"]);
}

#[tokio::test]
async fn exec_command_defaults_to_success_when_unscripted() {
    let mut backend = FakeBackend::new();
    let ok = backend
        .exec_command(
            &["job.sh".to_string()],
            Path::new("."),
            None,
            &mut |_, _| {},
            &mut |_, _| {},
        )
        .await
        .unwrap();

    assert!(ok);
}

#[tokio::test]
async fn deploy_then_delete_key_clears_record() {
    let mut backend = FakeBackend::new();
    let path = PathBuf::from("/home/user/.ssh/id_rsa.pub");

    backend.deploy_key(&path).await.unwrap();
    assert_eq!(backend.deployed_keys(), vec![path.clone()]);

    backend.delete_key(&path).await.unwrap();
    assert!(backend.deployed_keys().is_empty());
}

#[tokio::test]
async fn calls_are_recorded_in_order() {
    let mut backend = FakeBackend::new();
    backend.connect(None, None).await.unwrap();
    backend.write_file("a", b"1").await.unwrap();
    backend.close().await.unwrap();

    assert_eq!(
        backend.calls(),
        vec!["connect".to_string(), "write_file:a".to_string(), "close".to_string()]
    );
}
