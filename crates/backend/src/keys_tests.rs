use super::*;

#[test]
fn deploy_script_is_idempotent_append() {
    let script = deploy_script("ssh-ed25519 AAAAexample user@host");
    assert!(script.contains("grep -qxF"));
    assert!(script.contains(">> ~/.ssh/authorized_keys"));
    assert!(script.contains("chmod 644 ~/.ssh/authorized_keys"));
    assert!(script.contains("'ssh-ed25519 AAAAexample user@host'"));
}

#[test]
fn delete_script_body_runs_an_in_place_sed_removal() {
    let script = delete_script_body("ssh-ed25519 AAAAexample user@host");
    assert!(script.contains("sed -i.bak -e"));
    assert!(script.contains("$HOME/.ssh/authorized_keys"));
    assert!(script.contains("/d"));
    assert!(script.contains("'ssh-ed25519 AAAAexample user@host'"));
}

#[test]
fn delete_script_body_escapes_slashes_in_the_key() {
    let script = delete_script_body("ssh-rsa AAAA/example user@host");
    // `/` is the sed address delimiter, so a literal `/` in the key must be
    // escaped before the key reaches the address, not left to collide with
    // it (spec.md §4.8).
    assert!(script.contains("AAAA\\/example"));
    assert!(!script.contains("AAAA/example"));
}

#[test]
fn unique_script_path_is_unique_and_under_tmp() {
    let a = unique_script_path();
    let b = unique_script_path();
    assert!(a.starts_with("/tmp/"));
    assert_ne!(a, b);
}

#[test]
fn read_public_key_trims_trailing_newline() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("id_rsa.pub");
    std::fs::write(&path, "ssh-rsa AAAAexample user@host\n").unwrap();

    let key = read_public_key(&path).unwrap();

    assert_eq!(key, "ssh-rsa AAAAexample user@host");
}

#[tokio::test]
async fn copy_and_delete_key_round_trip_against_local_backend() {
    use crate::local::LocalBackend;

    let dir = tempfile::tempdir().unwrap();
    let key_path = dir.path().join("id_rsa.pub");
    std::fs::write(&key_path, "ssh-ed25519 AAAAexample user@host\n").unwrap();

    let mut backend = LocalBackend::new(dir.path());
    // LocalBackend's deploy_key/delete_key are no-ops (spec.md §4.4): a
    // locally run job never needs its own key installed. This exercises
    // only that the helper functions delegate without erroring.
    copy_key_to_server(&mut backend, &key_path).await.unwrap();
    delete_key_from_server(&mut backend, &key_path).await.unwrap();
}
