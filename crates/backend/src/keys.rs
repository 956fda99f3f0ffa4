// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Key-deployment helpers (spec.md §4.8): idempotent installation and
//! removal of a public key from a remote account's `authorized_keys`.

use crate::backend::{BackendError, ExecutionBackend};
use std::path::Path;

/// Reads and trims a public key file to a single `authorized_keys` line.
pub(crate) fn read_public_key(path: &Path) -> Result<String, BackendError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(raw.trim().to_string())
}

/// Appends `key` to `~/.ssh/authorized_keys` unless it is already present,
/// creating `~/.ssh` with `0700` permissions if missing and leaving
/// `authorized_keys` at `0644` afterwards (spec.md §4.8).
pub(crate) fn deploy_script(key: &str) -> String {
    format!(
        "mkdir -p ~/.ssh && chmod 700 ~/.ssh && touch ~/.ssh/authorized_keys && \
         (grep -qxF {key} ~/.ssh/authorized_keys || echo {key} >> ~/.ssh/authorized_keys) && \
         chmod 644 ~/.ssh/authorized_keys",
        key = shell_escape::escape(key.into())
    )
}

/// The body of the helper script `delete_key` uploads to a remote temp
/// path and runs via `bash` (spec.md §4.8): an in-place `sed` removing any
/// `authorized_keys` line matching `key`, with `/` in the key literally
/// escaped so it doesn't collide with the `sed` address delimiter.
pub(crate) fn delete_script_body(key: &str) -> String {
    let address_safe_key = key.replace('/', "\\/");
    format!(
        "sed -i.bak -e /{key}/d $HOME/.ssh/authorized_keys\n",
        key = shell_escape::escape(address_safe_key.into())
    )
}

/// A unique remote path under `/tmp` for the `delete_key` helper script,
/// matching the original's `django-remote-submission-<uuid>` naming.
pub(crate) fn unique_script_path() -> String {
    format!("/tmp/rex-delete-key-{}", uuid::Uuid::new_v4())
}

/// Deploys the local public key to a remote backend already connected and
/// positioned at the account's home (spec.md §4.8).
pub async fn copy_key_to_server(
    backend: &mut dyn ExecutionBackend,
    public_key_path: &Path,
) -> Result<(), BackendError> {
    backend.deploy_key(public_key_path).await
}

/// Removes the local public key from a remote backend.
pub async fn delete_key_from_server(
    backend: &mut dyn ExecutionBackend,
    public_key_path: &Path,
) -> Result<(), BackendError> {
    backend.delete_key(public_key_path).await
}

#[cfg(test)]
#[path = "keys_tests.rs"]
mod tests;
