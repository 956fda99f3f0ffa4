// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The execution backend capability set (spec.md §4.2).
//!
//! Every backend — remote or local — provides the same surface, so the
//! orchestrator (`rex-engine`) programs against this trait only and
//! selects a concrete implementation by a boolean `remote` flag rather
//! than by any form of inheritance.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Errors a backend can raise. The orchestrator maps these onto the
/// spec's error kinds (spec.md §7) according to which pipeline step was
/// in flight when the error occurred.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("incorrect password")]
    IncorrectPassword,
    #[error("incorrect public key")]
    IncorrectPublicKey,
    #[error("missing credential")]
    MissingCredential,
    #[error("not connected")]
    NotConnected,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("ssh error: {0}")]
    Ssh(#[from] ssh2::Error),
}

/// One entry from a directory listing (spec.md §4.2: `listdir_attr`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntryAttr {
    pub filename: String,
    pub mtime_seconds: i64,
}

/// A callback invoked with `(now, chunk)` as output arrives on a stream.
/// Synchronous by design: the log ingestion buffer's `write_stdout` /
/// `write_stderr` (spec.md §4.5) are themselves synchronous, so no
/// executor hop is needed per chunk.
pub type OutputHandler<'a> = &'a mut dyn FnMut(DateTime<Utc>, &str);

/// Uniform capability set over which the submission orchestrator operates
/// (spec.md §4.2).
#[async_trait]
pub trait ExecutionBackend: Send + Sync {
    /// Establish a session. Must be idempotent-safe to call `close` after
    /// any outcome, including a failed `connect`.
    async fn connect(
        &mut self,
        password: Option<&str>,
        public_key_path: Option<&Path>,
    ) -> Result<(), BackendError>;

    /// Idempotent release of any open resources.
    async fn close(&mut self) -> Result<(), BackendError>;

    /// Set the working directory; on a remote backend this creates the
    /// directory and any missing parents if absent.
    async fn chdir(&mut self, dir: &Path) -> Result<(), BackendError>;

    /// Write `contents` to `filename`, rooted in the current working
    /// directory (spec.md's `open(filename, "w")`).
    async fn write_file(&mut self, filename: &str, contents: &[u8]) -> Result<(), BackendError>;

    /// Read the full contents of `filename`, rooted in the current
    /// working directory (spec.md's `open(filename, "rb")`).
    async fn read_file(&mut self, filename: &str) -> Result<Vec<u8>, BackendError>;

    /// List `{filename, mtime_seconds}` for the current working directory.
    async fn listdir_attr(&mut self) -> Result<Vec<DirEntryAttr>, BackendError>;

    /// Run a single command, delivering stdout/stderr chunks to the given
    /// handlers as they arrive, returning `true` iff the exit status is
    /// zero. A `timeout` is enforced by wrapping the command so that
    /// exceeding the deadline produces a non-zero exit and thus `false`.
    async fn exec_command(
        &mut self,
        argv: &[String],
        workdir: &Path,
        timeout: Option<Duration>,
        on_stdout: OutputHandler<'_>,
        on_stderr: OutputHandler<'_>,
    ) -> Result<bool, BackendError>;

    /// Install the local public key in `~/.ssh/authorized_keys` on the
    /// target, idempotently.
    async fn deploy_key(&mut self, public_key_path: &Path) -> Result<(), BackendError>;

    /// Remove the local public key from `~/.ssh/authorized_keys` on the
    /// target, idempotently.
    async fn delete_key(&mut self, public_key_path: &Path) -> Result<(), BackendError>;
}

/// Default location of the user's public key, matching the original
/// `~/.ssh/id_rsa.pub` default.
pub fn default_public_key_path() -> std::path::PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join(".ssh")
        .join("id_rsa.pub")
}
