// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The local execution backend (spec.md §4.4): drives a locally spawned
//! child process against the local filesystem rather than a remote host.

use crate::backend::{BackendError, DirEntryAttr, ExecutionBackend, OutputHandler};
use async_trait::async_trait;
use chrono::Utc;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Drives a child process in place of a remote shell session.
///
/// `chdir` composes paths relative to `workdir` without touching
/// process-wide state (spec.md §4.4): two `LocalBackend` instances used
/// concurrently from different orchestrator invocations never race on a
/// shared `std::env::current_dir`.
pub struct LocalBackend {
    workdir: PathBuf,
}

impl LocalBackend {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: base_dir.into(),
        }
    }

    fn resolve(&self, filename: &str) -> PathBuf {
        self.workdir.join(filename)
    }
}

#[async_trait]
impl ExecutionBackend for LocalBackend {
    async fn connect(
        &mut self,
        _password: Option<&str>,
        _public_key_path: Option<&Path>,
    ) -> Result<(), BackendError> {
        Ok(())
    }

    async fn close(&mut self) -> Result<(), BackendError> {
        Ok(())
    }

    async fn chdir(&mut self, dir: &Path) -> Result<(), BackendError> {
        self.workdir = self.workdir.join(dir);
        Ok(())
    }

    async fn write_file(&mut self, filename: &str, contents: &[u8]) -> Result<(), BackendError> {
        tokio::fs::create_dir_all(&self.workdir).await?;
        let path = self.resolve(filename);
        let mut file = tokio::fs::File::create(path).await?;
        file.write_all(contents).await?;
        file.flush().await?;
        Ok(())
    }

    async fn read_file(&mut self, filename: &str) -> Result<Vec<u8>, BackendError> {
        let path = self.resolve(filename);
        Ok(tokio::fs::read(path).await?)
    }

    async fn listdir_attr(&mut self) -> Result<Vec<DirEntryAttr>, BackendError> {
        tokio::fs::create_dir_all(&self.workdir).await?;
        let mut entries = tokio::fs::read_dir(&self.workdir).await?;
        let mut attrs = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let metadata = entry.metadata().await?;
            let mtime_seconds = metadata
                .modified()
                .ok()
                .and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok())
                .map(|d| d.as_secs() as i64)
                .unwrap_or(0);
            attrs.push(DirEntryAttr {
                filename: entry.file_name().to_string_lossy().into_owned(),
                mtime_seconds,
            });
        }
        Ok(attrs)
    }

    /// Spawns the child, captures stdout/stderr in full, then replays each
    /// stream back to its handler in up-to-1024-byte chunks, verbatim and
    /// in order, with a freshly sampled `now` per chunk. Real-time delivery
    /// is not required here (spec.md §4.4); only per-stream partitioning
    /// and relative order are.
    async fn exec_command(
        &mut self,
        argv: &[String],
        workdir: &Path,
        timeout: Option<Duration>,
        on_stdout: OutputHandler<'_>,
        on_stderr: OutputHandler<'_>,
    ) -> Result<bool, BackendError> {
        let mut full_argv = Vec::with_capacity(argv.len() + 2);
        if let Some(timeout) = timeout {
            full_argv.push("timeout".to_string());
            full_argv.push(format!("{}s", timeout.as_secs()));
        }
        full_argv.extend(argv.iter().cloned());

        let (program, args) = full_argv
            .split_first()
            .ok_or_else(|| BackendError::Io(std::io::Error::other("empty argv")))?;

        let cwd = self.workdir.join(workdir);
        tokio::fs::create_dir_all(&cwd).await?;

        let mut cmd = Command::new(program);
        cmd.args(args)
            .current_dir(&cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let child = cmd.spawn()?;
        let output = child.wait_with_output().await?;

        emit_chunks(&output.stdout, on_stdout);
        emit_chunks(&output.stderr, on_stderr);

        Ok(output.status.success())
    }

    async fn deploy_key(&mut self, _public_key_path: &Path) -> Result<(), BackendError> {
        Ok(())
    }

    async fn delete_key(&mut self, _public_key_path: &Path) -> Result<(), BackendError> {
        Ok(())
    }
}

/// Splits `bytes` into up-to-1024-byte pieces and hands each to the
/// handler verbatim, decoded as UTF-8 — no line-splitting, no
/// newline-stripping (spec.md §4.3's chunk contract, reused here so the
/// two backends deliver output the same shape). An empty slice produces
/// no calls at all.
const CHUNK_SIZE: usize = 1024;

fn emit_chunks(bytes: &[u8], on_chunk: &mut dyn FnMut(chrono::DateTime<Utc>, &str)) {
    for piece in bytes.chunks(CHUNK_SIZE) {
        let text = String::from_utf8_lossy(piece);
        on_chunk(Utc::now(), &text);
    }
}

#[cfg(test)]
#[path = "local_tests.rs"]
mod tests;
