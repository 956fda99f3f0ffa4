// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! An in-memory `ExecutionBackend` for exercising `rex-engine` without a
//! real shell or network. Gated behind `test-support` so downstream
//! crates can depend on it in their own tests.

use crate::backend::{BackendError, DirEntryAttr, ExecutionBackend, OutputHandler};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// A scripted outcome for one `exec_command` call.
#[derive(Clone)]
pub struct ScriptedRun {
    pub stdout: Vec<String>,
    pub stderr: Vec<String>,
    pub success: bool,
}

impl Default for ScriptedRun {
    fn default() -> Self {
        Self {
            stdout: Vec::new(),
            stderr: Vec::new(),
            success: true,
        }
    }
}

#[derive(Default)]
struct State {
    files: HashMap<PathBuf, Vec<u8>>,
    mtimes: HashMap<PathBuf, i64>,
    cwd: PathBuf,
    connected: bool,
    deployed_keys: Vec<PathBuf>,
    runs: Vec<ScriptedRun>,
    calls: Vec<String>,
}

/// An `ExecutionBackend` backed by an in-memory file map and a queue of
/// scripted command outcomes, for deterministic orchestrator tests.
#[derive(Clone, Default)]
pub struct FakeBackend {
    state: Arc<Mutex<State>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues the outcome of the next `exec_command` call.
    pub fn push_run(&self, run: ScriptedRun) {
        self.state.lock().runs.push(run);
    }

    pub fn file(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        self.state.lock().files.get(path.as_ref()).cloned()
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().calls.clone()
    }

    pub fn deployed_keys(&self) -> Vec<PathBuf> {
        self.state.lock().deployed_keys.clone()
    }

    /// Overrides the recorded mtime of a file already written in the
    /// current working directory, for tests asserting the result
    /// capture's mtime filter (spec.md §4.6, §8 property 7).
    pub fn set_mtime(&self, filename: &str, mtime_seconds: i64) {
        let mut state = self.state.lock();
        let path = self.resolve(&state.cwd.clone(), filename);
        state.mtimes.insert(path, mtime_seconds);
    }

    fn resolve(&self, cwd: &Path, filename: &str) -> PathBuf {
        cwd.join(filename)
    }
}

#[async_trait]
impl ExecutionBackend for FakeBackend {
    async fn connect(
        &mut self,
        _password: Option<&str>,
        _public_key_path: Option<&Path>,
    ) -> Result<(), BackendError> {
        let mut state = self.state.lock();
        state.calls.push("connect".to_string());
        state.connected = true;
        Ok(())
    }

    async fn close(&mut self) -> Result<(), BackendError> {
        let mut state = self.state.lock();
        state.calls.push("close".to_string());
        state.connected = false;
        Ok(())
    }

    async fn chdir(&mut self, dir: &Path) -> Result<(), BackendError> {
        let mut state = self.state.lock();
        let next = state.cwd.join(dir);
        state.cwd = next;
        state.calls.push("chdir".to_string());
        Ok(())
    }

    async fn write_file(&mut self, filename: &str, contents: &[u8]) -> Result<(), BackendError> {
        let mut state = self.state.lock();
        let path = self.resolve(&state.cwd.clone(), filename);
        state.files.insert(path.clone(), contents.to_vec());
        state.mtimes.insert(path, Utc::now().timestamp());
        state.calls.push(format!("write_file:{filename}"));
        Ok(())
    }

    async fn read_file(&mut self, filename: &str) -> Result<Vec<u8>, BackendError> {
        let mut state = self.state.lock();
        let path = self.resolve(&state.cwd.clone(), filename);
        state.calls.push(format!("read_file:{filename}"));
        state
            .files
            .get(&path)
            .cloned()
            .ok_or_else(|| BackendError::Io(std::io::Error::from(std::io::ErrorKind::NotFound)))
    }

    async fn listdir_attr(&mut self) -> Result<Vec<DirEntryAttr>, BackendError> {
        let state = self.state.lock();
        Ok(state
            .files
            .keys()
            .filter(|path| path.parent() == Some(state.cwd.as_path()))
            .map(|path| DirEntryAttr {
                filename: path.file_name().unwrap().to_string_lossy().into_owned(),
                mtime_seconds: state.mtimes.get(path).copied().unwrap_or(0),
            })
            .collect())
    }

    async fn exec_command(
        &mut self,
        argv: &[String],
        _workdir: &Path,
        _timeout: Option<Duration>,
        on_stdout: OutputHandler<'_>,
        on_stderr: OutputHandler<'_>,
    ) -> Result<bool, BackendError> {
        let run = {
            let mut state = self.state.lock();
            state.calls.push(format!("exec_command:{}", argv.join(" ")));
            if state.runs.is_empty() {
                ScriptedRun::default()
            } else {
                state.runs.remove(0)
            }
        };

        for line in &run.stdout {
            on_stdout(Utc::now(), line);
        }
        for line in &run.stderr {
            on_stderr(Utc::now(), line);
        }
        Ok(run.success)
    }

    async fn deploy_key(&mut self, public_key_path: &Path) -> Result<(), BackendError> {
        self.state.lock().deployed_keys.push(public_key_path.to_path_buf());
        Ok(())
    }

    async fn delete_key(&mut self, public_key_path: &Path) -> Result<(), BackendError> {
        self.state.lock().deployed_keys.retain(|p| p != public_key_path);
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
