// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Entities and the job state machine (spec.md §3).

use crate::id::{InterpreterId, JobId, LogId, ResultId, ServerId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;
use thiserror::Error;

/// Identity + executable contract for a command interpreter (spec.md §3).
///
/// Immutable after creation from the core's viewpoint: nothing in this
/// crate ever mutates an `Interpreter` in place, only replaces it wholesale
/// in a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interpreter {
    pub id: InterpreterId,
    pub name: String,
    pub path: PathBuf,
    pub arguments: Vec<String>,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

impl Interpreter {
    /// The argv prefix this interpreter contributes before the program
    /// filename: `[path, ...arguments]`.
    pub fn argv_prefix(&self) -> Vec<String> {
        let mut argv = vec![self.path.display().to_string()];
        argv.extend(self.arguments.iter().cloned());
        argv
    }
}

/// A target host and the interpreters allowed to run on it (spec.md §3).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Server {
    pub id: ServerId,
    pub title: String,
    pub hostname: String,
    pub port: u16,
    pub interpreters: BTreeSet<InterpreterId>,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

impl Server {
    pub const DEFAULT_PORT: u16 = 22;

    pub fn allows(&self, interpreter: &InterpreterId) -> bool {
        self.interpreters.contains(interpreter)
    }
}

/// Status of a [`Job`] (spec.md §3).
///
/// Lifecycle: created `Initial`; transitions to `Submitted` exactly when
/// the program text has been uploaded; transitions to `Success` iff the
/// execution returns exit status 0 within the deadline and no transport
/// failure occurred; transitions to `Failure` otherwise. `Success` and
/// `Failure` are terminal and sticky.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Initial,
    Submitted,
    Success,
    Failure,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Success | JobStatus::Failure)
    }

    /// Whether transitioning from `self` to `next` is a legal forward move
    /// along `Initial -> Submitted -> {Success, Failure}` (spec.md §8,
    /// property 1: status monotonicity). `Initial -> Failure` is also
    /// legal: an upload failure (spec.md §7 `UploadError`) fails the job
    /// before it ever reaches `Submitted`, since the program text never
    /// made it to the target host.
    pub fn can_transition_to(self, next: JobStatus) -> bool {
        use JobStatus::*;
        matches!(
            (self, next),
            (Initial, Submitted) | (Initial, Failure) | (Submitted, Success) | (Submitted, Failure)
        )
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            JobStatus::Initial => "initial",
            JobStatus::Submitted => "submitted",
            JobStatus::Success => "success",
            JobStatus::Failure => "failure",
        };
        write!(f, "{s}")
    }
}

/// Raised when a [`Job`]'s status transition would violate monotonicity.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("illegal job status transition: {from} -> {to}")]
pub struct IllegalTransition {
    pub from: JobStatus,
    pub to: JobStatus,
}

/// Raised at job-create time when the job's interpreter is not a member of
/// its server's allowed interpreter set (spec.md §7, `ValidationError`).
#[derive(Debug, Error, PartialEq, Eq)]
#[error("interpreter {interpreter} is not available on server {server}")]
pub struct ValidationError {
    pub server: ServerId,
    pub interpreter: InterpreterId,
}

/// A unit of work: a user-supplied program to run on a [`Server`] under an
/// [`Interpreter`] (spec.md §3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    /// Random 128-bit identity, stable across renames, used in on-disk
    /// result paths (`results/<uuid>/<remote_filename>`).
    pub uuid: uuid::Uuid,
    pub title: String,
    pub program: String,
    pub status: JobStatus,
    pub remote_directory: PathBuf,
    pub remote_filename: String,
    pub owner: String,
    pub server: ServerId,
    pub interpreter: InterpreterId,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

impl Job {
    /// Construct a new `Initial` job, checking the cross-entity invariant
    /// that `interpreter` belongs to `server` (spec.md §3, §7).
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: JobId,
        title: impl Into<String>,
        program: impl Into<String>,
        remote_directory: PathBuf,
        remote_filename: impl Into<String>,
        owner: impl Into<String>,
        server: &Server,
        interpreter: &Interpreter,
        now: DateTime<Utc>,
    ) -> std::result::Result<Self, ValidationError> {
        if !server.allows(&interpreter.id) {
            return Err(ValidationError {
                server: server.id.clone(),
                interpreter: interpreter.id.clone(),
            });
        }

        Ok(Self {
            id,
            uuid: uuid::Uuid::new_v4(),
            title: title.into(),
            program: program.into(),
            status: JobStatus::Initial,
            remote_directory,
            remote_filename: remote_filename.into(),
            owner: owner.into(),
            server: server.id.clone(),
            interpreter: interpreter.id.clone(),
            created: now,
            modified: now,
        })
    }

    /// Attempt a status transition, enforcing monotonicity and stickiness
    /// of terminal states (spec.md §8, property 1).
    pub fn transition_to(
        &mut self,
        next: JobStatus,
        now: DateTime<Utc>,
    ) -> std::result::Result<(), IllegalTransition> {
        if !self.status.can_transition_to(next) {
            return Err(IllegalTransition {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        self.modified = now;
        Ok(())
    }
}

/// Which standard stream a [`Log`] burst came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stream {
    Stdout,
    Stderr,
}

impl std::fmt::Display for Stream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stream::Stdout => write!(f, "stdout"),
            Stream::Stderr => write!(f, "stderr"),
        }
    }
}

/// One persisted burst of output (spec.md §3). No `Log` exists without a
/// `Job`; deleting a `Job` cascades its `Log` rows (enforced by whichever
/// [`crate::store::LogStore`] implementation owns the relationship).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Log {
    pub id: LogId,
    pub time: DateTime<Utc>,
    pub content: String,
    pub stream: Stream,
    pub job: JobId,
}

/// One captured output file (spec.md §3, §4.6). Cascades with its `Job`
/// exactly as [`Log`] does.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Result {
    pub id: ResultId,
    pub remote_filename: String,
    /// Storage key resolving to `results/<job.uuid>/<remote_filename>`.
    pub local_file: String,
    pub job: JobId,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

impl Result {
    /// Compute the canonical on-disk storage key for a result
    /// (spec.md §4.6, §6, testable property 6).
    pub fn storage_key(job_uuid: uuid::Uuid, remote_filename: &str) -> String {
        format!("results/{job_uuid}/{remote_filename}")
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
