// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error kinds for the submission orchestrator (spec.md §7).

use rex_backend::BackendError;
use rex_core::{IllegalTransition, StoreError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("job not found: {0}")]
    JobNotFound(rex_core::JobId),
    #[error("server not found: {0}")]
    ServerNotFound(rex_core::ServerId),
    #[error("interpreter not found: {0}")]
    InterpreterNotFound(rex_core::InterpreterId),

    /// Credential missing or rejected. Surfaced before any `Job` mutation;
    /// `submit_job` aborts without touching the store.
    #[error("authentication failed: {0}")]
    Auth(#[source] BackendError),

    /// Writing the program file failed. The job is marked `Failure`
    /// directly from `Initial` (it never reached `Submitted`) and the
    /// error is re-raised.
    #[error("upload failed: {0}")]
    Upload(#[source] BackendError),

    /// A connect/exec/channel failure after the job was marked
    /// `Submitted`. The job is marked `Failure` and the error re-raised.
    /// A non-zero exit or an enforced timeout is *not* this variant —
    /// both resolve `exec_command` to `Ok(false)`, a normal outcome.
    #[error("transport error: {0}")]
    Transport(#[source] BackendError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("illegal status transition: {0}")]
    IllegalTransition(#[from] IllegalTransition),

    /// A dispatcher's background task panicked or was cancelled before
    /// producing a result.
    #[error("dispatch failed: {0}")]
    Dispatch(String),
}
