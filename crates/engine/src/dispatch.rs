// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The deferred-task adapter (spec.md §4.10): lets a caller invoke
//! [`crate::submit_job`] either synchronously or through an injected
//! dispatcher, without the orchestrator itself knowing which mode is in
//! effect. If no dispatcher is supplied the call degrades transparently to
//! running on the caller's own task.

use crate::error::SubmitError;
use crate::submit::SubmitOutcome;
use async_trait::async_trait;
use std::future::Future;
use std::pin::Pin;

/// What one `submit_job` invocation resolves to, boxed so it can cross a
/// dispatcher boundary without the dispatcher needing to know the
/// concrete backend/clock types `submit_job` was instantiated with.
pub type SubmitTask = Pin<Box<dyn Future<Output = Result<SubmitOutcome, SubmitError>> + Send>>;

/// A handle to a dispatched submission. Synchronous and deferred
/// dispatch both produce one of these; the caller awaits it the same way
/// regardless of which path ran.
pub enum DispatchHandle {
    /// The task already ran to completion on the caller's task.
    Ready(Result<SubmitOutcome, SubmitError>),
    /// The task is running on a background task and must be joined.
    Spawned(tokio::task::JoinHandle<Result<SubmitOutcome, SubmitError>>),
}

impl DispatchHandle {
    /// Waits for the dispatched task to finish, regardless of whether it
    /// ran inline or on a background task.
    pub async fn wait(self) -> Result<SubmitOutcome, SubmitError> {
        match self {
            DispatchHandle::Ready(result) => result,
            DispatchHandle::Spawned(handle) => handle
                .await
                .unwrap_or_else(|e| Err(SubmitError::Dispatch(e.to_string()))),
        }
    }
}

/// An optional external collaborator that decides how a submission task
/// actually runs. The core's own code never depends on which
/// implementation is wired in (spec.md §4.10, §9).
#[async_trait]
pub trait JobDispatcher: Send + Sync {
    async fn dispatch(&self, task: SubmitTask) -> DispatchHandle;
}

/// Runs every task inline on the caller's own task — the degrade-to-
/// synchronous behavior required when no real dispatcher is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImmediateDispatcher;

#[async_trait]
impl JobDispatcher for ImmediateDispatcher {
    async fn dispatch(&self, task: SubmitTask) -> DispatchHandle {
        DispatchHandle::Ready(task.await)
    }
}

/// Hands every task to `tokio::spawn`, letting multiple submissions run
/// concurrently on the runtime's task pool (spec.md §5: "multiple
/// invocations may run concurrently against different jobs").
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioJobDispatcher;

#[async_trait]
impl JobDispatcher for TokioJobDispatcher {
    async fn dispatch(&self, task: SubmitTask) -> DispatchHandle {
        DispatchHandle::Spawned(tokio::spawn(task))
    }
}

/// Dispatches `task` through `dispatcher` if one is supplied, otherwise
/// runs it inline — the single call site both entrypoint styles share
/// (spec.md §4.10).
pub async fn dispatch_submit(
    dispatcher: Option<&dyn JobDispatcher>,
    task: SubmitTask,
) -> DispatchHandle {
    match dispatcher {
        Some(dispatcher) => dispatcher.dispatch(task).await,
        None => DispatchHandle::Ready(task.await),
    }
}

#[cfg(test)]
#[path = "dispatch_tests.rs"]
mod tests;
