// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The fan-out boundary the orchestrator publishes through (spec.md §4.9).
//!
//! Delivery is best-effort and never part of the durability contract: a
//! `Job`/`Log` row is already persisted by the time these are called, so a
//! dropped frame only costs a subscriber a reconnect-and-replay, never
//! correctness (spec.md §7: "Fan-out delivery failures are never surfaced
//! to the caller").

use crate::frame::{JobFrame, LogFrame};
use async_trait::async_trait;

#[async_trait]
pub trait EventSink: Send + Sync {
    /// Publish a job-status change to `job-user-<owner_username>`.
    async fn job_changed(&self, owner_username: &str, frame: JobFrame);

    /// Publish a new log burst to `job-log-<job_id>`.
    async fn log_created(&self, job_id: &rex_core::JobId, frame: LogFrame);
}

/// An `EventSink` that discards every frame. Used wherever a caller has no
/// subscriber transport wired up (e.g. one-off scripts, most unit tests).
#[derive(Debug, Clone, Copy, Default)]
pub struct NullEventSink;

#[async_trait]
impl EventSink for NullEventSink {
    async fn job_changed(&self, _owner_username: &str, _frame: JobFrame) {}

    async fn log_created(&self, _job_id: &rex_core::JobId, _frame: LogFrame) {}
}
