// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! An in-memory `EventSink` standing in for the excluded websocket
//! transport (spec.md §6). Subscriber groups are created lazily and kept
//! alive only as long as something holds a receiver; a group with nobody
//! listening simply drops every frame published to it.

use crate::frame::{JobFrame, LogFrame, job_log_group, job_user_group};
use crate::sink::EventSink;
use async_trait::async_trait;
use parking_lot::Mutex;
use rex_core::JobId;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Default buffer depth for a subscriber group's broadcast channel. A slow
/// subscriber that falls behind by more than this many frames observes a
/// `Lagged` error on its next `recv` rather than unbounded memory growth —
/// acceptable since delivery is best-effort (spec.md §4.9).
const GROUP_CAPACITY: usize = 64;

#[derive(Default)]
struct Groups<F: Clone> {
    channels: HashMap<String, broadcast::Sender<F>>,
}

impl<F: Clone> Groups<F> {
    fn sender(&mut self, group: &str) -> broadcast::Sender<F> {
        self.channels
            .entry(group.to_string())
            .or_insert_with(|| broadcast::channel(GROUP_CAPACITY).0)
            .clone()
    }

    fn publish(&mut self, group: &str, frame: F) {
        // No active subscriber is not an error: the group simply has no
        // sender entry yet, or every receiver has been dropped.
        if let Some(tx) = self.channels.get(group) {
            let _ = tx.send(frame);
        }
    }
}

/// A process-local publish/subscribe bus keyed by subscriber-group name
/// (spec.md §4.9: `job-user-<username>`, `job-log-<job_id>`).
#[derive(Clone, Default)]
pub struct InMemoryBus {
    job_groups: Arc<Mutex<Groups<JobFrame>>>,
    log_groups: Arc<Mutex<Groups<LogFrame>>>,
}

impl InMemoryBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to `job-user-<username>`. Per spec.md §6, a fresh
    /// subscription should be primed with the ten most recently modified
    /// jobs for that user before live frames arrive; callers with access
    /// to a `JobStore` should fetch that replay themselves (this bus has
    /// no store of its own) and send it ahead of this receiver's frames.
    pub fn subscribe_job_user(&self, username: &str) -> broadcast::Receiver<JobFrame> {
        self.job_groups.lock().sender(&job_user_group(username)).subscribe()
    }

    /// Subscribe to `job-log-<job_id>`. As with `subscribe_job_user`, the
    /// full log history replay (spec.md §6) is the caller's responsibility
    /// via a `LogStore`.
    pub fn subscribe_job_log(&self, job_id: &JobId) -> broadcast::Receiver<LogFrame> {
        self.log_groups.lock().sender(&job_log_group(job_id)).subscribe()
    }
}

#[async_trait]
impl EventSink for InMemoryBus {
    async fn job_changed(&self, owner_username: &str, frame: JobFrame) {
        let group = job_user_group(owner_username);
        self.job_groups.lock().publish(&group, frame);
    }

    async fn log_created(&self, job_id: &JobId, frame: LogFrame) {
        let group = job_log_group(job_id);
        self.log_groups.lock().publish(&group, frame);
    }
}

#[cfg(test)]
#[path = "bus_tests.rs"]
mod tests;
