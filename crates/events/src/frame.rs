// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire frames pushed to subscriber groups (spec.md §4.9, §6).
//!
//! These mirror the JSON shapes the excluded websocket transport is
//! specified to carry; this crate only defines the shapes and an
//! in-memory stand-in for the transport itself.

use chrono::{DateTime, Utc};
use rex_core::{JobId, JobStatus, LogId, Stream};
use serde::{Deserialize, Serialize};

/// Pushed to `job-user-<username>` whenever a `Job` row is persisted
/// (spec.md §4.9).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobFrame {
    pub job_id: JobId,
    pub title: String,
    pub status: JobStatus,
    pub modified: DateTime<Utc>,
}

/// Pushed to `job-log-<job_id>` whenever a `Log` row is persisted
/// (spec.md §4.9).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogFrame {
    pub log_id: LogId,
    pub time: DateTime<Utc>,
    pub content: String,
    pub stream: Stream,
}

/// The name of the subscriber group carrying job-status frames for one
/// owner's dashboard (spec.md §4.9: `job-user-<username>`).
pub fn job_user_group(username: &str) -> String {
    format!("job-user-{username}")
}

/// The name of the subscriber group carrying log frames for one job's live
/// view (spec.md §4.9: `job-log-<job_id>`).
pub fn job_log_group(job_id: &JobId) -> String {
    format!("job-log-{job_id}")
}
