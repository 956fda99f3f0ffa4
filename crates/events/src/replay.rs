// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Replay-on-subscribe (spec.md §6): what a fresh subscriber is primed
//! with before live frames start arriving. The bus itself keeps no
//! history, so this reads straight from the store traits the real
//! (excluded) websocket transport would call through.

use crate::frame::{JobFrame, LogFrame};
use rex_core::{JobId, JobStore, LogStore, StoreResult};

/// The ten most recently modified jobs for `username`, newest first — the
/// replay a fresh `job-user-<username>` subscription receives.
pub async fn job_user_replay(
    job_store: &dyn JobStore,
    username: &str,
) -> StoreResult<Vec<JobFrame>> {
    const REPLAY_LIMIT: usize = 10;
    let jobs = job_store.recent_for_owner(username, REPLAY_LIMIT).await?;
    Ok(jobs
        .into_iter()
        .map(|job| JobFrame {
            job_id: job.id,
            title: job.title,
            status: job.status,
            modified: job.modified,
        })
        .collect())
}

/// The full, time-ordered log history for `job_id` — the replay a fresh
/// `job-log-<job_id>` subscription receives.
pub async fn job_log_replay(
    log_store: &dyn LogStore,
    job_id: &JobId,
) -> StoreResult<Vec<LogFrame>> {
    let logs = log_store.list_for_job(job_id).await?;
    Ok(logs
        .into_iter()
        .map(|log| LogFrame {
            log_id: log.id,
            time: log.time,
            content: log.content,
            stream: log.stream,
        })
        .collect())
}

#[cfg(test)]
#[path = "replay_tests.rs"]
mod tests;
