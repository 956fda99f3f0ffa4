// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Persistence trait boundaries (spec.md §1, §6).
//!
//! The relational store is an external collaborator: this crate only
//! defines the shape the orchestrator depends on, plus an in-memory
//! implementation standing in for it in tests and in the demo binary.
//! Cascade-delete of `Log`/`Result` rows when their `Job` is deleted is the
//! store implementation's responsibility (spec.md §3).

use crate::id::{JobId, LogId, ResultId};
use crate::job::{Job, Log, Result as JobResult};
use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("job {0} not found")]
    JobNotFound(JobId),
    #[error("store is unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Repository for `Job` rows.
#[async_trait]
pub trait JobStore: Send + Sync {
    async fn get(&self, id: &JobId) -> StoreResult<Job>;

    /// Persist `job`. Implementations must make the write visible to any
    /// subsequent `get` before returning, since the orchestrator relies on
    /// this happening strictly before dependent steps begin
    /// (spec.md §5, ordering guarantee (b) and (c)).
    async fn save(&self, job: &Job) -> StoreResult<()>;

    /// The most recently modified jobs for `owner`, most-recent first,
    /// capped at `limit` (used to replay a fresh subscription, spec.md §6).
    async fn recent_for_owner(&self, owner: &str, limit: usize) -> StoreResult<Vec<Job>>;
}

/// Repository for `Log` rows, cascading with their `Job`.
#[async_trait]
pub trait LogStore: Send + Sync {
    async fn create(&self, log: Log) -> StoreResult<LogId>;

    /// All logs for `job`, ordered by time (used to replay a fresh
    /// subscription to a `job-log-<id>` group, spec.md §6).
    async fn list_for_job(&self, job: &JobId) -> StoreResult<Vec<Log>>;

    async fn delete_for_job(&self, job: &JobId) -> StoreResult<()>;
}

/// Repository for `Result` rows, cascading with their `Job`.
#[async_trait]
pub trait ResultStore: Send + Sync {
    async fn create(&self, result: JobResult) -> StoreResult<ResultId>;

    async fn list_for_job(&self, job: &JobId) -> StoreResult<Vec<JobResult>>;

    async fn delete_for_job(&self, job: &JobId) -> StoreResult<()>;
}

/// In-memory implementations standing in for the excluded relational
/// store. Used by the engine's test suite and by the `rex-cli` demo
/// binary; never intended for production persistence.
pub mod memory {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    pub struct MemoryJobStore {
        jobs: Arc<Mutex<HashMap<JobId, Job>>>,
    }

    #[async_trait]
    impl JobStore for MemoryJobStore {
        async fn get(&self, id: &JobId) -> StoreResult<Job> {
            self.jobs
                .lock()
                .get(id)
                .cloned()
                .ok_or_else(|| StoreError::JobNotFound(id.clone()))
        }

        async fn save(&self, job: &Job) -> StoreResult<()> {
            self.jobs.lock().insert(job.id.clone(), job.clone());
            Ok(())
        }

        async fn recent_for_owner(&self, owner: &str, limit: usize) -> StoreResult<Vec<Job>> {
            let mut jobs: Vec<Job> = self
                .jobs
                .lock()
                .values()
                .filter(|j| j.owner == owner)
                .cloned()
                .collect();
            jobs.sort_by(|a, b| b.modified.cmp(&a.modified));
            jobs.truncate(limit);
            Ok(jobs)
        }
    }

    #[derive(Clone, Default)]
    pub struct MemoryLogStore {
        logs: Arc<Mutex<Vec<Log>>>,
        next_id: Arc<Mutex<u64>>,
    }

    #[async_trait]
    impl LogStore for MemoryLogStore {
        async fn create(&self, mut log: Log) -> StoreResult<LogId> {
            let mut next_id = self.next_id.lock();
            let id = LogId::new(format!("log-{next_id}"));
            *next_id += 1;
            log.id = id.clone();
            self.logs.lock().push(log);
            Ok(id)
        }

        async fn list_for_job(&self, job: &JobId) -> StoreResult<Vec<Log>> {
            let mut logs: Vec<Log> = self
                .logs
                .lock()
                .iter()
                .filter(|l| &l.job == job)
                .cloned()
                .collect();
            logs.sort_by(|a, b| a.time.cmp(&b.time));
            Ok(logs)
        }

        async fn delete_for_job(&self, job: &JobId) -> StoreResult<()> {
            self.logs.lock().retain(|l| &l.job != job);
            Ok(())
        }
    }

    #[derive(Clone, Default)]
    pub struct MemoryResultStore {
        results: Arc<Mutex<Vec<JobResult>>>,
        next_id: Arc<Mutex<u64>>,
    }

    #[async_trait]
    impl ResultStore for MemoryResultStore {
        async fn create(&self, mut result: JobResult) -> StoreResult<ResultId> {
            let mut next_id = self.next_id.lock();
            let id = ResultId::new(format!("result-{next_id}"));
            *next_id += 1;
            result.id = id.clone();
            self.results.lock().push(result);
            Ok(id)
        }

        async fn list_for_job(&self, job: &JobId) -> StoreResult<Vec<JobResult>> {
            Ok(self
                .results
                .lock()
                .iter()
                .filter(|r| &r.job == job)
                .cloned()
                .collect())
        }

        async fn delete_for_job(&self, job: &JobId) -> StoreResult<()> {
            self.results.lock().retain(|r| &r.job != job);
            Ok(())
        }
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
