// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The submission orchestrator (spec.md §4.7): drives one job from
//! `Initial` through upload, execution, and result capture to a terminal
//! status.

use crate::error::SubmitError;
use crate::log_buffer::make_log_buffer;
use crate::results::capture_results;
use rex_backend::ExecutionBackend;
use rex_core::{
    Clock, Interpreter, Job, JobId, JobStatus, JobStore, Log, LogPolicy, LogStore, ResultId,
    ResultStore, Server, Stream,
};
use rex_events::{EventSink, JobFrame, LogFrame};
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Per-submission knobs that are not part of the job record itself:
/// credentials, deadline, log policy, and the result glob (spec.md §4.3,
/// §4.5, §4.6, §9).
#[derive(Debug, Clone)]
pub struct SubmitConfig {
    pub password: Option<String>,
    pub public_key_path: Option<PathBuf>,
    pub timeout: Option<Duration>,
    pub log_policy: LogPolicy,
    pub result_patterns: Option<Vec<String>>,
    /// Root directory captured result bytes are copied under, mirroring
    /// the excluded deployment's `media_root` (spec.md §6): a result ends
    /// up at `<media_root>/results/<job.uuid>/<remote_filename>`.
    pub media_root: PathBuf,
}

impl Default for SubmitConfig {
    fn default() -> Self {
        Self {
            password: None,
            public_key_path: None,
            timeout: None,
            log_policy: LogPolicy::default(),
            result_patterns: None,
            media_root: PathBuf::from("media"),
        }
    }
}

/// What came out of one submission run.
#[derive(Debug, Clone)]
pub struct SubmitOutcome {
    pub job: Job,
    pub result_ids: Vec<ResultId>,
    /// Set when result capture (spec.md §4.6) partially or fully failed.
    /// The job's terminal status and any results that *were* captured are
    /// left standing (spec.md §7, `IngestError`: never re-raised).
    pub ingest_error: Option<String>,
}

/// Runs the full pipeline for `job_id`: connect, chdir, upload, mark
/// submitted, execute with log capture, mark terminal, capture results
/// (spec.md §4.7). `server`/`interpreter` are resolved by the caller since
/// they are configuration entities rather than rows this crate owns.
#[allow(clippy::too_many_arguments)]
pub async fn submit_job<B, C>(
    backend: &mut B,
    job_store: &dyn JobStore,
    log_store: &dyn LogStore,
    result_store: &dyn ResultStore,
    events: &dyn EventSink,
    clock: &C,
    job_id: &JobId,
    server: &Server,
    interpreter: &Interpreter,
    config: &SubmitConfig,
) -> Result<SubmitOutcome, SubmitError>
where
    B: ExecutionBackend,
    C: Clock,
{
    let _ = server; // cross-checked by the caller at job-create time (spec.md §3, §7)

    let mut job = job_store.get(job_id).await?;
    let span = tracing::info_span!("submit_job", job_id = %job.id, owner = %job.owner);
    let _enter = span.enter();

    backend
        .connect(config.password.as_deref(), config.public_key_path.as_deref())
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, "authentication failed before any job mutation");
            SubmitError::Auth(e)
        })?;

    if let Err(e) = upload(backend, &job).await {
        tracing::error!(error = %e, "upload failed");
        job.transition_to(JobStatus::Failure, clock.now())?;
        job_store.save(&job).await?;
        emit_job_frame(events, &job).await;
        let _ = backend.close().await;
        return Err(SubmitError::Upload(e));
    }

    job.transition_to(JobStatus::Submitted, clock.now())?;
    job_store.save(&job).await?;
    emit_job_frame(events, &job).await;
    tracing::info!("submitted");

    let mut argv = interpreter.argv_prefix();
    argv.push(job.remote_filename.clone());

    let log_buffer = RefCell::new(make_log_buffer(config.log_policy));
    let pending = RefCell::new(Vec::new());

    let exec_result = {
        let mut on_stdout = |time, content: &str| {
            pending
                .borrow_mut()
                .extend(log_buffer.borrow_mut().ingest(Stream::Stdout, time, content));
        };
        let mut on_stderr = |time, content: &str| {
            pending
                .borrow_mut()
                .extend(log_buffer.borrow_mut().ingest(Stream::Stderr, time, content));
        };

        backend
            .exec_command(
                &argv,
                Path::new("."),
                config.timeout,
                &mut on_stdout,
                &mut on_stderr,
            )
            .await
    };
    let mut pending = pending.into_inner();
    pending.extend(log_buffer.borrow_mut().finish());

    for entry in pending {
        persist_log(log_store, events, &job.id, entry).await?;
    }

    let success = match exec_result {
        Ok(ok) => ok,
        Err(e) => {
            tracing::error!(error = %e, "transport error during execution");
            job.transition_to(JobStatus::Failure, clock.now())?;
            job_store.save(&job).await?;
            emit_job_frame(events, &job).await;
            let _ = backend.close().await;
            return Err(SubmitError::Transport(e));
        }
    };

    let next_status = if success {
        JobStatus::Success
    } else {
        JobStatus::Failure
    };
    job.transition_to(next_status, clock.now())?;
    job_store.save(&job).await?;
    emit_job_frame(events, &job).await;
    tracing::info!(status = %job.status, "terminal status reached");

    let (result_ids, ingest_error) = ingest_results(
        backend,
        result_store,
        &job,
        config.result_patterns.as_deref(),
        &config.media_root,
        clock,
    )
    .await;

    let _ = backend.close().await;

    Ok(SubmitOutcome {
        job,
        result_ids,
        ingest_error,
    })
}

async fn upload<B: ExecutionBackend>(
    backend: &mut B,
    job: &Job,
) -> Result<(), rex_backend::BackendError> {
    backend.chdir(&job.remote_directory).await?;
    backend.write_file(&job.remote_filename, job.program.as_bytes()).await?;
    Ok(())
}

async fn persist_log(
    log_store: &dyn LogStore,
    events: &dyn EventSink,
    job_id: &JobId,
    entry: crate::log_buffer::PendingLog,
) -> Result<(), SubmitError> {
    let log = Log {
        id: rex_core::LogId::new(""),
        time: entry.time,
        content: entry.content,
        stream: entry.stream,
        job: job_id.clone(),
    };
    let log_id = log_store.create(log.clone()).await?;
    events
        .log_created(
            job_id,
            LogFrame {
                log_id,
                time: log.time,
                content: log.content,
                stream: log.stream,
            },
        )
        .await;
    Ok(())
}

/// Result capture (spec.md §4.6) is best-effort once the job has already
/// reached a terminal state: a listing failure or a per-file copy/store
/// failure is recorded on the outcome rather than unwinding the whole
/// submission (spec.md §7, `IngestError`).
async fn ingest_results<B: ExecutionBackend, C: Clock>(
    backend: &mut B,
    result_store: &dyn ResultStore,
    job: &Job,
    patterns: Option<&[String]>,
    media_root: &Path,
    clock: &C,
) -> (Vec<ResultId>, Option<String>) {
    let capture = match capture_results(backend, &job.remote_filename, patterns).await {
        Ok(capture) => capture,
        Err(e) => return (Vec::new(), Some(e.to_string())),
    };

    let mut result_ids = Vec::with_capacity(capture.len());
    let mut errors: Vec<String> = Vec::new();
    for file in capture {
        let key = rex_core::JobResult::storage_key(job.uuid, &file.filename);
        if let Err(e) = write_result_bytes(media_root, &key, &file.contents).await {
            errors.push(format!("{}: {e}", file.filename));
            continue;
        }
        let now = clock.now();
        let result = rex_core::JobResult {
            id: rex_core::ResultId::new(""),
            remote_filename: file.filename,
            local_file: key,
            job: job.id.clone(),
            created: now,
            modified: now,
        };
        match result_store.create(result).await {
            Ok(id) => result_ids.push(id),
            Err(e) => errors.push(e.to_string()),
        }
    }

    let ingest_error = if errors.is_empty() {
        None
    } else {
        Some(errors.join("; "))
    };
    (result_ids, ingest_error)
}

/// Copies one captured file's bytes to `<media_root>/<storage_key>`,
/// creating any missing parent directories (spec.md §4.6, §6: on-disk
/// layout `<media_root>/results/<job_uuid>/<remote_filename>`).
async fn write_result_bytes(media_root: &Path, storage_key: &str, contents: &[u8]) -> std::io::Result<()> {
    let path = media_root.join(storage_key);
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, contents).await
}

async fn emit_job_frame(events: &dyn EventSink, job: &Job) {
    events
        .job_changed(
            &job.owner,
            JobFrame {
                job_id: job.id.clone(),
                title: job.title.clone(),
                status: job.status,
                modified: job.modified,
            },
        )
        .await;
}

#[cfg(test)]
#[path = "submit_tests.rs"]
mod tests;
