use super::*;
use crate::submit::SubmitOutcome;
use rex_core::{Job, JobId, JobStatus};
use std::path::PathBuf;

fn fake_outcome() -> SubmitOutcome {
    SubmitOutcome {
        job: Job {
            id: JobId::new("job-1"),
            uuid: uuid::Uuid::nil(),
            title: "t".to_string(),
            program: "p".to_string(),
            status: JobStatus::Success,
            remote_directory: PathBuf::from("/tmp"),
            remote_filename: "j.py".to_string(),
            owner: "alice".to_string(),
            server: rex_core::ServerId::new("srv-1"),
            interpreter: rex_core::InterpreterId::new("py"),
            created: chrono::Utc::now(),
            modified: chrono::Utc::now(),
        },
        result_ids: Vec::new(),
        ingest_error: None,
    }
}

fn boxed_ready(outcome: SubmitOutcome) -> SubmitTask {
    Box::pin(async move { Ok(outcome) })
}

#[tokio::test]
async fn no_dispatcher_runs_inline() {
    let handle = dispatch_submit(None, boxed_ready(fake_outcome())).await;
    assert!(matches!(handle, DispatchHandle::Ready(_)));
    let outcome = handle.wait().await.unwrap();
    assert_eq!(outcome.job.status, JobStatus::Success);
}

#[tokio::test]
async fn immediate_dispatcher_runs_inline() {
    let dispatcher = ImmediateDispatcher;
    let handle = dispatch_submit(Some(&dispatcher), boxed_ready(fake_outcome())).await;
    assert!(matches!(handle, DispatchHandle::Ready(_)));
}

#[tokio::test]
async fn tokio_dispatcher_spawns_and_joins() {
    let dispatcher = TokioJobDispatcher;
    let handle = dispatch_submit(Some(&dispatcher), boxed_ready(fake_outcome())).await;
    assert!(matches!(handle, DispatchHandle::Spawned(_)));
    let outcome = handle.wait().await.unwrap();
    assert_eq!(outcome.job.status, JobStatus::Success);
}

#[tokio::test]
async fn a_panicking_dispatched_task_surfaces_as_dispatch_error() {
    let dispatcher = TokioJobDispatcher;
    let task: SubmitTask = Box::pin(async { panic!("boom") });
    let handle = dispatch_submit(Some(&dispatcher), task).await;
    let err = handle.wait().await.unwrap_err();
    assert!(matches!(err, SubmitError::Dispatch(_)));
}
