// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! rex-engine: the submission orchestrator that drives a job from
//! `Initial` to a terminal status across an `ExecutionBackend` (spec.md
//! §4.5-§4.7, §4.9-§4.10).

mod dispatch;
mod error;
mod log_buffer;
mod results;
mod submit;

pub use dispatch::{
    DispatchHandle, ImmediateDispatcher, JobDispatcher, SubmitTask, TokioJobDispatcher,
    dispatch_submit,
};
pub use error::SubmitError;
pub use log_buffer::{
    LiveLogBuffer, LogBuffer, NoneLogBuffer, PendingLog, TotalLogBuffer, make_log_buffer,
};
pub use results::capture_results;
pub use submit::{SubmitConfig, SubmitOutcome, submit_job};
