// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! rex-events: change-notification fan-out to named subscriber groups
//! (spec.md §4.9). Standing in for the excluded websocket transport:
//! defines the frame shapes, the publish boundary the orchestrator calls
//! through, and an in-memory bus for tests and the `rex-cli` demo binary.

pub mod bus;
pub mod frame;
pub mod replay;
pub mod sink;

pub use bus::InMemoryBus;
pub use frame::{JobFrame, LogFrame, job_log_group, job_user_group};
pub use replay::{job_log_replay, job_user_replay};
pub use sink::{EventSink, NullEventSink};
