// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Time abstraction so tests never depend on wall-clock sleeps.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::sync::Arc;

/// Source of the current time, injected everywhere a timestamp is needed.
///
/// Production code uses [`SystemClock`]; tests use [`FakeClock`] so that
/// log-burst timestamps and entity `created`/`modified` fields are
/// deterministic and the monotonic-timestamp invariants (spec.md §4.5,
/// §8) can be asserted exactly.
pub trait Clock: Clone + Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Real wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only advances when told to. Shared via `Arc` so cloned
/// handles observe the same sequence of ticks.
#[derive(Clone)]
pub struct FakeClock {
    inner: Arc<Mutex<DateTime<Utc>>>,
}

impl FakeClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(start)),
        }
    }

    /// Advance the clock by `duration` and return the new time.
    pub fn advance(&self, duration: chrono::Duration) -> DateTime<Utc> {
        let mut guard = self.inner.lock();
        *guard += duration;
        *guard
    }
}

impl Clock for FakeClock {
    fn now(&self) -> DateTime<Utc> {
        *self.inner.lock()
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
