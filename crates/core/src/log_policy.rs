// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Log ingestion policy (spec.md §4.5).

use serde::{Deserialize, Serialize};

/// Controls how the log ingestion buffer turns raw output chunks into
/// persisted [`crate::job::Log`] rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogPolicy {
    /// Discard chunks; no Log rows are ever created.
    None,
    /// Persist every chunk as its own Log row, flushed as it arrives.
    Live,
    /// Buffer all chunks for a stream and persist a single Log row per
    /// stream once the command finishes.
    Total,
}

impl Default for LogPolicy {
    fn default() -> Self {
        LogPolicy::Live
    }
}
