// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Result capture (spec.md §4.6): after a job's command exits, the working
//! directory is scanned for files the command produced or touched, and
//! matching ones are read back in full.

use rex_backend::{BackendError, ExecutionBackend};
use rex_core::is_matching;

/// One file pulled back from the job's working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedResult {
    pub filename: String,
    pub contents: Vec<u8>,
}

/// Scans the backend's current working directory, locates `remote_filename`
/// (the uploaded program) to read its mtime as `script_mtime`, then reads
/// back every *other* entry whose mtime is at least `script_mtime` and
/// whose name matches `patterns` (spec.md §4.6, §8 property 7: no Result
/// is created for a file strictly older than the program file). A job
/// with no patterns captures every other file touched during the run. If
/// the program file is absent from the listing (nothing wrote over it, or
/// it was consumed by the run) no mtime floor is applied.
///
/// Only a listing failure is fatal: a `read_file` failure on one matching
/// entry is skipped rather than aborting the whole scan, so one bad file
/// never costs the job the results it otherwise captured cleanly
/// (spec.md §7, `IngestError`).
pub async fn capture_results(
    backend: &mut dyn ExecutionBackend,
    remote_filename: &str,
    patterns: Option<&[String]>,
) -> Result<Vec<CapturedResult>, BackendError> {
    let entries = backend.listdir_attr().await?;
    let script_mtime = entries
        .iter()
        .find(|entry| entry.filename == remote_filename)
        .map(|entry| entry.mtime_seconds)
        .unwrap_or(i64::MIN);

    let mut captured = Vec::new();
    for entry in entries {
        if entry.filename == remote_filename {
            continue;
        }
        if entry.mtime_seconds < script_mtime {
            continue;
        }
        if !is_matching(&entry.filename, patterns) {
            continue;
        }
        if let Ok(contents) = backend.read_file(&entry.filename).await {
            captured.push(CapturedResult {
                filename: entry.filename,
                contents,
            });
        }
    }

    Ok(captured)
}

#[cfg(test)]
#[path = "results_tests.rs"]
mod tests;
