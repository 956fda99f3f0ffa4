// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Log ingestion buffer policies (spec.md §4.5): how stdout/stderr chunks
//! delivered by an `ExecutionBackend` are staged before they reach a
//! `LogStore`.

use chrono::{DateTime, Utc};
use rex_core::{LogPolicy, Stream};

/// One chunk of output staged for persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingLog {
    pub stream: Stream,
    pub time: DateTime<Utc>,
    pub content: String,
}

/// Stages output chunks according to one of the three policies a job can
/// select (spec.md §4.5). The orchestrator calls `ingest` as each chunk
/// arrives and `finish` once the command has exited; both return the
/// entries that are now ready to hand to a `LogStore`.
pub trait LogBuffer: Send {
    fn ingest(&mut self, stream: Stream, time: DateTime<Utc>, content: &str) -> Vec<PendingLog>;
    fn finish(&mut self) -> Vec<PendingLog>;
}

/// Discards every chunk. Used when a job opts out of log capture entirely.
#[derive(Default)]
pub struct NoneLogBuffer;

impl LogBuffer for NoneLogBuffer {
    fn ingest(&mut self, _stream: Stream, _time: DateTime<Utc>, _content: &str) -> Vec<PendingLog> {
        Vec::new()
    }

    fn finish(&mut self) -> Vec<PendingLog> {
        Vec::new()
    }
}

/// Hands each chunk to the store as soon as it arrives.
#[derive(Default)]
pub struct LiveLogBuffer;

impl LogBuffer for LiveLogBuffer {
    fn ingest(&mut self, stream: Stream, time: DateTime<Utc>, content: &str) -> Vec<PendingLog> {
        vec![PendingLog {
            stream,
            time,
            content: content.to_string(),
        }]
    }

    fn finish(&mut self) -> Vec<PendingLog> {
        Vec::new()
    }
}

/// Accumulates every chunk per stream in memory and, on `finish`, collapses
/// each non-empty sequence into a single Log record (spec.md §4.5: "at most
/// one Log row per stream that produced any output"), `content` being the
/// concatenation of every chunk in arrival order and `time` the last
/// chunk's timestamp.
#[derive(Default)]
pub struct TotalLogBuffer {
    stdout: Vec<(DateTime<Utc>, String)>,
    stderr: Vec<(DateTime<Utc>, String)>,
}

impl TotalLogBuffer {
    fn flush_stream(chunks: &mut Vec<(DateTime<Utc>, String)>, stream: Stream) -> Option<PendingLog> {
        let (time, _) = chunks.last()?.clone();
        let content: String = chunks.iter().map(|(_, text)| text.as_str()).collect();
        chunks.clear();
        Some(PendingLog { stream, time, content })
    }
}

impl LogBuffer for TotalLogBuffer {
    fn ingest(&mut self, stream: Stream, time: DateTime<Utc>, content: &str) -> Vec<PendingLog> {
        let chunks = match stream {
            Stream::Stdout => &mut self.stdout,
            Stream::Stderr => &mut self.stderr,
        };
        chunks.push((time, content.to_string()));
        Vec::new()
    }

    fn finish(&mut self) -> Vec<PendingLog> {
        [
            Self::flush_stream(&mut self.stdout, Stream::Stdout),
            Self::flush_stream(&mut self.stderr, Stream::Stderr),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

/// Constructs the buffer implementation matching a job's configured policy.
pub fn make_log_buffer(policy: LogPolicy) -> Box<dyn LogBuffer> {
    match policy {
        LogPolicy::None => Box::new(NoneLogBuffer),
        LogPolicy::Live => Box::new(LiveLogBuffer),
        LogPolicy::Total => Box::new(TotalLogBuffer::default()),
    }
}

#[cfg(test)]
#[path = "log_buffer_tests.rs"]
mod tests;
