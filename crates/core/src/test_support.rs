// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::id::{InterpreterId, JobId, ServerId};
use crate::job::{Interpreter, Job, JobStatus, Server};
use chrono::Utc;
use std::collections::BTreeSet;
use std::path::PathBuf;

pub fn test_interpreter(id: &str) -> Interpreter {
    Interpreter {
        id: InterpreterId::new(id),
        name: id.to_string(),
        path: PathBuf::from(format!("/usr/bin/{id}")),
        arguments: vec![],
        created: Utc::now(),
        modified: Utc::now(),
    }
}

pub fn test_server(id: &str, interpreters: impl IntoIterator<Item = InterpreterId>) -> Server {
    Server {
        id: ServerId::new(id),
        title: id.to_string(),
        hostname: format!("{id}.example.org"),
        port: Server::DEFAULT_PORT,
        interpreters: interpreters.into_iter().collect::<BTreeSet<_>>(),
        created: Utc::now(),
        modified: Utc::now(),
    }
}

/// A minimal job, already validated against `server`/`interpreter`, useful
/// wherever a test only cares about the orchestrator path and not about
/// construction edge cases.
pub fn test_job(id: &str, owner: &str, server: &Server, interpreter: &Interpreter) -> Job {
    Job {
        id: JobId::new(id),
        uuid: uuid::Uuid::new_v4(),
        title: id.to_string(),
        program: "#!/bin/sh\necho hi\n".to_string(),
        status: JobStatus::Initial,
        remote_directory: PathBuf::from("/tmp/rex"),
        remote_filename: "job.sh".to_string(),
        owner: owner.to_string(),
        server: server.id.clone(),
        interpreter: interpreter.id.clone(),
        created: Utc::now(),
        modified: Utc::now(),
    }
}
