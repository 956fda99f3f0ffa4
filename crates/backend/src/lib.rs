// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! rex-backend: the execution backend abstraction (spec.md §4.2) and its
//! two implementations — an interactive remote shell over SSH/SFTP
//! (spec.md §4.3) and a locally spawned child process (spec.md §4.4) —
//! plus the key-deployment helpers (spec.md §4.8).

pub mod backend;
pub mod keys;
pub mod local;
pub mod remote;

#[cfg(any(test, feature = "test-support"))]
pub mod fake;

pub use backend::{BackendError, DirEntryAttr, ExecutionBackend, OutputHandler, default_public_key_path};
pub use keys::{copy_key_to_server, delete_key_from_server};
pub use local::LocalBackend;
pub use remote::RemoteBackend;

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeBackend, ScriptedRun};
