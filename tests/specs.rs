//! Black-box behavioral specifications for the `rexd` CLI.
//!
//! These invoke the built binary and assert on its stdout/stderr/exit
//! code, exercising the submission pipeline end-to-end against the local
//! backend (spec.md §8 scenarios S1/S3/S5 — a real SSH target is outside
//! what this workspace-level suite can stand up).

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

#[path = "specs/prelude.rs"]
mod prelude;

#[path = "specs/submit.rs"]
mod submit;
