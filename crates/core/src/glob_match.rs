// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Ordered positive/negative glob matching (spec.md §4.1).
//!
//! A pattern without a leading `!` is positive; one with a leading `!` is
//! negative and its tail is the actual shell glob. Patterns are evaluated
//! in order and do not short-circuit: a later pattern always overrides an
//! earlier decision.

use glob::Pattern;

/// Evaluate an ordered pattern list against `filename`.
///
/// A `None`/empty pattern list behaves as `["*"]`. Matching uses standard
/// shell-glob semantics (`*`, `?`, character classes) via the `glob` crate.
/// Malformed patterns are treated as never matching rather than panicking,
/// since the pattern list is user-supplied (spec.md §4.6: `store_results`).
pub fn is_matching<S: AsRef<str>>(filename: &str, patterns: Option<&[S]>) -> bool {
    let patterns: Vec<&str> = match patterns {
        Some(p) if !p.is_empty() => p.iter().map(AsRef::as_ref).collect(),
        _ => vec!["*"],
    };

    let mut matched = false;
    for pattern in patterns {
        if let Some(negated) = pattern.strip_prefix('!') {
            if fnmatch(filename, negated) {
                matched = false;
            }
        } else if fnmatch(filename, pattern) {
            matched = true;
        }
    }
    matched
}

fn fnmatch(filename: &str, pattern: &str) -> bool {
    Pattern::new(pattern)
        .map(|p| p.matches(filename))
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "glob_match_tests.rs"]
mod tests;
