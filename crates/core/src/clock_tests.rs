// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::TimeZone;

#[test]
fn system_clock_advances() {
    let clock = SystemClock;
    let first = clock.now();
    let second = clock.now();
    assert!(second >= first);
}

#[test]
fn fake_clock_holds_time_until_advanced() {
    let start = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
    let clock = FakeClock::new(start);
    assert_eq!(clock.now(), start);
    assert_eq!(clock.now(), start);
}

#[test]
fn fake_clock_advance_is_monotonic() {
    let start = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
    let clock = FakeClock::new(start);
    let next = clock.advance(chrono::Duration::milliseconds(50));
    assert_eq!(next, start + chrono::Duration::milliseconds(50));
    assert!(clock.now() > start);
}

#[test]
fn fake_clock_clones_share_state() {
    let start = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
    let clock = FakeClock::new(start);
    let cloned = clock.clone();
    clock.advance(chrono::Duration::seconds(1));
    assert_eq!(cloned.now(), start + chrono::Duration::seconds(1));
}
