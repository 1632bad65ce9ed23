//! Calendar resolution for challenge day grids.
//!
//! Given an enrollment's start time and the current time, every day of the
//! challenge resolves to exactly one state. The resolver is pure so it can
//! be unit tested without a database and reused by the API read path and
//! the escalation sweep.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Day states
// ---------------------------------------------------------------------------

/// Resolved state of a single challenge day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayState {
    /// The participant checked this day off. Wins over every other state.
    Completed,
    /// The day is in the future and cannot be checked off yet.
    Locked,
    /// The day has passed without being checked off.
    Missed,
    /// The current day, still open for check-in.
    Today,
}

/// One entry of the resolved day grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayStatus {
    pub day: i32,
    pub state: DayState,
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Number of whole days elapsed since `started_at`, never negative.
pub fn whole_days_since(started_at: Timestamp, now: Timestamp) -> i64 {
    (now - started_at).num_days().max(0)
}

/// The 1-based day the enrollment is currently on.
///
/// Day 1 begins the moment the enrollment starts. The result is clamped to
/// `[1, duration_days]`: a start time in the future still resolves to day 1,
/// and time past the end of the challenge stays pinned to the final day.
pub fn elapsed_day(started_at: Timestamp, now: Timestamp, duration_days: i32) -> i32 {
    let raw = whole_days_since(started_at, now) + 1;
    (raw.min(duration_days as i64)).max(1) as i32
}

/// Resolve the full day grid for an enrollment.
///
/// Returns exactly `duration_days` entries in ascending day order. Days in
/// `completed` resolve to [`DayState::Completed`] regardless of position;
/// otherwise days after the elapsed day are locked, days before it are
/// missed, and the elapsed day itself is today.
pub fn resolve_day_states(
    started_at: Timestamp,
    now: Timestamp,
    duration_days: i32,
    completed: &HashSet<i32>,
) -> Vec<DayStatus> {
    let current = elapsed_day(started_at, now, duration_days);

    (1..=duration_days)
        .map(|day| {
            let state = if completed.contains(&day) {
                DayState::Completed
            } else if day > current {
                DayState::Locked
            } else if day < current {
                DayState::Missed
            } else {
                DayState::Today
            };
            DayStatus { day, state }
        })
        .collect()
}
