//! Enrollment status constants and state machine.
//!
//! Statuses are stored as plain text in the `enrollments.status` column;
//! these constants are the only values that may appear there.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Status constants
// ---------------------------------------------------------------------------

/// Enrollment is live; the participant can check in and receives reminders.
pub const STATUS_ACTIVE: &str = "active";

/// Participant finished every day of the challenge. Terminal.
pub const STATUS_COMPLETED: &str = "completed";

/// Enrollment is on hold at the participant's request; the escalation
/// sweep skips paused enrollments.
pub const STATUS_PAUSED: &str = "paused";

/// Enrollment was given up, either explicitly or by the seven-day
/// inactivity reset. Terminal.
pub const STATUS_ABANDONED: &str = "abandoned";

// ---------------------------------------------------------------------------
// State machine
// ---------------------------------------------------------------------------

/// Enrollment status transitions.
///
/// The repository layer re-checks the current status with a
/// compare-and-set; this table is the source of truth for what may
/// be attempted at all.
pub mod state_machine {
    use super::*;

    /// Returns the set of valid target statuses reachable from `from`.
    ///
    /// Terminal states (`completed`, `abandoned`) return an empty slice
    /// because no further transitions are allowed.
    pub fn valid_transitions(from: &str) -> &'static [&'static str] {
        match from {
            STATUS_ACTIVE => &[STATUS_COMPLETED, STATUS_PAUSED, STATUS_ABANDONED],
            STATUS_PAUSED => &[STATUS_ACTIVE, STATUS_ABANDONED],
            // Terminal states
            STATUS_COMPLETED | STATUS_ABANDONED => &[],
            // Unknown status: no transitions allowed
            _ => &[],
        }
    }

    /// Check whether a transition from `from` to `to` is valid.
    pub fn can_transition(from: &str, to: &str) -> bool {
        valid_transitions(from).contains(&to)
    }

    /// Validate a status transition, returning an error for invalid ones.
    pub fn validate_transition(from: &str, to: &str) -> Result<(), CoreError> {
        if can_transition(from, to) {
            Ok(())
        } else {
            Err(CoreError::InvalidTransition {
                from: from.to_string(),
                to: to.to_string(),
            })
        }
    }
}

/// True for statuses with no outgoing transitions.
pub fn is_terminal(status: &str) -> bool {
    matches!(status, STATUS_COMPLETED | STATUS_ABANDONED)
}
