//! Escalation ladder for inactive enrollments.
//!
//! Alert type constants must match the values stored in the
//! `alert_records.alert_type` column and the email templates keyed off
//! them. Classification is pure; the sweep service owns persistence and
//! delivery.

// ---------------------------------------------------------------------------
// Alert type constants
// ---------------------------------------------------------------------------

/// Gentle nudge after two days without a check-in.
pub const ALERT_DAY2: &str = "day2";

/// Stronger warning after five days without a check-in.
pub const ALERT_DAY5: &str = "day5";

/// Final notice after seven days; the enrollment is abandoned.
pub const ALERT_DAY7_RESET: &str = "day7_reset";

// ---------------------------------------------------------------------------
// Policy
// ---------------------------------------------------------------------------

/// Inactivity thresholds, in whole days since the last activity.
///
/// Thresholds are checked highest first, so an enrollment only ever maps
/// to the single most severe applicable alert.
#[derive(Debug, Clone)]
pub struct EscalationPolicy {
    pub nudge_after_days: i64,
    pub warning_after_days: i64,
    pub reset_after_days: i64,
}

impl Default for EscalationPolicy {
    fn default() -> Self {
        Self {
            nudge_after_days: 2,
            warning_after_days: 5,
            reset_after_days: 7,
        }
    }
}

impl EscalationPolicy {
    /// Map days of inactivity to the alert that applies, if any.
    pub fn classify(&self, days_inactive: i64) -> Option<&'static str> {
        if days_inactive >= self.reset_after_days {
            Some(ALERT_DAY7_RESET)
        } else if days_inactive >= self.warning_after_days {
            Some(ALERT_DAY5)
        } else if days_inactive >= self.nudge_after_days {
            Some(ALERT_DAY2)
        } else {
            None
        }
    }

    /// True when the inactivity level calls for abandoning the enrollment.
    pub fn should_abandon(&self, days_inactive: i64) -> bool {
        days_inactive >= self.reset_after_days
    }
}
