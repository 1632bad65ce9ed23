use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Challenge not found: {slug}")]
    ChallengeNotFound { slug: String },

    #[error("Enrollment not found: {id}")]
    EnrollmentNotFound { id: DbId },

    #[error("Day {day} is out of range for a {duration}-day challenge")]
    InvalidDay { day: i32, duration: i32 },

    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Validation failed: {0}")]
    Validation(String),
}
