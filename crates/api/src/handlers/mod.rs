//! Request handlers, one module per resource.

pub mod challenges;
pub mod enrollments;
pub mod escalation;
pub mod progress;
