//! Pure domain logic for the challenge engine.
//!
//! This crate has zero internal dependencies so the schedule resolver,
//! status state machine, and escalation rules can be used by the API,
//! the repository layer, and the sweep worker alike.

pub mod discount;
pub mod error;
pub mod escalation;
pub mod schedule;
pub mod snapshot;
pub mod status;
pub mod types;

pub use error::CoreError;
