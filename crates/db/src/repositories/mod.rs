//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod alert_repo;
pub mod challenge_repo;
pub mod enrollment_repo;
pub mod progress_repo;

pub use alert_repo::AlertRepo;
pub use challenge_repo::ChallengeRepo;
pub use enrollment_repo::EnrollmentRepo;
pub use progress_repo::ProgressRepo;
