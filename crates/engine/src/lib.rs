//! Challenge engine services.
//!
//! Everything here sits between the HTTP layer and the repositories:
//! enrollment creation, day completion, calendar resolution, and the
//! escalation sweep. External capabilities (clock, email, catalog) are
//! injected as trait objects so tests can run deterministically.

pub mod catalog;
pub mod clock;
pub mod enrollment;
pub mod error;
pub mod escalation;
pub mod mailer;
pub mod progress;
pub mod scheduler;

pub use catalog::{CatalogConfig, CatalogLookup, HttpCatalog, StaticCatalog};
pub use clock::{Clock, FixedClock, SystemClock};
pub use enrollment::EnrollmentService;
pub use error::EngineError;
pub use escalation::{EscalationService, SweepOutcome};
pub use mailer::{EmailConfig, Mailer, NoopMailer, SmtpMailer};
pub use progress::ProgressService;
pub use scheduler::SweepScheduler;
