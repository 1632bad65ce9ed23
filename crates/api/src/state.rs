use std::sync::Arc;

use stride_engine::{EnrollmentService, EscalationService, ProgressService};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: stride_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Enrollment lifecycle service.
    pub enrollments: Arc<EnrollmentService>,
    /// Day completion and calendar service.
    pub progress: Arc<ProgressService>,
    /// Escalation sweep service; shared with the background scheduler.
    pub escalation: Arc<EscalationService>,
}
