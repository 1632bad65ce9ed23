//! Per-day progress ledger entity and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use stride_core::types::{DbId, Timestamp};

/// A row from the `progress_entries` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProgressEntry {
    pub id: DbId,
    pub enrollment_id: DbId,
    pub day_number: i32,
    pub completed: bool,
    pub notes: Option<String>,
    pub completed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for `PUT /api/v1/enrollments/:id/days/:day`.
#[derive(Debug, Clone, Deserialize)]
pub struct SetDayCompletion {
    pub completed: bool,
    pub notes: Option<String>,
}
