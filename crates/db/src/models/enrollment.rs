//! Enrollment entity and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use stride_core::snapshot::ProductSnapshot;
use stride_core::types::{DbId, Timestamp};

/// A row from the `enrollments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Enrollment {
    pub id: DbId,
    pub challenge_id: DbId,
    pub user_id: Option<DbId>,
    pub email: String,
    pub full_name: Option<String>,
    pub status: String,
    pub current_day: i32,
    pub missed_days_streak: i32,
    pub discount_code: String,
    pub product_snapshot: Json<ProductSnapshot>,
    pub started_at: Timestamp,
    pub completed_at: Option<Timestamp>,
    pub last_activity_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for starting an enrollment via `POST /api/v1/enrollments`.
#[derive(Debug, Clone, Deserialize)]
pub struct EnrollInput {
    pub challenge_slug: String,
    pub email: String,
    pub full_name: Option<String>,
    pub user_id: Option<DbId>,
}

/// Fully resolved enrollment insert, produced by the enrollment service
/// after catalog lookup, snapshot building, and code generation.
#[derive(Debug, Clone)]
pub struct NewEnrollment {
    pub challenge_id: DbId,
    pub user_id: Option<DbId>,
    pub email: String,
    pub full_name: Option<String>,
    pub discount_code: String,
    pub product_snapshot: ProductSnapshot,
    pub started_at: Timestamp,
    /// Number of progress rows to seed alongside the enrollment.
    pub duration_days: i32,
}
