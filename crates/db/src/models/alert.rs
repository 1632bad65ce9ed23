//! Escalation alert audit entity.

use serde::Serialize;
use sqlx::FromRow;
use stride_core::types::{DbId, Timestamp};

/// A row from the `alert_records` table.
///
/// `sent = true` rows are immutable once written. A failed delivery is
/// recorded with `sent = false` and the error text so the next sweep can
/// try again.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AlertRecord {
    pub id: DbId,
    pub enrollment_id: DbId,
    pub alert_type: String,
    pub days_inactive: i32,
    pub sent: bool,
    pub sent_at: Option<Timestamp>,
    pub error: Option<String>,
    pub created_at: Timestamp,
}
