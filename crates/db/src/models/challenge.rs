//! Challenge catalog entity.

use serde::Serialize;
use sqlx::FromRow;
use stride_core::types::{DbId, Timestamp};

/// A row from the `challenge_definitions` table.
///
/// Catalog entries are configured via migrations or an operator tool;
/// the engine never writes to this table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ChallengeDefinition {
    pub id: DbId,
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub duration_days: i32,
    pub difficulty: String,
    pub category: String,
    pub discount_percent: i32,
    pub product_ids: Vec<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
