//! Repository for the `alert_records` table.

use sqlx::PgPool;
use stride_core::types::{DbId, Timestamp};

use crate::models::alert::AlertRecord;

/// Column list for `alert_records` queries.
const COLUMNS: &str = "\
    id, enrollment_id, alert_type, days_inactive, sent, sent_at, error, \
    created_at";

/// Append-only audit of escalation email attempts.
pub struct AlertRepo;

impl AlertRepo {
    /// True when a successful send is already recorded for the pair.
    pub async fn has_sent(
        pool: &PgPool,
        enrollment_id: DbId,
        alert_type: &str,
    ) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS ( \
                SELECT 1 FROM alert_records \
                WHERE enrollment_id = $1 AND alert_type = $2 AND sent = TRUE \
             )",
        )
        .bind(enrollment_id)
        .bind(alert_type)
        .fetch_one(pool)
        .await?;
        Ok(exists)
    }

    /// Record a successful send.
    ///
    /// The partial unique index on (enrollment_id, alert_type) WHERE sent
    /// makes this safe under concurrent sweeps: the loser of the race
    /// inserts nothing and gets `None` back.
    pub async fn record_sent(
        pool: &PgPool,
        enrollment_id: DbId,
        alert_type: &str,
        days_inactive: i32,
        now: Timestamp,
    ) -> Result<Option<AlertRecord>, sqlx::Error> {
        let query = format!(
            "INSERT INTO alert_records \
                (enrollment_id, alert_type, days_inactive, sent, sent_at) \
             VALUES ($1, $2, $3, TRUE, $4) \
             ON CONFLICT (enrollment_id, alert_type) WHERE sent DO NOTHING \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AlertRecord>(&query)
            .bind(enrollment_id)
            .bind(alert_type)
            .bind(days_inactive)
            .bind(now)
            .fetch_optional(pool)
            .await
    }

    /// Record a failed send attempt for retry on a later sweep.
    pub async fn record_failure(
        pool: &PgPool,
        enrollment_id: DbId,
        alert_type: &str,
        days_inactive: i32,
        error: &str,
    ) -> Result<AlertRecord, sqlx::Error> {
        let query = format!(
            "INSERT INTO alert_records \
                (enrollment_id, alert_type, days_inactive, sent, error) \
             VALUES ($1, $2, $3, FALSE, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AlertRecord>(&query)
            .bind(enrollment_id)
            .bind(alert_type)
            .bind(days_inactive)
            .bind(error)
            .fetch_one(pool)
            .await
    }

    /// Full alert history for an enrollment, oldest first.
    pub async fn list_for_enrollment(
        pool: &PgPool,
        enrollment_id: DbId,
    ) -> Result<Vec<AlertRecord>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM alert_records \
             WHERE enrollment_id = $1 \
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, AlertRecord>(&query)
            .bind(enrollment_id)
            .fetch_all(pool)
            .await
    }
}
