//! Repository for the `progress_entries` table.
//!
//! Rows are seeded by `EnrollmentRepo::create_with_progress` and only
//! ever updated here; nothing deletes them.

use sqlx::PgPool;
use stride_core::types::{DbId, Timestamp};

use super::enrollment_repo;
use crate::models::enrollment::Enrollment;
use crate::models::progress::ProgressEntry;

/// Column list for `progress_entries` queries.
const COLUMNS: &str = "\
    id, enrollment_id, day_number, completed, notes, completed_at, \
    created_at, updated_at";

/// Read and update operations for the per-day ledger.
pub struct ProgressRepo;

impl ProgressRepo {
    /// All progress rows for an enrollment in day order.
    pub async fn list_for_enrollment(
        pool: &PgPool,
        enrollment_id: DbId,
    ) -> Result<Vec<ProgressEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM progress_entries \
             WHERE enrollment_id = $1 \
             ORDER BY day_number ASC"
        );
        sqlx::query_as::<_, ProgressEntry>(&query)
            .bind(enrollment_id)
            .fetch_all(pool)
            .await
    }

    /// Fetch a single day's entry.
    pub async fn find_day(
        pool: &PgPool,
        enrollment_id: DbId,
        day_number: i32,
    ) -> Result<Option<ProgressEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM progress_entries \
             WHERE enrollment_id = $1 AND day_number = $2"
        );
        sqlx::query_as::<_, ProgressEntry>(&query)
            .bind(enrollment_id)
            .bind(day_number)
            .fetch_optional(pool)
            .await
    }

    /// Write a day's completion state and its enrollment-side effects in
    /// one transaction.
    ///
    /// The ledger row gets the new `completed` flag and notes;
    /// `completed_at` keeps the first completion time across repeated
    /// completion writes (COALESCE) and clears when the day is unmarked.
    /// The enrollment row gets `last_activity_at` bumped, `current_day`
    /// advanced monotonically (GREATEST keeps it from regressing when an
    /// earlier day is back-filled), and the missed-day streak reset when
    /// the write marks the day completed.
    ///
    /// Returns `None` when the enrollment has no row for that day.
    pub async fn set_completion(
        pool: &PgPool,
        enrollment_id: DbId,
        day_number: i32,
        completed: bool,
        notes: Option<&str>,
        now: Timestamp,
    ) -> Result<Option<(ProgressEntry, Enrollment)>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let entry_query = format!(
            "UPDATE progress_entries SET \
                completed = $3, \
                completed_at = CASE WHEN $3 THEN COALESCE(completed_at, $4) ELSE NULL END, \
                notes = $5 \
             WHERE enrollment_id = $1 AND day_number = $2 \
             RETURNING {COLUMNS}"
        );
        let entry = sqlx::query_as::<_, ProgressEntry>(&entry_query)
            .bind(enrollment_id)
            .bind(day_number)
            .bind(completed)
            .bind(now)
            .bind(notes)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(entry) = entry else {
            tx.rollback().await?;
            return Ok(None);
        };

        let enrollment_query = format!(
            "UPDATE enrollments SET \
                last_activity_at = $2, \
                current_day = GREATEST(current_day, $3), \
                missed_days_streak = CASE WHEN $4 THEN 0 ELSE missed_days_streak END \
             WHERE id = $1 \
             RETURNING {}",
            enrollment_repo::COLUMNS
        );
        let enrollment = sqlx::query_as::<_, Enrollment>(&enrollment_query)
            .bind(enrollment_id)
            .bind(now)
            .bind(day_number)
            .bind(completed)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(enrollment) = enrollment else {
            tx.rollback().await?;
            return Ok(None);
        };

        tx.commit().await?;
        Ok(Some((entry, enrollment)))
    }

    /// Count days not yet completed for an enrollment.
    ///
    /// Zero means the participant has finished the whole challenge.
    pub async fn count_incomplete(
        pool: &PgPool,
        enrollment_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM progress_entries \
             WHERE enrollment_id = $1 AND completed = FALSE",
        )
        .bind(enrollment_id)
        .fetch_one(pool)
        .await?;
        Ok(count)
    }
}
