//! Repository for the `enrollments` table.
//!
//! Status strings bound here are always the named constants from
//! `stride_core::status`; no literals.

use sqlx::types::Json;
use sqlx::PgPool;
use stride_core::status::STATUS_ACTIVE;
use stride_core::types::{DbId, Timestamp};

use crate::models::enrollment::{Enrollment, NewEnrollment};

/// Column list for `enrollments` queries. Shared with `progress_repo`,
/// which returns the updated enrollment from its combined write.
pub(crate) const COLUMNS: &str = "\
    id, challenge_id, user_id, email, full_name, status, \
    current_day, missed_days_streak, discount_code, product_snapshot, \
    started_at, completed_at, last_activity_at, created_at, updated_at";

/// CRUD operations for enrollments.
pub struct EnrollmentRepo;

impl EnrollmentRepo {
    /// Insert an enrollment and seed its full progress ledger in one
    /// transaction.
    ///
    /// Seeds exactly `duration_days` rows (day 1..=duration) with
    /// `completed = false`. If the seed insert fails the enrollment row is
    /// rolled back with it, so no enrollment ever exists with a partial
    /// ledger.
    pub async fn create_with_progress(
        pool: &PgPool,
        input: &NewEnrollment,
    ) -> Result<Enrollment, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let insert_query = format!(
            "INSERT INTO enrollments \
                (challenge_id, user_id, email, full_name, discount_code, \
                 product_snapshot, started_at, last_activity_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {COLUMNS}"
        );
        let enrollment = sqlx::query_as::<_, Enrollment>(&insert_query)
            .bind(input.challenge_id)
            .bind(input.user_id)
            .bind(&input.email)
            .bind(&input.full_name)
            .bind(&input.discount_code)
            .bind(Json(&input.product_snapshot))
            .bind(input.started_at)
            .bind(input.started_at)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO progress_entries (enrollment_id, day_number) \
             SELECT $1, generate_series(1, $2)",
        )
        .bind(enrollment.id)
        .bind(input.duration_days)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(enrollment)
    }

    /// Fetch an enrollment by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Enrollment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM enrollments WHERE id = $1");
        sqlx::query_as::<_, Enrollment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all enrollments for an email address, newest first.
    pub async fn list_by_email(
        pool: &PgPool,
        email: &str,
    ) -> Result<Vec<Enrollment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM enrollments \
             WHERE email = $1 \
             ORDER BY started_at DESC"
        );
        sqlx::query_as::<_, Enrollment>(&query)
            .bind(email)
            .fetch_all(pool)
            .await
    }

    /// List every active enrollment, oldest activity first.
    ///
    /// The escalation sweep iterates this set; paused and terminal
    /// enrollments are excluded by definition.
    pub async fn list_active(pool: &PgPool) -> Result<Vec<Enrollment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM enrollments \
             WHERE status = $1 \
             ORDER BY last_activity_at ASC"
        );
        sqlx::query_as::<_, Enrollment>(&query)
            .bind(STATUS_ACTIVE)
            .fetch_all(pool)
            .await
    }

    /// Transition `status` from an expected value to a new one.
    ///
    /// The `from` guard makes the write a compare-and-set: if another
    /// writer changed the status first, no row matches and `None` is
    /// returned. `completed_at` is only written when `Some`, and an
    /// already-set value is never overwritten.
    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        from: &str,
        to: &str,
        completed_at: Option<Timestamp>,
    ) -> Result<Option<Enrollment>, sqlx::Error> {
        let query = format!(
            "UPDATE enrollments SET \
                status = $3, \
                completed_at = COALESCE(completed_at, $4) \
             WHERE id = $1 AND status = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Enrollment>(&query)
            .bind(id)
            .bind(from)
            .bind(to)
            .bind(completed_at)
            .fetch_optional(pool)
            .await
    }

    /// Reactivate a paused enrollment.
    ///
    /// Same compare-and-set shape as [`Self::set_status`], but also
    /// restarts the inactivity clock: `last_activity_at` moves to `now`
    /// and the streak is cleared, so the next escalation sweep does not
    /// count the paused interval against the returning user.
    pub async fn reactivate(
        pool: &PgPool,
        id: DbId,
        from: &str,
        now: Timestamp,
    ) -> Result<Option<Enrollment>, sqlx::Error> {
        let query = format!(
            "UPDATE enrollments SET \
                status = $3, \
                last_activity_at = $4, \
                missed_days_streak = 0 \
             WHERE id = $1 AND status = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Enrollment>(&query)
            .bind(id)
            .bind(from)
            .bind(STATUS_ACTIVE)
            .bind(now)
            .fetch_optional(pool)
            .await
    }

    /// Overwrite the missed-day streak with the sweep's computed value.
    pub async fn update_streak(
        pool: &PgPool,
        id: DbId,
        days_inactive: i32,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE enrollments SET missed_days_streak = $2 WHERE id = $1")
            .bind(id)
            .bind(days_inactive)
            .execute(pool)
            .await?;
        Ok(())
    }
}
