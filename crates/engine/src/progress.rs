//! Day completion and calendar reads.

use std::collections::HashSet;
use std::sync::Arc;

use stride_core::error::CoreError;
use stride_core::schedule::{resolve_day_states, DayStatus};
use stride_core::status::{state_machine, STATUS_COMPLETED};
use stride_core::types::{DbId, Timestamp};
use stride_db::models::challenge::ChallengeDefinition;
use stride_db::models::enrollment::Enrollment;
use stride_db::models::progress::{ProgressEntry, SetDayCompletion};
use stride_db::repositories::{ChallengeRepo, EnrollmentRepo, ProgressRepo};
use stride_db::DbPool;

use crate::clock::Clock;
use crate::error::EngineError;

/// Progress ledger writes and calendar resolution.
pub struct ProgressService {
    pool: DbPool,
    clock: Arc<dyn Clock>,
}

impl ProgressService {
    pub fn new(pool: DbPool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }

    /// Toggle a day's completion.
    ///
    /// Validation happens before any write, so an out-of-range day or a
    /// missing enrollment leaves the store untouched. The ledger write and
    /// the enrollment-side pointer/streak update are one transaction.
    /// Days complete in any order; nothing requires day 3 before day 10.
    ///
    /// Terminal enrollments are not physically locked: a late check-in on
    /// a completed or abandoned run is accepted and recorded.
    pub async fn set_day_completion(
        &self,
        enrollment_id: DbId,
        day_number: i32,
        input: &SetDayCompletion,
    ) -> Result<ProgressEntry, EngineError> {
        let (enrollment, challenge) = self.load_enrollment(enrollment_id).await?;

        if day_number < 1 || day_number > challenge.duration_days {
            return Err(CoreError::InvalidDay {
                day: day_number,
                duration: challenge.duration_days,
            }
            .into());
        }

        let now = self.clock.now();
        let (entry, updated) = ProgressRepo::set_completion(
            &self.pool,
            enrollment.id,
            day_number,
            input.completed,
            input.notes.as_deref(),
            now,
        )
        .await?
        .ok_or(EngineError::Database(sqlx::Error::RowNotFound))?;

        tracing::info!(
            enrollment_id,
            day_number,
            completed = input.completed,
            current_day = updated.current_day,
            "Day completion recorded"
        );

        if input.completed {
            self.maybe_promote_completed(&updated, now).await?;
        }

        Ok(entry)
    }

    /// All progress rows for an enrollment in day order.
    pub async fn get_progress(
        &self,
        enrollment_id: DbId,
    ) -> Result<Vec<ProgressEntry>, EngineError> {
        self.load_enrollment(enrollment_id).await?;
        Ok(ProgressRepo::list_for_enrollment(&self.pool, enrollment_id).await?)
    }

    /// Resolve the display state of every day in the enrollment.
    ///
    /// Locking follows wall-clock time since the start, not the persisted
    /// `current_day` pointer; completion always wins.
    pub async fn day_grid(&self, enrollment_id: DbId) -> Result<Vec<DayStatus>, EngineError> {
        let (enrollment, challenge) = self.load_enrollment(enrollment_id).await?;
        let entries = ProgressRepo::list_for_enrollment(&self.pool, enrollment_id).await?;

        let completed: HashSet<i32> = entries
            .iter()
            .filter(|e| e.completed)
            .map(|e| e.day_number)
            .collect();

        Ok(resolve_day_states(
            enrollment.started_at,
            self.clock.now(),
            challenge.duration_days,
            &completed,
        ))
    }

    async fn load_enrollment(
        &self,
        enrollment_id: DbId,
    ) -> Result<(Enrollment, ChallengeDefinition), EngineError> {
        let enrollment = EnrollmentRepo::find_by_id(&self.pool, enrollment_id)
            .await?
            .ok_or(CoreError::EnrollmentNotFound { id: enrollment_id })?;

        // The FK guarantees the challenge row exists.
        let challenge = ChallengeRepo::find_by_id(&self.pool, enrollment.challenge_id)
            .await?
            .ok_or(EngineError::Database(sqlx::Error::RowNotFound))?;

        Ok((enrollment, challenge))
    }

    /// Promote an active enrollment to completed once every day is done.
    async fn maybe_promote_completed(
        &self,
        enrollment: &Enrollment,
        now: Timestamp,
    ) -> Result<(), EngineError> {
        if !state_machine::can_transition(&enrollment.status, STATUS_COMPLETED) {
            return Ok(());
        }
        if ProgressRepo::count_incomplete(&self.pool, enrollment.id).await? > 0 {
            return Ok(());
        }

        let promoted = EnrollmentRepo::set_status(
            &self.pool,
            enrollment.id,
            &enrollment.status,
            STATUS_COMPLETED,
            Some(now),
        )
        .await?;

        if promoted.is_some() {
            tracing::info!(enrollment_id = enrollment.id, "Challenge completed");
        }
        Ok(())
    }
}
