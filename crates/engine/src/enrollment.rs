//! Enrollment lifecycle service.
//!
//! Creates enrollments (catalog snapshot, discount code, seeded ledger,
//! welcome email) and drives explicit status transitions. The escalation
//! sweep owns the inactivity-driven path in [`crate::escalation`].

use std::sync::Arc;

use stride_core::discount::generate_discount_code;
use stride_core::error::CoreError;
use stride_core::snapshot::build_snapshot;
use stride_core::status::{state_machine, STATUS_ABANDONED, STATUS_ACTIVE, STATUS_PAUSED};
use stride_core::types::{DbId, Timestamp};
use stride_db::models::enrollment::{EnrollInput, Enrollment, NewEnrollment};
use stride_db::repositories::{ChallengeRepo, EnrollmentRepo};
use stride_db::DbPool;

use crate::catalog::CatalogLookup;
use crate::clock::Clock;
use crate::error::EngineError;
use crate::mailer::{Mailer, TEMPLATE_WELCOME};

/// Creates and transitions enrollments.
pub struct EnrollmentService {
    pool: DbPool,
    clock: Arc<dyn Clock>,
    mailer: Arc<dyn Mailer>,
    catalog: Arc<dyn CatalogLookup>,
}

impl EnrollmentService {
    pub fn new(
        pool: DbPool,
        clock: Arc<dyn Clock>,
        mailer: Arc<dyn Mailer>,
        catalog: Arc<dyn CatalogLookup>,
    ) -> Self {
        Self {
            pool,
            clock,
            mailer,
            catalog,
        }
    }

    /// Start a new enrollment.
    ///
    /// Resolves the challenge, freezes the product snapshot at today's
    /// prices, generates the discount code, and seeds the full progress
    /// ledger in one transaction. The welcome email goes out in the
    /// background; a delivery failure never fails the enrollment.
    pub async fn enroll(&self, input: &EnrollInput) -> Result<Enrollment, EngineError> {
        // Format validation belongs to the caller's form layer; only
        // emptiness is rejected here.
        if input.email.trim().is_empty() {
            return Err(CoreError::Validation("email must not be empty".to_string()).into());
        }

        let challenge = ChallengeRepo::find_by_slug(&self.pool, &input.challenge_slug)
            .await?
            .filter(|c| c.is_active)
            .ok_or_else(|| CoreError::ChallengeNotFound {
                slug: input.challenge_slug.clone(),
            })?;

        let products = self.catalog.products_by_ids(&challenge.product_ids).await?;
        let snapshot = build_snapshot(&products, challenge.discount_percent)?;
        let discount_code = generate_discount_code(&challenge.slug);

        let enrollment = EnrollmentRepo::create_with_progress(
            &self.pool,
            &NewEnrollment {
                challenge_id: challenge.id,
                user_id: input.user_id,
                email: input.email.clone(),
                full_name: input.full_name.clone(),
                discount_code,
                product_snapshot: snapshot,
                started_at: self.clock.now(),
                duration_days: challenge.duration_days,
            },
        )
        .await?;

        tracing::info!(
            enrollment_id = enrollment.id,
            challenge = %challenge.slug,
            "Enrollment created"
        );

        self.spawn_welcome_email(&enrollment, &challenge.title);
        Ok(enrollment)
    }

    /// Fetch an enrollment by id.
    pub async fn get(&self, id: DbId) -> Result<Enrollment, EngineError> {
        EnrollmentRepo::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| CoreError::EnrollmentNotFound { id }.into())
    }

    /// All enrollments for an email address, newest first.
    pub async fn list_by_email(&self, email: &str) -> Result<Vec<Enrollment>, EngineError> {
        Ok(EnrollmentRepo::list_by_email(&self.pool, email).await?)
    }

    /// Explicit user-initiated opt-out. Terminal; also stamps
    /// `completed_at` so the run has a visible end time.
    pub async fn abandon(&self, id: DbId) -> Result<Enrollment, EngineError> {
        let now = self.clock.now();
        self.transition(id, STATUS_ABANDONED, Some(now)).await
    }

    /// Put an enrollment on hold. Paused enrollments are skipped by the
    /// escalation sweep.
    pub async fn pause(&self, id: DbId) -> Result<Enrollment, EngineError> {
        self.transition(id, STATUS_PAUSED, None).await
    }

    /// Take an enrollment off hold.
    ///
    /// Restarts the inactivity clock alongside the status change, so the
    /// next sweep does not hold the paused interval against the user.
    pub async fn resume(&self, id: DbId) -> Result<Enrollment, EngineError> {
        let current = self.get(id).await?;
        state_machine::validate_transition(&current.status, STATUS_ACTIVE)?;

        let now = self.clock.now();
        match EnrollmentRepo::reactivate(&self.pool, id, &current.status, now).await? {
            Some(updated) => {
                tracing::info!(
                    enrollment_id = id,
                    from = %current.status,
                    to = STATUS_ACTIVE,
                    "Status changed"
                );
                Ok(updated)
            }
            None => {
                let fresh = self.get(id).await?;
                Err(CoreError::InvalidTransition {
                    from: fresh.status,
                    to: STATUS_ACTIVE.to_string(),
                }
                .into())
            }
        }
    }

    /// Validate and apply a status transition.
    ///
    /// The repository write is a compare-and-set on the status read here;
    /// if a concurrent writer wins, the fresh status is reported in the
    /// error instead of silently overwriting.
    async fn transition(
        &self,
        id: DbId,
        to: &str,
        completed_at: Option<Timestamp>,
    ) -> Result<Enrollment, EngineError> {
        let current = self.get(id).await?;
        state_machine::validate_transition(&current.status, to)?;

        match EnrollmentRepo::set_status(&self.pool, id, &current.status, to, completed_at).await? {
            Some(updated) => {
                tracing::info!(enrollment_id = id, from = %current.status, to, "Status changed");
                Ok(updated)
            }
            None => {
                let fresh = self.get(id).await?;
                Err(CoreError::InvalidTransition {
                    from: fresh.status,
                    to: to.to_string(),
                }
                .into())
            }
        }
    }

    fn spawn_welcome_email(&self, enrollment: &Enrollment, challenge_title: &str) {
        let mailer = Arc::clone(&self.mailer);
        let to = enrollment.email.clone();
        let data = serde_json::json!({
            "full_name": enrollment.full_name,
            "discount_code": enrollment.discount_code,
            "challenge_title": challenge_title,
        });

        tokio::spawn(async move {
            if let Err(e) = mailer.send(&to, TEMPLATE_WELCOME, &data).await {
                tracing::warn!(error = %e, to, "Failed to send welcome email");
            }
        });
    }
}
