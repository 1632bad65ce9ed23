//! Inactivity escalation sweep.
//!
//! Scans every active enrollment, classifies its inactivity against the
//! escalation policy, sends at most one alert per (enrollment, threshold),
//! keeps the missed-day streak current, and abandons enrollments past the
//! reset threshold. Failures are isolated per enrollment: one broken row
//! or one slow mail send never stops the rest of the scan.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use stride_core::escalation::EscalationPolicy;
use stride_core::schedule::whole_days_since;
use stride_core::status::{STATUS_ABANDONED, STATUS_ACTIVE};
use stride_core::types::{DbId, Timestamp};
use stride_db::models::enrollment::Enrollment;
use stride_db::repositories::{AlertRepo, ChallengeRepo, EnrollmentRepo};
use stride_db::DbPool;

use crate::clock::Clock;
use crate::error::EngineError;
use crate::mailer::{template_for_alert, Mailer};

/// Upper bound on a single alert email send. A stalled mail provider
/// counts as a failure and the send is retried by a later sweep.
pub const DEFAULT_EMAIL_TIMEOUT: Duration = Duration::from_secs(10);

// ---------------------------------------------------------------------------
// Sweep outcome
// ---------------------------------------------------------------------------

/// Per-enrollment result of one sweep run.
///
/// The full vector is the sweep's return value; the scheduler logs an
/// aggregate and the admin trigger endpoint returns it verbatim.
#[derive(Debug, Serialize)]
pub struct SweepOutcome {
    pub enrollment_id: DbId,
    pub days_inactive: i64,
    /// Alert threshold crossed, if any.
    pub alert: Option<&'static str>,
    /// True when this run recorded a new successful send.
    pub alert_sent: bool,
    /// True when this run abandoned the enrollment.
    pub abandoned: bool,
    /// First error hit while processing this enrollment.
    pub error: Option<String>,
}

impl SweepOutcome {
    fn new(enrollment_id: DbId, days_inactive: i64) -> Self {
        Self {
            enrollment_id,
            days_inactive,
            alert: None,
            alert_sent: false,
            abandoned: false,
            error: None,
        }
    }

    fn record_error(&mut self, context: &str, message: String) {
        tracing::warn!(
            enrollment_id = self.enrollment_id,
            context,
            error = %message,
            "Sweep step failed"
        );
        if self.error.is_none() {
            self.error = Some(message);
        }
    }
}

// ---------------------------------------------------------------------------
// EscalationService
// ---------------------------------------------------------------------------

/// Runs the escalation sweep over all active enrollments.
pub struct EscalationService {
    pool: DbPool,
    clock: Arc<dyn Clock>,
    mailer: Arc<dyn Mailer>,
    policy: EscalationPolicy,
    email_timeout: Duration,
}

impl EscalationService {
    pub fn new(
        pool: DbPool,
        clock: Arc<dyn Clock>,
        mailer: Arc<dyn Mailer>,
        policy: EscalationPolicy,
        email_timeout: Duration,
    ) -> Self {
        Self {
            pool,
            clock,
            mailer,
            policy,
            email_timeout,
        }
    }

    /// Sweep every active enrollment once.
    ///
    /// Only the initial listing can fail the job as a whole; per-enrollment
    /// errors land in that enrollment's [`SweepOutcome`]. The sweep may
    /// interleave with user check-ins; a check-in landing mid-scan can
    /// leave a one-run-stale streak value, which the next run corrects
    /// from the fresher `last_activity_at`.
    pub async fn run_sweep(&self) -> Result<Vec<SweepOutcome>, EngineError> {
        let enrollments = EnrollmentRepo::list_active(&self.pool).await?;
        let now = self.clock.now();

        let mut outcomes = Vec::with_capacity(enrollments.len());
        for enrollment in &enrollments {
            outcomes.push(self.process_enrollment(enrollment, now).await);
        }

        let alerts_sent = outcomes.iter().filter(|o| o.alert_sent).count();
        let abandoned = outcomes.iter().filter(|o| o.abandoned).count();
        let errors = outcomes.iter().filter(|o| o.error.is_some()).count();
        tracing::info!(
            scanned = outcomes.len(),
            alerts_sent,
            abandoned,
            errors,
            "Escalation sweep finished"
        );

        Ok(outcomes)
    }

    async fn process_enrollment(&self, enrollment: &Enrollment, now: Timestamp) -> SweepOutcome {
        let days_inactive = whole_days_since(enrollment.last_activity_at, now);
        let mut outcome = SweepOutcome::new(enrollment.id, days_inactive);
        outcome.alert = self.policy.classify(days_inactive);

        if let Some(alert_type) = outcome.alert {
            self.handle_alert(enrollment, alert_type, &mut outcome, now)
                .await;
        }

        // The streak mirrors inactivity on every run, alert or not.
        let streak = days_inactive.try_into().unwrap_or(i32::MAX);
        if let Err(e) = EnrollmentRepo::update_streak(&self.pool, enrollment.id, streak).await {
            outcome.record_error("update_streak", e.to_string());
        }

        if self.policy.should_abandon(days_inactive) {
            match EnrollmentRepo::set_status(
                &self.pool,
                enrollment.id,
                STATUS_ACTIVE,
                STATUS_ABANDONED,
                None,
            )
            .await
            {
                Ok(Some(_)) => {
                    outcome.abandoned = true;
                    tracing::info!(
                        enrollment_id = enrollment.id,
                        days_inactive,
                        "Enrollment abandoned by escalation sweep"
                    );
                }
                // A concurrent writer moved the enrollment out of active.
                Ok(None) => {}
                Err(e) => outcome.record_error("abandon", e.to_string()),
            }
        }

        outcome
    }

    /// Send the alert email unless a successful send is already recorded.
    async fn handle_alert(
        &self,
        enrollment: &Enrollment,
        alert_type: &'static str,
        outcome: &mut SweepOutcome,
        now: Timestamp,
    ) {
        match AlertRepo::has_sent(&self.pool, enrollment.id, alert_type).await {
            Ok(true) => return,
            Ok(false) => {}
            Err(e) => {
                outcome.record_error("alert_lookup", e.to_string());
                return;
            }
        }

        let days_inactive = outcome.days_inactive.try_into().unwrap_or(i32::MAX);
        match self.send_alert(enrollment, alert_type, outcome.days_inactive).await {
            Ok(()) => {
                match AlertRepo::record_sent(
                    &self.pool,
                    enrollment.id,
                    alert_type,
                    days_inactive,
                    now,
                )
                .await
                {
                    // None means a concurrent sweep recorded the send first.
                    Ok(record) => outcome.alert_sent = record.is_some(),
                    Err(e) => outcome.record_error("record_sent", e.to_string()),
                }
            }
            Err(send_error) => {
                outcome.record_error("send_alert", send_error.clone());
                if let Err(e) = AlertRepo::record_failure(
                    &self.pool,
                    enrollment.id,
                    alert_type,
                    days_inactive,
                    &send_error,
                )
                .await
                {
                    outcome.record_error("record_failure", e.to_string());
                }
            }
        }
    }

    /// Deliver one alert email under the configured timeout.
    async fn send_alert(
        &self,
        enrollment: &Enrollment,
        alert_type: &str,
        days_inactive: i64,
    ) -> Result<(), String> {
        let challenge_title = ChallengeRepo::find_by_id(&self.pool, enrollment.challenge_id)
            .await
            .ok()
            .flatten()
            .map(|c| c.title)
            .unwrap_or_default();

        let template = template_for_alert(alert_type);
        let data = serde_json::json!({
            "full_name": enrollment.full_name,
            "discount_code": enrollment.discount_code,
            "challenge_title": challenge_title,
            "current_day": enrollment.current_day,
            "days_inactive": days_inactive,
        });

        match tokio::time::timeout(
            self.email_timeout,
            self.mailer.send(&enrollment.email, template, &data),
        )
        .await
        {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(e.to_string()),
            Err(_) => Err(format!(
                "email send timed out after {}s",
                self.email_timeout.as_secs()
            )),
        }
    }
}
