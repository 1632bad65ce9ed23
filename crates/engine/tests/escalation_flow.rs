//! Integration tests for the escalation sweep.
//!
//! Covers the inactivity ladder (nudge, warning, reset), alert
//! idempotency across repeated sweeps, failure auditing and retry, and
//! the interaction between check-ins and the sweep.

mod common;

use std::sync::Arc;

use chrono::Duration;
use sqlx::PgPool;
use stride_core::escalation::{EscalationPolicy, ALERT_DAY2, ALERT_DAY5, ALERT_DAY7_RESET};
use stride_core::status::{STATUS_ABANDONED, STATUS_ACTIVE, STATUS_PAUSED};
use stride_db::models::progress::SetDayCompletion;
use stride_db::repositories::{AlertRepo, EnrollmentRepo};
use stride_engine::mailer::{
    Mailer, TEMPLATE_DAY2_NUDGE, TEMPLATE_DAY5_WARNING, TEMPLATE_DAY7_RESET, TEMPLATE_WELCOME,
};
use stride_engine::{
    EnrollmentService, EscalationService, FixedClock, ProgressService,
};

use common::{
    fixed_clock, seed_enrollment, seeded_catalog, start_time, FailingMailer, RecordingMailer,
    StallingMailer,
};

fn sweep_service(pool: &PgPool, clock: Arc<FixedClock>, mailer: Arc<dyn Mailer>) -> EscalationService {
    EscalationService::new(
        pool.clone(),
        clock,
        mailer,
        EscalationPolicy::default(),
        std::time::Duration::from_secs(2),
    )
}

// ---------------------------------------------------------------------------
// Test: quiet ladder states
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_fresh_enrollment_untouched(pool: PgPool) {
    let clock = fixed_clock();
    let mailer = Arc::new(RecordingMailer::default());
    let service = sweep_service(&pool, clock.clone(), mailer.clone());
    let enrollment = seed_enrollment(&pool, "fresh@example.com", start_time()).await;

    let outcomes = service.run_sweep().await.unwrap();

    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].enrollment_id, enrollment.id);
    assert_eq!(outcomes[0].days_inactive, 0);
    assert!(outcomes[0].alert.is_none());
    assert!(!outcomes[0].alert_sent);
    assert!(!outcomes[0].abandoned);
    assert!(outcomes[0].error.is_none());
    assert!(mailer.sent().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_streak_tracks_inactivity_before_alerts(pool: PgPool) {
    let clock = fixed_clock();
    let service = sweep_service(&pool, clock.clone(), Arc::new(RecordingMailer::default()));
    let enrollment = seed_enrollment(&pool, "slow@example.com", start_time()).await;

    clock.advance(Duration::days(1));
    let outcomes = service.run_sweep().await.unwrap();

    // One inactive day is below every threshold but still mirrored into
    // the streak column.
    assert_eq!(outcomes[0].days_inactive, 1);
    assert!(outcomes[0].alert.is_none());
    let updated = EnrollmentRepo::find_by_id(&pool, enrollment.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.missed_days_streak, 1);
    assert_eq!(updated.status, STATUS_ACTIVE);
}

// ---------------------------------------------------------------------------
// Test: nudge and warning
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_day2_nudge_sent_once(pool: PgPool) {
    let clock = fixed_clock();
    let mailer = Arc::new(RecordingMailer::default());
    let service = sweep_service(&pool, clock.clone(), mailer.clone());
    let enrollment = seed_enrollment(&pool, "nudge@example.com", start_time()).await;

    clock.advance(Duration::days(3));
    let outcomes = service.run_sweep().await.unwrap();

    assert_eq!(outcomes[0].alert, Some(ALERT_DAY2));
    assert!(outcomes[0].alert_sent);
    assert_eq!(mailer.sent_with_template(TEMPLATE_DAY2_NUDGE).len(), 1);

    let records = AlertRepo::list_for_enrollment(&pool, enrollment.id)
        .await
        .unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].alert_type, ALERT_DAY2);
    assert_eq!(records[0].days_inactive, 3);
    assert!(records[0].sent);
    assert!(records[0].sent_at.is_some());

    // A second sweep at the same inactivity level classifies the same
    // alert but sends nothing new.
    let outcomes = service.run_sweep().await.unwrap();
    assert_eq!(outcomes[0].alert, Some(ALERT_DAY2));
    assert!(!outcomes[0].alert_sent);
    assert_eq!(mailer.sent_with_template(TEMPLATE_DAY2_NUDGE).len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_day5_warning_skips_missed_nudge(pool: PgPool) {
    let clock = fixed_clock();
    let mailer = Arc::new(RecordingMailer::default());
    let service = sweep_service(&pool, clock.clone(), mailer.clone());
    let enrollment = seed_enrollment(&pool, "warn@example.com", start_time()).await;

    // No sweep ran around day 2, so the nudge window was missed entirely.
    clock.advance(Duration::days(6));
    let outcomes = service.run_sweep().await.unwrap();

    assert_eq!(outcomes[0].alert, Some(ALERT_DAY5));
    assert!(outcomes[0].alert_sent);
    assert!(!outcomes[0].abandoned);
    assert!(mailer.sent_with_template(TEMPLATE_DAY2_NUDGE).is_empty());
    assert_eq!(mailer.sent_with_template(TEMPLATE_DAY5_WARNING).len(), 1);

    let updated = EnrollmentRepo::find_by_id(&pool, enrollment.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.missed_days_streak, 6);
    assert_eq!(updated.status, STATUS_ACTIVE);
}

// ---------------------------------------------------------------------------
// Test: seven-day reset
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_day7_reset_abandons(pool: PgPool) {
    let clock = fixed_clock();
    let mailer = Arc::new(RecordingMailer::default());
    let service = sweep_service(&pool, clock.clone(), mailer.clone());
    let enrollment = seed_enrollment(&pool, "gone@example.com", start_time()).await;

    clock.advance(Duration::days(8));
    let outcomes = service.run_sweep().await.unwrap();

    assert_eq!(outcomes[0].alert, Some(ALERT_DAY7_RESET));
    assert!(outcomes[0].alert_sent);
    assert!(outcomes[0].abandoned);
    assert_eq!(mailer.sent_with_template(TEMPLATE_DAY7_RESET).len(), 1);

    let updated = EnrollmentRepo::find_by_id(&pool, enrollment.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.status, STATUS_ABANDONED);
    assert_eq!(updated.missed_days_streak, 8);
    // Only an explicit opt-out stamps completed_at; a sweep reset leaves
    // it empty.
    assert!(updated.completed_at.is_none());

    // The abandoned enrollment drops out of later sweeps.
    let outcomes = service.run_sweep().await.unwrap();
    assert!(outcomes.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_paused_enrollments_not_scanned(pool: PgPool) {
    let clock = fixed_clock();
    let mailer = Arc::new(RecordingMailer::default());
    let service = sweep_service(&pool, clock.clone(), mailer.clone());
    let enrollment = seed_enrollment(&pool, "paused@example.com", start_time()).await;
    EnrollmentRepo::set_status(&pool, enrollment.id, STATUS_ACTIVE, STATUS_PAUSED, None)
        .await
        .unwrap();

    clock.advance(Duration::days(10));
    let outcomes = service.run_sweep().await.unwrap();

    assert!(outcomes.is_empty());
    assert!(mailer.sent().is_empty());
    let untouched = EnrollmentRepo::find_by_id(&pool, enrollment.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(untouched.status, STATUS_PAUSED);
    assert_eq!(untouched.missed_days_streak, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_resume_shields_paused_interval_from_sweep(pool: PgPool) {
    let clock = fixed_clock();
    let mailer = Arc::new(RecordingMailer::default());
    let service = sweep_service(&pool, clock.clone(), mailer.clone());
    let enrollments = EnrollmentService::new(
        pool.clone(),
        clock.clone(),
        mailer.clone(),
        seeded_catalog(),
    );
    let enrollment = seed_enrollment(&pool, "holiday@example.com", start_time()).await;

    // Paused well past the reset threshold, then resumed.
    enrollments.pause(enrollment.id).await.unwrap();
    clock.advance(Duration::days(10));
    enrollments.resume(enrollment.id).await.unwrap();

    let outcomes = service.run_sweep().await.unwrap();

    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].days_inactive, 0);
    assert!(outcomes[0].alert.is_none());
    assert!(mailer.sent().is_empty());
    let back = EnrollmentRepo::find_by_id(&pool, enrollment.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(back.status, STATUS_ACTIVE);
    assert_eq!(back.missed_days_streak, 0);
}

// ---------------------------------------------------------------------------
// Test: delivery failures
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_failed_send_recorded_for_retry(pool: PgPool) {
    let clock = fixed_clock();
    let failing = sweep_service(&pool, clock.clone(), Arc::new(FailingMailer));
    let enrollment = seed_enrollment(&pool, "retry@example.com", start_time()).await;

    clock.advance(Duration::days(3));
    let outcomes = failing.run_sweep().await.unwrap();

    assert_eq!(outcomes[0].alert, Some(ALERT_DAY2));
    assert!(!outcomes[0].alert_sent);
    assert!(outcomes[0].error.is_some());

    // The failure is audited but does not count as a send.
    let records = AlertRepo::list_for_enrollment(&pool, enrollment.id)
        .await
        .unwrap();
    assert_eq!(records.len(), 1);
    assert!(!records[0].sent);
    assert!(records[0].error.is_some());
    assert!(!AlertRepo::has_sent(&pool, enrollment.id, ALERT_DAY2)
        .await
        .unwrap());

    // A later sweep with a working provider delivers the alert.
    let mailer = Arc::new(RecordingMailer::default());
    let recovering = sweep_service(&pool, clock.clone(), mailer.clone());
    let outcomes = recovering.run_sweep().await.unwrap();

    assert!(outcomes[0].alert_sent);
    assert_eq!(mailer.sent_with_template(TEMPLATE_DAY2_NUDGE).len(), 1);

    let records = AlertRepo::list_for_enrollment(&pool, enrollment.id)
        .await
        .unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records.iter().filter(|r| r.sent).count(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_stalled_send_times_out(pool: PgPool) {
    let clock = fixed_clock();
    let mailer = Arc::new(StallingMailer {
        delay: std::time::Duration::from_millis(300),
    });
    let service = EscalationService::new(
        pool.clone(),
        clock.clone(),
        mailer,
        EscalationPolicy::default(),
        std::time::Duration::from_millis(50),
    );
    let enrollment = seed_enrollment(&pool, "stall@example.com", start_time()).await;

    clock.advance(Duration::days(3));
    let outcomes = service.run_sweep().await.unwrap();

    assert!(!outcomes[0].alert_sent);
    let error = outcomes[0].error.as_deref().unwrap();
    assert!(error.contains("timed out"), "unexpected error: {error}");

    let records = AlertRepo::list_for_enrollment(&pool, enrollment.id)
        .await
        .unwrap();
    assert_eq!(records.len(), 1);
    assert!(!records[0].sent);
}

// ---------------------------------------------------------------------------
// Test: check-ins reset the ladder
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_checkin_resets_ladder(pool: PgPool) {
    let clock = fixed_clock();
    let mailer = Arc::new(RecordingMailer::default());
    let service = sweep_service(&pool, clock.clone(), mailer.clone());
    let progress = ProgressService::new(pool.clone(), clock.clone());
    let enrollment = seed_enrollment(&pool, "back@example.com", start_time()).await;

    clock.advance(Duration::days(3));
    service.run_sweep().await.unwrap();
    assert_eq!(mailer.sent_with_template(TEMPLATE_DAY2_NUDGE).len(), 1);

    // The participant comes back and checks a day off.
    progress
        .set_day_completion(
            enrollment.id,
            1,
            &SetDayCompletion {
                completed: true,
                notes: None,
            },
        )
        .await
        .unwrap();

    let outcomes = service.run_sweep().await.unwrap();
    assert_eq!(outcomes[0].days_inactive, 0);
    assert!(outcomes[0].alert.is_none());
    let updated = EnrollmentRepo::find_by_id(&pool, enrollment.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.missed_days_streak, 0);
    assert_eq!(updated.status, STATUS_ACTIVE);
}

// ---------------------------------------------------------------------------
// Test: independent processing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_enrollments_processed_independently(pool: PgPool) {
    let clock = fixed_clock();
    let mailer = Arc::new(RecordingMailer::default());
    let service = sweep_service(&pool, clock.clone(), mailer.clone());

    let stale = seed_enrollment(
        &pool,
        "stale@example.com",
        start_time() - Duration::days(6),
    )
    .await;
    let fresh = seed_enrollment(&pool, "fresh@example.com", start_time()).await;

    let outcomes = service.run_sweep().await.unwrap();
    assert_eq!(outcomes.len(), 2);

    let stale_outcome = outcomes
        .iter()
        .find(|o| o.enrollment_id == stale.id)
        .unwrap();
    assert_eq!(stale_outcome.alert, Some(ALERT_DAY5));
    assert!(stale_outcome.alert_sent);

    let fresh_outcome = outcomes
        .iter()
        .find(|o| o.enrollment_id == fresh.id)
        .unwrap();
    assert!(fresh_outcome.alert.is_none());
    assert_eq!(mailer.sent().len(), 1);
}

// ---------------------------------------------------------------------------
// Test: full ladder end to end
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_full_ladder_end_to_end(pool: PgPool) {
    let clock = fixed_clock();
    let mailer = Arc::new(RecordingMailer::default());
    let enrollments = EnrollmentService::new(
        pool.clone(),
        clock.clone(),
        mailer.clone(),
        seeded_catalog(),
    );
    let service = sweep_service(&pool, clock.clone(), mailer.clone());

    let enrollment = enrollments
        .enroll(&stride_db::models::enrollment::EnrollInput {
            challenge_slug: "breathing-reset".to_string(),
            email: "ladder@example.com".to_string(),
            full_name: Some("Alex Doe".to_string()),
            user_id: None,
        })
        .await
        .unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(200)).await;
    assert_eq!(mailer.sent_with_template(TEMPLATE_WELCOME).len(), 1);

    // Six silent days: the day-5 warning fires, once.
    clock.advance(Duration::days(6));
    let outcomes = service.run_sweep().await.unwrap();
    assert_eq!(outcomes[0].alert, Some(ALERT_DAY5));
    assert!(outcomes[0].alert_sent);

    // Two more: the reset fires and the enrollment is abandoned.
    clock.advance(Duration::days(2));
    let outcomes = service.run_sweep().await.unwrap();
    assert_eq!(outcomes[0].alert, Some(ALERT_DAY7_RESET));
    assert!(outcomes[0].alert_sent);
    assert!(outcomes[0].abandoned);

    assert!(mailer.sent_with_template(TEMPLATE_DAY2_NUDGE).is_empty());
    assert_eq!(mailer.sent_with_template(TEMPLATE_DAY5_WARNING).len(), 1);
    assert_eq!(mailer.sent_with_template(TEMPLATE_DAY7_RESET).len(), 1);

    let ended = EnrollmentRepo::find_by_id(&pool, enrollment.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(ended.status, STATUS_ABANDONED);
    assert_eq!(ended.missed_days_streak, 8);
}
