//! Shared fixtures for engine integration tests.
//!
//! Tests drive time through [`FixedClock`] and capture outbound email
//! with the mailer doubles here, so day arithmetic and alert delivery
//! can be asserted deterministically.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use sqlx::PgPool;
use stride_core::snapshot::{CatalogProduct, ProductSnapshot};
use stride_core::types::Timestamp;
use stride_db::models::challenge::ChallengeDefinition;
use stride_db::models::enrollment::{Enrollment, NewEnrollment};
use stride_db::repositories::{ChallengeRepo, EnrollmentRepo};
use stride_engine::mailer::{Mailer, MailerError};
use stride_engine::{FixedClock, StaticCatalog};

/// Canonical instant most tests start their clock at.
pub fn start_time() -> Timestamp {
    Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap()
}

pub fn fixed_clock() -> Arc<FixedClock> {
    Arc::new(FixedClock::new(start_time()))
}

/// In-memory catalog carrying the products the seeded `breathing-reset`
/// challenge references.
pub fn seeded_catalog() -> Arc<StaticCatalog> {
    Arc::new(StaticCatalog::new([
        CatalogProduct {
            id: "prod-diffuser-01".to_string(),
            name: "Stone Diffuser".to_string(),
            price_cents: 11_900,
        },
        CatalogProduct {
            id: "prod-oil-lavender".to_string(),
            name: "Lavender Essential Oil".to_string(),
            price_cents: 2_400,
        },
    ]))
}

pub async fn seeded_challenge(pool: &PgPool) -> ChallengeDefinition {
    ChallengeRepo::find_by_slug(pool, "breathing-reset")
        .await
        .unwrap()
        .expect("seed migration should provide breathing-reset")
}

/// Insert an enrollment directly through the repository, bypassing the
/// enrollment service and its welcome email.
///
/// `last_activity_at` starts equal to `started_at`, so a past
/// `started_at` makes the enrollment look inactive for that long.
pub async fn seed_enrollment(pool: &PgPool, email: &str, started_at: Timestamp) -> Enrollment {
    let challenge = seeded_challenge(pool).await;
    EnrollmentRepo::create_with_progress(
        pool,
        &NewEnrollment {
            challenge_id: challenge.id,
            user_id: None,
            email: email.to_string(),
            full_name: Some("Test User".to_string()),
            discount_code: "BREA-TEST01".to_string(),
            product_snapshot: ProductSnapshot::new(),
            started_at,
            duration_days: challenge.duration_days,
        },
    )
    .await
    .unwrap()
}

// ---------------------------------------------------------------------------
// Mailer doubles
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct SentMail {
    pub to: String,
    pub template: String,
    pub data: serde_json::Value,
}

/// Captures every send for later assertions.
#[derive(Debug, Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<SentMail>>,
}

impl RecordingMailer {
    pub fn sent(&self) -> Vec<SentMail> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_with_template(&self, template: &str) -> Vec<SentMail> {
        self.sent()
            .into_iter()
            .filter(|m| m.template == template)
            .collect()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(
        &self,
        to: &str,
        template: &str,
        data: &serde_json::Value,
    ) -> Result<(), MailerError> {
        self.sent.lock().unwrap().push(SentMail {
            to: to.to_string(),
            template: template.to_string(),
            data: data.clone(),
        });
        Ok(())
    }
}

/// Always fails, for exercising the failure audit path.
#[derive(Debug, Default)]
pub struct FailingMailer;

#[async_trait]
impl Mailer for FailingMailer {
    async fn send(
        &self,
        _to: &str,
        _template: &str,
        _data: &serde_json::Value,
    ) -> Result<(), MailerError> {
        Err(MailerError::Build("mail provider unavailable".to_string()))
    }
}

/// Sleeps longer than the sweep's email timeout before succeeding.
#[derive(Debug)]
pub struct StallingMailer {
    pub delay: std::time::Duration,
}

#[async_trait]
impl Mailer for StallingMailer {
    async fn send(
        &self,
        _to: &str,
        _template: &str,
        _data: &serde_json::Value,
    ) -> Result<(), MailerError> {
        tokio::time::sleep(self.delay).await;
        Ok(())
    }
}
