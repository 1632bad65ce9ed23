//! One-shot escalation sweep for cron or a systemd timer.
//!
//! The API process runs the same sweep on its own interval scheduler;
//! this binary exists for deployments that prefer an external trigger.
//! It connects, runs a single sweep, logs the summary, and exits.
//! Exit code 1 means the sweep itself failed; per-enrollment errors are
//! recorded in the outcomes and do not fail the run.

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use stride_core::escalation::EscalationPolicy;
use stride_engine::escalation::DEFAULT_EMAIL_TIMEOUT;
use stride_engine::{EmailConfig, EscalationService, Mailer, NoopMailer, SmtpMailer, SystemClock};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stride_worker=debug,stride_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = stride_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");

    stride_db::health_check(&pool)
        .await
        .expect("Database health check failed");

    let mailer: Arc<dyn Mailer> = match EmailConfig::from_env() {
        Some(email_config) => {
            tracing::info!(host = %email_config.smtp_host, "SMTP mailer configured");
            Arc::new(SmtpMailer::new(email_config))
        }
        None => {
            tracing::info!("SMTP_HOST not set, emails will be logged only");
            Arc::new(NoopMailer)
        }
    };

    let service = EscalationService::new(
        pool,
        Arc::new(SystemClock),
        mailer,
        policy_from_env(),
        email_timeout_from_env(),
    );

    match service.run_sweep().await {
        Ok(outcomes) => {
            tracing::info!(scanned = outcomes.len(), "Sweep finished");
        }
        Err(err) => {
            tracing::error!(error = %err, "Sweep failed");
            std::process::exit(1);
        }
    }
}

/// Escalation thresholds, overridable per deployment.
///
/// | Env Var              | Default |
/// |----------------------|---------|
/// | `ALERT_NUDGE_DAYS`   | `2`     |
/// | `ALERT_WARNING_DAYS` | `5`     |
/// | `ALERT_RESET_DAYS`   | `7`     |
fn policy_from_env() -> EscalationPolicy {
    let defaults = EscalationPolicy::default();
    EscalationPolicy {
        nudge_after_days: env_or("ALERT_NUDGE_DAYS", defaults.nudge_after_days),
        warning_after_days: env_or("ALERT_WARNING_DAYS", defaults.warning_after_days),
        reset_after_days: env_or("ALERT_RESET_DAYS", defaults.reset_after_days),
    }
}

/// Per-email send timeout (`ALERT_EMAIL_TIMEOUT_SECS`, default 10).
fn email_timeout_from_env() -> Duration {
    match std::env::var("ALERT_EMAIL_TIMEOUT_SECS") {
        Ok(value) => Duration::from_secs(
            value
                .parse()
                .unwrap_or_else(|_| panic!("ALERT_EMAIL_TIMEOUT_SECS must be a valid u64")),
        ),
        Err(_) => DEFAULT_EMAIL_TIMEOUT,
    }
}

fn env_or(var: &str, default: i64) -> i64 {
    match std::env::var(var) {
        Ok(value) => value
            .parse()
            .unwrap_or_else(|_| panic!("{var} must be a valid number")),
        Err(_) => default,
    }
}
