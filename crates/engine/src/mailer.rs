//! Transactional email delivery.
//!
//! The engine only ever supplies a recipient, a template name, and a data
//! payload; rendering beyond a plain-text fallback is the mail platform's
//! concern. [`SmtpMailer`] wraps the `lettre` async SMTP transport; if
//! `SMTP_HOST` is not set, [`EmailConfig::from_env`] returns `None` and
//! the caller should fall back to [`NoopMailer`].

use async_trait::async_trait;
use stride_core::escalation::{ALERT_DAY2, ALERT_DAY5};

// ---------------------------------------------------------------------------
// Template names
// ---------------------------------------------------------------------------

/// Welcome email sent right after enrollment, carrying the discount code.
pub const TEMPLATE_WELCOME: &str = "challenge_welcome";

/// Gentle nudge after two inactive days.
pub const TEMPLATE_DAY2_NUDGE: &str = "challenge_day2_nudge";

/// Stronger warning after five inactive days.
pub const TEMPLATE_DAY5_WARNING: &str = "challenge_day5_warning";

/// Final notice that the enrollment was reset after seven inactive days.
pub const TEMPLATE_DAY7_RESET: &str = "challenge_day7_reset";

/// Map an alert type constant to its email template.
///
/// The escalation classifier only produces the three alert constants; the
/// final arm is the seven-day reset.
pub fn template_for_alert(alert_type: &str) -> &'static str {
    match alert_type {
        ALERT_DAY2 => TEMPLATE_DAY2_NUDGE,
        ALERT_DAY5 => TEMPLATE_DAY5_WARNING,
        _ => TEMPLATE_DAY7_RESET,
    }
}

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for email delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum MailerError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// The recipient or sender address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),
}

// ---------------------------------------------------------------------------
// Mailer trait
// ---------------------------------------------------------------------------

/// Outbound email capability.
///
/// Injected into the enrollment service (welcome email) and the
/// escalation sweep (alert emails).
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(
        &self,
        to: &str,
        template: &str,
        data: &serde_json::Value,
    ) -> Result<(), MailerError>;
}

// ---------------------------------------------------------------------------
// EmailConfig
// ---------------------------------------------------------------------------

/// Default SMTP port (STARTTLS).
const DEFAULT_SMTP_PORT: u16 = 587;

/// Default sender address when `SMTP_FROM` is not set.
const DEFAULT_FROM_ADDRESS: &str = "noreply@stride.local";

/// Configuration for the SMTP email delivery service.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// SMTP server hostname.
    pub smtp_host: String,
    /// SMTP server port (defaults to 587).
    pub smtp_port: u16,
    /// RFC 5322 "From" address.
    pub from_address: String,
    /// Optional SMTP username.
    pub smtp_user: Option<String>,
    /// Optional SMTP password.
    pub smtp_password: Option<String>,
}

impl EmailConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` if `SMTP_HOST` is not set, signalling that email
    /// delivery is not configured and should be skipped.
    ///
    /// | Variable        | Required | Default                 |
    /// |-----------------|----------|-------------------------|
    /// | `SMTP_HOST`     | yes      | —                       |
    /// | `SMTP_PORT`     | no       | `587`                   |
    /// | `SMTP_FROM`     | no       | `noreply@stride.local`  |
    /// | `SMTP_USER`     | no       | —                       |
    /// | `SMTP_PASSWORD` | no       | —                       |
    pub fn from_env() -> Option<Self> {
        let smtp_host = std::env::var("SMTP_HOST").ok()?;
        Some(Self {
            smtp_host,
            smtp_port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            from_address: std::env::var("SMTP_FROM")
                .unwrap_or_else(|_| DEFAULT_FROM_ADDRESS.to_string()),
            smtp_user: std::env::var("SMTP_USER").ok(),
            smtp_password: std::env::var("SMTP_PASSWORD").ok(),
        })
    }
}

// ---------------------------------------------------------------------------
// SmtpMailer
// ---------------------------------------------------------------------------

/// Sends challenge emails via SMTP.
pub struct SmtpMailer {
    config: EmailConfig,
}

impl SmtpMailer {
    /// Create a new mailer with the given configuration.
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    fn subject_for(template: &str) -> &'static str {
        match template {
            TEMPLATE_WELCOME => "Welcome to your challenge",
            TEMPLATE_DAY2_NUDGE => "Don't lose your momentum",
            TEMPLATE_DAY5_WARNING => "Your challenge misses you",
            TEMPLATE_DAY7_RESET => "Your challenge has been reset",
            _ => "Challenge update",
        }
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(
        &self,
        to: &str,
        template: &str,
        data: &serde_json::Value,
    ) -> Result<(), MailerError> {
        use lettre::{
            message::header::ContentType, transport::smtp::authentication::Credentials,
            AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
        };

        let body = format!(
            "Template: {template}\n\n{}",
            serde_json::to_string_pretty(data).unwrap_or_default()
        );

        let email = Message::builder()
            .from(self.config.from_address.parse()?)
            .to(to.parse()?)
            .subject(Self::subject_for(template))
            .header(ContentType::TEXT_PLAIN)
            .body(body)
            .map_err(|e| MailerError::Build(e.to_string()))?;

        let mut transport_builder =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.smtp_host)?
                .port(self.config.smtp_port);

        if let (Some(user), Some(pass)) = (&self.config.smtp_user, &self.config.smtp_password) {
            transport_builder =
                transport_builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        let mailer = transport_builder.build();
        mailer.send(email).await?;

        tracing::info!(to, template, "Challenge email sent");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// NoopMailer
// ---------------------------------------------------------------------------

/// Mailer used when SMTP is not configured. Logs and succeeds.
#[derive(Debug, Default)]
pub struct NoopMailer;

#[async_trait]
impl Mailer for NoopMailer {
    async fn send(
        &self,
        to: &str,
        template: &str,
        _data: &serde_json::Value,
    ) -> Result<(), MailerError> {
        tracing::info!(to, template, "Email delivery not configured, skipping send");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
