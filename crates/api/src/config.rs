use std::time::Duration;

use stride_core::escalation::EscalationPolicy;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Escalation sweep configuration (interval, thresholds, email timeout).
    pub sweep: SweepConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            sweep: SweepConfig::from_env(),
        }
    }
}

/// Escalation sweep configuration.
///
/// The threshold days feed [`EscalationPolicy`]; the interval drives the
/// background scheduler.
#[derive(Debug, Clone)]
pub struct SweepConfig {
    /// Seconds between scheduled sweep runs (default: one day).
    pub interval_secs: u64,
    /// Per-email send timeout in seconds during a sweep.
    pub email_timeout_secs: u64,
    /// Days of inactivity before the nudge alert.
    pub nudge_after_days: i64,
    /// Days of inactivity before the warning alert.
    pub warning_after_days: i64,
    /// Days of inactivity before the reset alert and abandonment.
    pub reset_after_days: i64,
}

impl SweepConfig {
    /// Load sweep configuration from environment variables with defaults.
    ///
    /// | Env Var                    | Default |
    /// |----------------------------|---------|
    /// | `SWEEP_INTERVAL_SECS`      | `86400` |
    /// | `ALERT_EMAIL_TIMEOUT_SECS` | `10`    |
    /// | `ALERT_NUDGE_DAYS`         | `2`     |
    /// | `ALERT_WARNING_DAYS`       | `5`     |
    /// | `ALERT_RESET_DAYS`         | `7`     |
    pub fn from_env() -> Self {
        let defaults = EscalationPolicy::default();
        Self {
            interval_secs: env_or("SWEEP_INTERVAL_SECS", 86_400),
            email_timeout_secs: env_or("ALERT_EMAIL_TIMEOUT_SECS", 10),
            nudge_after_days: env_or("ALERT_NUDGE_DAYS", defaults.nudge_after_days),
            warning_after_days: env_or("ALERT_WARNING_DAYS", defaults.warning_after_days),
            reset_after_days: env_or("ALERT_RESET_DAYS", defaults.reset_after_days),
        }
    }

    pub fn policy(&self) -> EscalationPolicy {
        EscalationPolicy {
            nudge_after_days: self.nudge_after_days,
            warning_after_days: self.warning_after_days,
            reset_after_days: self.reset_after_days,
        }
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn email_timeout(&self) -> Duration {
        Duration::from_secs(self.email_timeout_secs)
    }
}

fn env_or<T: std::str::FromStr>(var: &str, default: T) -> T {
    match std::env::var(var) {
        Ok(value) => value
            .parse()
            .unwrap_or_else(|_| panic!("{var} must be a valid number")),
        Err(_) => default,
    }
}
