use babycontrol_billing::StripeConfig;
use babycontrol_core::billing::DEFAULT_TRIAL_DAYS;

use crate::auth::jwt::JwtConfig;
use crate::email::EmailConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development. Billing and
/// email are optional: without `STRIPE_SECRET_KEY` the payment endpoints
/// answer 503, and without `SMTP_HOST` emails are logged instead of sent.
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
    /// Public URL of the web client, used in emails and setup links.
    pub app_url: String,
    pub jwt: JwtConfig,
    /// Argon2 PHC hash of the sysadmin password. Sysadmin login is disabled when unset.
    pub sysadmin_password_hash: Option<String>,
    /// Lifetime of a family setup link (default: `24`).
    pub setup_token_expiry_hours: i64,
    /// Trial length granted on registration (default: `14`).
    pub trial_days: i64,
    pub stripe: Option<StripeConfig>,
    pub email: Option<EmailConfig>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                    | Default                 |
    /// |----------------------------|-------------------------|
    /// | `HOST`                     | `0.0.0.0`               |
    /// | `PORT`                     | `3000`                  |
    /// | `CORS_ORIGINS`             | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`     | `30`                    |
    /// | `APP_URL`                  | `http://localhost:5173` |
    /// | `SYSADMIN_PASSWORD_HASH`   | unset                   |
    /// | `SETUP_TOKEN_EXPIRY_HOURS` | `24`                    |
    /// | `TRIAL_DAYS`               | `14`                    |
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

        let app_url = std::env::var("APP_URL")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .trim_end_matches('/')
            .to_string();

        let sysadmin_password_hash = std::env::var("SYSADMIN_PASSWORD_HASH")
            .ok()
            .filter(|h| !h.is_empty());

        let setup_token_expiry_hours: i64 = std::env::var("SETUP_TOKEN_EXPIRY_HOURS")
            .unwrap_or_else(|_| "24".into())
            .parse()
            .expect("SETUP_TOKEN_EXPIRY_HOURS must be a valid i64");

        let trial_days: i64 = std::env::var("TRIAL_DAYS")
            .unwrap_or_else(|_| DEFAULT_TRIAL_DAYS.to_string())
            .parse()
            .expect("TRIAL_DAYS must be a valid i64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            app_url,
            jwt: JwtConfig::from_env(),
            sysadmin_password_hash,
            setup_token_expiry_hours,
            trial_days,
            stripe: StripeConfig::from_env(),
            email: EmailConfig::from_env(),
        }
    }
}
