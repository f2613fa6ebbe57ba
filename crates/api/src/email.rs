//! Transactional email (account verification, password reset) via SMTP.
//!
//! [`Mailer`] wraps the `lettre` async SMTP transport. If `SMTP_HOST` is not
//! set, [`EmailConfig::from_env`] returns `None` and the mailer logs each
//! message at info level instead of sending it.

use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum EmailError {
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
// EmailConfig
// ---------------------------------------------------------------------------

/// Default SMTP port (STARTTLS).
const DEFAULT_SMTP_PORT: u16 = 587;

/// Default sender address when `SMTP_FROM` is not set.
const DEFAULT_FROM_ADDRESS: &str = "noreply@babycontrol.local";

#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    /// RFC 5322 "From" address.
    pub from_address: String,
    pub smtp_user: Option<String>,
    pub smtp_password: Option<String>,
}

impl EmailConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable        | Required | Default                      |
    /// |-----------------|----------|------------------------------|
    /// | `SMTP_HOST`     | yes      |                              |
    /// | `SMTP_PORT`     | no       | `587`                        |
    /// | `SMTP_FROM`     | no       | `noreply@babycontrol.local`  |
    /// | `SMTP_USER`     | no       |                              |
    /// | `SMTP_PASSWORD` | no       |                              |
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
// Mailer
// ---------------------------------------------------------------------------

/// A rendered plain-text email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Build the account verification email.
pub fn verification_email(to: &str, first_name: &str, app_url: &str, token: &str) -> OutgoingEmail {
    OutgoingEmail {
        to: to.to_string(),
        subject: "Verify your Baby Control account".to_string(),
        body: format!(
            "Hi {first_name},\n\nConfirm your email address by opening this link:\n\
             {app_url}/account/verify?token={token}\n\n\
             If you did not create an account, you can ignore this message."
        ),
    }
}

/// Build the password reset email.
pub fn password_reset_email(to: &str, first_name: &str, app_url: &str, token: &str) -> OutgoingEmail {
    OutgoingEmail {
        to: to.to_string(),
        subject: "Reset your Baby Control password".to_string(),
        body: format!(
            "Hi {first_name},\n\nReset your password by opening this link within one hour:\n\
             {app_url}/account/reset-password?token={token}\n\n\
             If you did not request a reset, you can ignore this message."
        ),
    }
}

/// Sends transactional email, or logs it when SMTP is not configured.
pub struct Mailer {
    config: Option<EmailConfig>,
}

impl Mailer {
    pub fn new(config: Option<EmailConfig>) -> Self {
        Self { config }
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_some()
    }

    pub async fn send(&self, email: &OutgoingEmail) -> Result<(), EmailError> {
        let Some(config) = &self.config else {
            tracing::info!(to = %email.to, subject = %email.subject, "SMTP not configured, email skipped");
            return Ok(());
        };

        let message = Message::builder()
            .from(config.from_address.parse()?)
            .to(email.to.parse()?)
            .subject(email.subject.clone())
            .header(ContentType::TEXT_PLAIN)
            .body(email.body.clone())
            .map_err(|e| EmailError::Build(e.to_string()))?;

        let mut transport_builder =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
                .port(config.smtp_port);

        if let (Some(user), Some(pass)) = (&config.smtp_user, &config.smtp_password) {
            transport_builder =
                transport_builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        transport_builder.build().send(message).await?;

        tracing::info!(to = %email.to, subject = %email.subject, "Email sent");
        Ok(())
    }

    /// Send and log failures without propagating them.
    ///
    /// Registration and password reset must not fail because SMTP is down.
    pub async fn send_logged(&self, email: &OutgoingEmail) {
        if let Err(e) = self.send(email).await {
            tracing::warn!(to = %email.to, error = %e, "Failed to send email");
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verification_link_contains_token() {
        let email = verification_email("a@b.test", "Ann", "https://app.test", "tok123");
        assert!(email.body.contains("https://app.test/account/verify?token=tok123"));
        assert!(email.body.starts_with("Hi Ann"));
    }

    #[test]
    fn reset_link_contains_token() {
        let email = password_reset_email("a@b.test", "Ann", "https://app.test", "tok456");
        assert!(email.body.contains("/account/reset-password?token=tok456"));
    }

    #[tokio::test]
    async fn unconfigured_mailer_skips() {
        let mailer = Mailer::new(None);
        assert!(!mailer.is_configured());
        let email = verification_email("a@b.test", "Ann", "https://app.test", "t");
        assert!(mailer.send(&email).await.is_ok());
    }

    #[test]
    fn email_error_display_build() {
        let err = EmailError::Build("missing body".to_string());
        assert_eq!(err.to_string(), "Email build error: missing body");
    }
}
