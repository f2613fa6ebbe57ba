use std::sync::Arc;

use babycontrol_billing::PaymentProvider;

use crate::config::ServerConfig;
use crate::email::Mailer;
use crate::error::{AppError, AppResult};

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: everything is behind `Arc` or is already `Clone`.
#[derive(Clone)]
pub struct AppState {
    pub pool: babycontrol_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// `None` when Stripe is not configured.
    pub payments: Option<Arc<dyn PaymentProvider>>,
    pub mailer: Arc<Mailer>,
}

impl AppState {
    /// The payment provider, or 503 when billing is not configured.
    pub fn payments(&self) -> AppResult<&dyn PaymentProvider> {
        self.payments
            .as_deref()
            .ok_or_else(|| AppError::ServiceUnavailable("Billing is not configured".into()))
    }
}
