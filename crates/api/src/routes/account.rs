//! Route definitions for the `/accounts` resource and its payments.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{account, payments};
use crate::state::AppState;

/// Routes mounted at `/accounts`.
///
/// ```text
/// POST /register         -> register
/// POST /login            -> login
/// POST /verify           -> verify_email
/// POST /forgot-password  -> forgot_password
/// POST /reset-password   -> reset_password
/// GET  /status           -> status
/// PUT  /profile          -> update_profile
/// POST /close            -> close
/// /payments/...          -> payments_router()
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(account::register))
        .route("/login", post(account::login))
        .route("/verify", post(account::verify_email))
        .route("/forgot-password", post(account::forgot_password))
        .route("/reset-password", post(account::reset_password))
        .route("/status", get(account::status))
        .route("/profile", put(account::update_profile))
        .route("/close", post(account::close))
        .nest("/payments", payments_router())
}

/// Routes mounted at `/accounts/payments`.
///
/// ```text
/// POST /create-checkout-session  -> create_checkout_session
/// POST /verify-session           -> verify_session
/// POST /cancel-subscription      -> cancel_subscription
/// POST /reactivate-subscription  -> reactivate_subscription
/// GET  /subscription-status      -> subscription_status
/// GET  /payment-history          -> payment_history
/// ```
fn payments_router() -> Router<AppState> {
    Router::new()
        .route("/create-checkout-session", post(payments::create_checkout_session))
        .route("/verify-session", post(payments::verify_session))
        .route("/cancel-subscription", post(payments::cancel_subscription))
        .route("/reactivate-subscription", post(payments::reactivate_subscription))
        .route("/subscription-status", get(payments::subscription_status))
        .route("/payment-history", get(payments::payment_history))
}
