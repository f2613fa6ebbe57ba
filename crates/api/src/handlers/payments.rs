//! Handlers for `/accounts/payments`: Stripe checkout and subscription management.
//!
//! Stripe is the source of truth; each handler mirrors what it learns onto
//! the account row so access checks only call Stripe for a lapsed
//! subscription.

use axum::extract::State;
use axum::Json;
use babycontrol_billing::{CheckoutRequest, Subscription};
use babycontrol_core::billing::{
    ensure_cancelable, ensure_checkout_allowed, AccessStatus, BillingPlan, PlanType,
};
use babycontrol_core::error::CoreError;
use babycontrol_core::types::Timestamp;
use babycontrol_db::models::account::{Account, AccountResponse, BillingMirror};
use babycontrol_db::repositories::AccountRepo;
use chrono::DateTime;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::AccountUser;
use crate::response::{ok, DataResponse};
use crate::state::AppState;
use crate::subscriptions::{account_access, apply_mirror, mirror_subscription, refresh_subscription};

/// Number of payments returned by the history endpoint.
const PAYMENT_HISTORY_LIMIT: u32 = 24;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct CheckoutSessionRequest {
    pub plan: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSessionResponse {
    pub session_id: String,
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifySessionRequest {
    pub session_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionStatusResponse {
    pub plan_type: Option<String>,
    /// Stripe's subscription status, when there is a subscription.
    pub subscription_status: Option<String>,
    pub plan_expires_at: Option<Timestamp>,
    pub cancel_at_period_end: bool,
    pub access: AccessStatus,
    pub has_access: bool,
    pub account: AccountResponse,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    pub id: String,
    pub amount: i64,
    pub currency: String,
    pub status: String,
    pub created_at: Option<Timestamp>,
    pub description: Option<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/accounts/payments/create-checkout-session
pub async fn create_checkout_session(
    State(state): State<AppState>,
    AccountUser(account): AccountUser,
    Json(input): Json<CheckoutSessionRequest>,
) -> AppResult<Json<DataResponse<CheckoutSessionResponse>>> {
    let payments = state.payments()?;
    let plan = BillingPlan::parse(&input.plan)?;
    ensure_checkout_allowed(
        plan,
        account.plan_type.as_deref(),
        account.subscription_id.as_deref(),
        &account_access(&account),
    )?;

    let customer_id = match account.stripe_customer_id.clone() {
        Some(id) => id,
        None => {
            let name = display_name(&account);
            let customer = payments
                .create_customer(&account.email, &name, account.id)
                .await?;
            AccountRepo::set_stripe_customer(&state.pool, account.id, &customer.id).await?;
            tracing::info!(account_id = account.id, customer_id = %customer.id, "Stripe customer created");
            customer.id
        }
    };

    let app_url = &state.config.app_url;
    let session = payments
        .create_checkout_session(&CheckoutRequest {
            customer_id,
            plan,
            account_id: account.id,
            success_url: format!(
                "{app_url}/account/payment-success?session_id={{CHECKOUT_SESSION_ID}}"
            ),
            cancel_url: format!("{app_url}/account?checkout=canceled"),
        })
        .await?;

    tracing::info!(
        account_id = account.id,
        plan = plan.as_str(),
        session_id = %session.id,
        "Checkout session created"
    );

    Ok(ok(CheckoutSessionResponse {
        session_id: session.id,
        url: session.url,
    }))
}

/// POST /api/accounts/payments/verify-session
///
/// Confirm a finished checkout and mirror the purchased plan onto the
/// account. Verifying the same session twice yields the same state.
///
/// Buying lifetime while a subscription is running schedules that
/// subscription to cancel at the end of its period.
pub async fn verify_session(
    State(state): State<AppState>,
    AccountUser(account): AccountUser,
    Json(input): Json<VerifySessionRequest>,
) -> AppResult<Json<DataResponse<SubscriptionStatusResponse>>> {
    let payments = state.payments()?;
    let session = payments.retrieve_checkout_session(&input.session_id).await?;

    if session.account_id() != Some(account.id) {
        tracing::warn!(account_id = account.id, session_id = %session.id, "Session belongs to another account");
        return Err(AppError::Core(CoreError::Forbidden(
            "This checkout session belongs to another account".into(),
        )));
    }
    if !session.is_paid() {
        return Err(AppError::BadRequest("Payment has not been completed".into()));
    }
    let plan = session.plan().ok_or_else(|| {
        AppError::InternalError(format!("Checkout session {} has no plan metadata", session.id))
    })?;

    let (mirror, subscription) = match plan.plan_type() {
        PlanType::Full => {
            if let Some(subscription_id) = account.subscription_id.as_deref() {
                payments
                    .set_cancel_at_period_end(subscription_id, true)
                    .await?;
                tracing::info!(
                    account_id = account.id,
                    subscription_id,
                    "Subscription set to cancel after lifetime purchase"
                );
            }
            (
                BillingMirror {
                    plan_type: Some(PlanType::Full.as_str().to_string()),
                    subscription_id: None,
                    plan_expires_at: None,
                    cancel_at_period_end: false,
                },
                None,
            )
        }
        // An older subscription checkout never downgrades a lifetime plan.
        PlanType::Sub if account.plan_type.as_deref() == Some(PlanType::Full.as_str()) => {
            return Ok(ok(status_response(&account, None)));
        }
        PlanType::Sub => {
            let subscription_id = session.subscription.as_deref().ok_or_else(|| {
                AppError::InternalError(format!(
                    "Subscription checkout {} has no subscription",
                    session.id
                ))
            })?;
            let subscription = payments.retrieve_subscription(subscription_id).await?;
            (
                BillingMirror {
                    plan_type: Some(PlanType::Sub.as_str().to_string()),
                    subscription_id: Some(subscription.id.clone()),
                    plan_expires_at: subscription.period_end(),
                    cancel_at_period_end: subscription.cancel_at_period_end,
                },
                Some(subscription),
            )
        }
    };

    let updated = apply_mirror(&state, &account, &mirror).await?;
    tracing::info!(account_id = account.id, plan = plan.as_str(), "Checkout verified");
    Ok(ok(status_response(&updated, subscription.as_ref())))
}

/// POST /api/accounts/payments/cancel-subscription
pub async fn cancel_subscription(
    State(state): State<AppState>,
    AccountUser(account): AccountUser,
) -> AppResult<Json<DataResponse<SubscriptionStatusResponse>>> {
    let payments = state.payments()?;
    ensure_cancelable(account.plan_type.as_deref(), account.subscription_id.as_deref())?;
    let subscription_id = account.subscription_id.as_deref().unwrap_or_default();

    let subscription = payments
        .set_cancel_at_period_end(subscription_id, true)
        .await?;
    let updated = apply_mirror(&state, &account, &mirror_subscription(&account, &subscription)).await?;

    tracing::info!(account_id = account.id, subscription_id, "Subscription set to cancel");
    Ok(ok(status_response(&updated, Some(&subscription))))
}

/// POST /api/accounts/payments/reactivate-subscription
pub async fn reactivate_subscription(
    State(state): State<AppState>,
    AccountUser(account): AccountUser,
) -> AppResult<Json<DataResponse<SubscriptionStatusResponse>>> {
    let payments = state.payments()?;
    let subscription_id = match account.subscription_id.as_deref() {
        Some(id) if account.subscription_cancel_at_period_end => id,
        _ => {
            return Err(AppError::Core(CoreError::Validation(
                "Subscription is not scheduled to cancel".into(),
            )))
        }
    };

    let subscription = payments
        .set_cancel_at_period_end(subscription_id, false)
        .await?;
    let updated = apply_mirror(&state, &account, &mirror_subscription(&account, &subscription)).await?;

    tracing::info!(account_id = account.id, subscription_id, "Subscription reactivated");
    Ok(ok(status_response(&updated, Some(&subscription))))
}

/// GET /api/accounts/payments/subscription-status
///
/// Refresh the mirrored period end from Stripe when a subscription exists.
pub async fn subscription_status(
    State(state): State<AppState>,
    AccountUser(account): AccountUser,
) -> AppResult<Json<DataResponse<SubscriptionStatusResponse>>> {
    let payments = state.payments()?;
    let (updated, subscription) = refresh_subscription(&state, payments, &account).await?;
    Ok(ok(status_response(&updated, subscription.as_ref())))
}

/// GET /api/accounts/payments/payment-history
pub async fn payment_history(
    State(state): State<AppState>,
    AccountUser(account): AccountUser,
) -> AppResult<Json<DataResponse<Vec<PaymentRecord>>>> {
    let payments = state.payments()?;
    let Some(customer_id) = account.stripe_customer_id.as_deref() else {
        return Ok(ok(Vec::new()));
    };

    let intents = payments
        .list_payment_intents(customer_id, PAYMENT_HISTORY_LIMIT)
        .await?;
    let records = intents
        .into_iter()
        .map(|p| PaymentRecord {
            created_at: DateTime::from_timestamp(p.created, 0),
            id: p.id,
            amount: p.amount,
            currency: p.currency,
            status: p.status,
            description: p.description,
        })
        .collect();
    Ok(ok(records))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn display_name(account: &Account) -> String {
    match &account.last_name {
        Some(last) if !last.is_empty() => format!("{} {last}", account.first_name),
        _ => account.first_name.clone(),
    }
}

fn status_response(account: &Account, subscription: Option<&Subscription>) -> SubscriptionStatusResponse {
    let access = account_access(account);
    SubscriptionStatusResponse {
        plan_type: account.plan_type.clone(),
        subscription_status: subscription.map(|s| s.status.clone()),
        plan_expires_at: account.plan_expires_at,
        cancel_at_period_end: account.subscription_cancel_at_period_end,
        has_access: access.has_access(),
        access,
        account: AccountResponse::from(account),
    }
}
