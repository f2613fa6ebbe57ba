//! Provider-neutral billing types and the [`PaymentProvider`] trait.

use std::collections::HashMap;

use async_trait::async_trait;
use babycontrol_core::billing::BillingPlan;
use babycontrol_core::types::{DbId, Timestamp};
use chrono::DateTime;
use serde::{Deserialize, Serialize};

/// Metadata key carrying the owning account id on sessions and subscriptions.
pub const METADATA_ACCOUNT_ID: &str = "account_id";
/// Metadata key carrying the requested plan on checkout sessions.
pub const METADATA_PLAN: &str = "plan";

/// Errors from the billing layer.
#[derive(Debug, thiserror::Error)]
pub enum BillingError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider returned a non-2xx status code.
    #[error("Payment provider error ({status}): {body}")]
    Api { status: u16, body: String },

    /// An object id contains characters Stripe never issues.
    #[error("Invalid payment object id: {0:?}")]
    InvalidId(String),

    /// No price is configured for the requested plan.
    #[error("No price configured for plan '{0}'")]
    MissingPrice(String),
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Customer {
    pub id: String,
}

/// Everything needed to open a hosted checkout page.
#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    pub customer_id: String,
    pub plan: BillingPlan,
    pub account_id: DbId,
    pub success_url: String,
    pub cancel_url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CheckoutSession {
    pub id: String,
    #[serde(default)]
    pub url: Option<String>,
    /// `open`, `complete` or `expired`.
    #[serde(default)]
    pub status: Option<String>,
    /// `paid`, `unpaid` or `no_payment_required`.
    pub payment_status: String,
    /// `subscription` or `payment`.
    pub mode: String,
    #[serde(default)]
    pub customer: Option<String>,
    #[serde(default)]
    pub subscription: Option<String>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl CheckoutSession {
    /// Account id recorded in the session metadata, if any.
    pub fn account_id(&self) -> Option<DbId> {
        self.metadata.get(METADATA_ACCOUNT_ID)?.parse().ok()
    }

    /// Plan recorded in the session metadata, if any.
    pub fn plan(&self) -> Option<BillingPlan> {
        BillingPlan::parse(self.metadata.get(METADATA_PLAN)?).ok()
    }

    /// `true` once checkout finished and the payment cleared.
    pub fn is_paid(&self) -> bool {
        self.status.as_deref() == Some("complete")
            && matches!(self.payment_status.as_str(), "paid" | "no_payment_required")
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Subscription {
    pub id: String,
    pub status: String,
    #[serde(default)]
    pub current_period_end: Option<i64>,
    #[serde(default)]
    pub cancel_at_period_end: bool,
}

impl Subscription {
    pub fn period_end(&self) -> Option<Timestamp> {
        self.current_period_end
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PaymentIntent {
    pub id: String,
    /// Amount in the currency's smallest unit.
    pub amount: i64,
    pub currency: String,
    pub status: String,
    /// Unix seconds.
    pub created: i64,
    #[serde(default)]
    pub description: Option<String>,
}

/// Operations the API needs from a payment processor.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    async fn create_customer(
        &self,
        email: &str,
        name: &str,
        account_id: DbId,
    ) -> Result<Customer, BillingError>;

    async fn create_checkout_session(
        &self,
        request: &CheckoutRequest,
    ) -> Result<CheckoutSession, BillingError>;

    async fn retrieve_checkout_session(&self, session_id: &str)
        -> Result<CheckoutSession, BillingError>;

    async fn retrieve_subscription(&self, subscription_id: &str)
        -> Result<Subscription, BillingError>;

    /// Schedule (or unschedule) cancellation at the end of the current period.
    async fn set_cancel_at_period_end(
        &self,
        subscription_id: &str,
        cancel: bool,
    ) -> Result<Subscription, BillingError>;

    async fn list_payment_intents(
        &self,
        customer_id: &str,
        limit: u32,
    ) -> Result<Vec<PaymentIntent>, BillingError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(status: Option<&str>, payment_status: &str) -> CheckoutSession {
        let mut metadata = HashMap::new();
        metadata.insert(METADATA_ACCOUNT_ID.to_string(), "42".to_string());
        metadata.insert(METADATA_PLAN.to_string(), "yearly".to_string());
        CheckoutSession {
            id: "cs_test".to_string(),
            url: None,
            status: status.map(str::to_string),
            payment_status: payment_status.to_string(),
            mode: "subscription".to_string(),
            customer: Some("cus_1".to_string()),
            subscription: Some("sub_1".to_string()),
            metadata,
        }
    }

    #[test]
    fn metadata_accessors() {
        let s = session(Some("complete"), "paid");
        assert_eq!(s.account_id(), Some(42));
        assert_eq!(s.plan(), Some(BillingPlan::Yearly));
    }

    #[test]
    fn paid_requires_complete_status() {
        assert!(session(Some("complete"), "paid").is_paid());
        assert!(!session(Some("open"), "paid").is_paid());
        assert!(!session(Some("complete"), "unpaid").is_paid());
        assert!(!session(None, "paid").is_paid());
    }

    #[test]
    fn period_end_converts_unix_seconds() {
        let sub = Subscription {
            id: "sub_1".to_string(),
            status: "active".to_string(),
            current_period_end: Some(1_800_000_000),
            cancel_at_period_end: false,
        };
        assert_eq!(sub.period_end().map(|t| t.timestamp()), Some(1_800_000_000));
    }
}
