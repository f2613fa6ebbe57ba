//! Stripe REST implementation of [`PaymentProvider`].
//!
//! Stripe takes `application/x-www-form-urlencoded` bodies with bracketed
//! keys for nested fields (`line_items[0][price]`) and authenticates with
//! the secret key as a bearer token.

use async_trait::async_trait;
use babycontrol_core::billing::BillingPlan;
use babycontrol_core::types::DbId;
use serde::Deserialize;

use crate::provider::{
    BillingError, CheckoutRequest, CheckoutSession, Customer, PaymentIntent, PaymentProvider,
    Subscription, METADATA_ACCOUNT_ID, METADATA_PLAN,
};

/// Default Stripe API base URL.
pub const DEFAULT_STRIPE_API_BASE: &str = "https://api.stripe.com/v1";

// ---------------------------------------------------------------------------
// StripeConfig
// ---------------------------------------------------------------------------

/// Stripe credentials and price ids.
#[derive(Debug, Clone)]
pub struct StripeConfig {
    pub secret_key: String,
    pub api_base: String,
    pub price_monthly: Option<String>,
    pub price_yearly: Option<String>,
    pub price_lifetime: Option<String>,
}

impl StripeConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` if `STRIPE_SECRET_KEY` is not set, in which case
    /// billing endpoints answer 503.
    ///
    /// | Variable                | Required | Default                      |
    /// |-------------------------|----------|------------------------------|
    /// | `STRIPE_SECRET_KEY`     | yes      |                              |
    /// | `STRIPE_API_BASE`       | no       | `https://api.stripe.com/v1`  |
    /// | `STRIPE_PRICE_MONTHLY`  | no       |                              |
    /// | `STRIPE_PRICE_YEARLY`   | no       |                              |
    /// | `STRIPE_PRICE_LIFETIME` | no       |                              |
    pub fn from_env() -> Option<Self> {
        let secret_key = std::env::var("STRIPE_SECRET_KEY")
            .ok()
            .filter(|k| !k.is_empty())?;
        Some(Self {
            secret_key,
            api_base: std::env::var("STRIPE_API_BASE")
                .unwrap_or_else(|_| DEFAULT_STRIPE_API_BASE.to_string()),
            price_monthly: std::env::var("STRIPE_PRICE_MONTHLY").ok(),
            price_yearly: std::env::var("STRIPE_PRICE_YEARLY").ok(),
            price_lifetime: std::env::var("STRIPE_PRICE_LIFETIME").ok(),
        })
    }

    /// Price id for a plan, or [`BillingError::MissingPrice`].
    pub fn price_for(&self, plan: BillingPlan) -> Result<&str, BillingError> {
        let price = match plan {
            BillingPlan::Monthly => &self.price_monthly,
            BillingPlan::Yearly => &self.price_yearly,
            BillingPlan::Lifetime => &self.price_lifetime,
        };
        price
            .as_deref()
            .ok_or_else(|| BillingError::MissingPrice(plan.as_str().to_string()))
    }
}

// ---------------------------------------------------------------------------
// StripeClient
// ---------------------------------------------------------------------------

/// HTTP client for the Stripe API.
pub struct StripeClient {
    client: reqwest::Client,
    config: StripeConfig,
}

#[derive(Debug, Deserialize)]
struct ListResponse<T> {
    data: Vec<T>,
}

impl StripeClient {
    pub fn new(config: StripeConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.api_base.trim_end_matches('/'), path)
    }

    async fn post_form<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        form: &[(String, String)],
    ) -> Result<T, BillingError> {
        let response = self
            .client
            .post(self.url(path))
            .bearer_auth(&self.config.secret_key)
            .form(form)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, BillingError> {
        let response = self
            .client
            .get(self.url(path))
            .bearer_auth(&self.config.secret_key)
            .query(query)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    /// Turn a non-2xx response into [`BillingError::Api`], otherwise decode JSON.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, BillingError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            tracing::warn!(status = status.as_u16(), "Stripe request failed");
            return Err(BillingError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json::<T>().await?)
    }
}

/// Check an object id before it is placed in a URL path.
///
/// Stripe ids are ASCII alphanumerics and underscores (`cs_test_a1B2`).
pub(crate) fn path_id(id: &str) -> Result<&str, BillingError> {
    let valid = !id.is_empty() && id.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_');
    if valid {
        Ok(id)
    } else {
        Err(BillingError::InvalidId(id.to_string()))
    }
}

/// Form fields for `POST /checkout/sessions`.
pub(crate) fn checkout_form(request: &CheckoutRequest, price_id: &str) -> Vec<(String, String)> {
    let account_id = request.account_id.to_string();
    let mut form = vec![
        ("mode".to_string(), request.plan.checkout_mode().to_string()),
        ("customer".to_string(), request.customer_id.clone()),
        ("line_items[0][price]".to_string(), price_id.to_string()),
        ("line_items[0][quantity]".to_string(), "1".to_string()),
        ("success_url".to_string(), request.success_url.clone()),
        ("cancel_url".to_string(), request.cancel_url.clone()),
        ("client_reference_id".to_string(), account_id.clone()),
        (format!("metadata[{METADATA_ACCOUNT_ID}]"), account_id.clone()),
        (format!("metadata[{METADATA_PLAN}]"), request.plan.as_str().to_string()),
    ];
    if request.plan != BillingPlan::Lifetime {
        form.push((
            format!("subscription_data[metadata][{METADATA_ACCOUNT_ID}]"),
            account_id,
        ));
    }
    form
}

#[async_trait]
impl PaymentProvider for StripeClient {
    async fn create_customer(
        &self,
        email: &str,
        name: &str,
        account_id: DbId,
    ) -> Result<Customer, BillingError> {
        let form = vec![
            ("email".to_string(), email.to_string()),
            ("name".to_string(), name.to_string()),
            (format!("metadata[{METADATA_ACCOUNT_ID}]"), account_id.to_string()),
        ];
        let customer: Customer = self.post_form("customers", &form).await?;
        tracing::info!(account_id, customer_id = %customer.id, "Stripe customer created");
        Ok(customer)
    }

    async fn create_checkout_session(
        &self,
        request: &CheckoutRequest,
    ) -> Result<CheckoutSession, BillingError> {
        let price_id = self.config.price_for(request.plan)?;
        let form = checkout_form(request, price_id);
        self.post_form("checkout/sessions", &form).await
    }

    async fn retrieve_checkout_session(
        &self,
        session_id: &str,
    ) -> Result<CheckoutSession, BillingError> {
        let session_id = path_id(session_id)?;
        self.get(&format!("checkout/sessions/{session_id}"), &[]).await
    }

    async fn retrieve_subscription(
        &self,
        subscription_id: &str,
    ) -> Result<Subscription, BillingError> {
        let subscription_id = path_id(subscription_id)?;
        self.get(&format!("subscriptions/{subscription_id}"), &[]).await
    }

    async fn set_cancel_at_period_end(
        &self,
        subscription_id: &str,
        cancel: bool,
    ) -> Result<Subscription, BillingError> {
        let subscription_id = path_id(subscription_id)?;
        let form = vec![("cancel_at_period_end".to_string(), cancel.to_string())];
        self.post_form(&format!("subscriptions/{subscription_id}"), &form)
            .await
    }

    async fn list_payment_intents(
        &self,
        customer_id: &str,
        limit: u32,
    ) -> Result<Vec<PaymentIntent>, BillingError> {
        let list: ListResponse<PaymentIntent> = self
            .get(
                "payment_intents",
                &[("customer", customer_id.to_string()), ("limit", limit.to_string())],
            )
            .await?;
        Ok(list.data)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> StripeConfig {
        StripeConfig {
            secret_key: "sk_test".to_string(),
            api_base: "https://stripe.test/v1/".to_string(),
            price_monthly: Some("price_m".to_string()),
            price_yearly: None,
            price_lifetime: Some("price_l".to_string()),
        }
    }

    fn request(plan: BillingPlan) -> CheckoutRequest {
        CheckoutRequest {
            customer_id: "cus_1".to_string(),
            plan,
            account_id: 7,
            success_url: "https://app.test/ok".to_string(),
            cancel_url: "https://app.test/cancel".to_string(),
        }
    }

    fn field<'a>(form: &'a [(String, String)], key: &str) -> Option<&'a str> {
        form.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    #[test]
    fn price_lookup() {
        let cfg = config();
        assert_eq!(cfg.price_for(BillingPlan::Monthly).unwrap(), "price_m");
        assert!(matches!(
            cfg.price_for(BillingPlan::Yearly),
            Err(BillingError::MissingPrice(p)) if p == "yearly"
        ));
    }

    #[test]
    fn url_joins_without_double_slash() {
        let client = StripeClient::new(config());
        assert_eq!(client.url("customers"), "https://stripe.test/v1/customers");
    }

    #[test]
    fn path_ids_reject_path_characters() {
        assert_eq!(path_id("cs_test_a1B2").unwrap(), "cs_test_a1B2");
        for bad in ["", "cs_1/../../customers", "sub_1?expand=x", "cs_1%2F..", "sub 1"] {
            assert!(
                matches!(path_id(bad), Err(BillingError::InvalidId(id)) if id == bad),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn subscription_checkout_carries_account_metadata() {
        let form = checkout_form(&request(BillingPlan::Monthly), "price_m");
        assert_eq!(field(&form, "mode"), Some("subscription"));
        assert_eq!(field(&form, "line_items[0][price]"), Some("price_m"));
        assert_eq!(field(&form, "metadata[account_id]"), Some("7"));
        assert_eq!(field(&form, "metadata[plan]"), Some("monthly"));
        assert_eq!(field(&form, "subscription_data[metadata][account_id]"), Some("7"));
    }

    #[test]
    fn lifetime_checkout_is_one_time_payment() {
        let form = checkout_form(&request(BillingPlan::Lifetime), "price_l");
        assert_eq!(field(&form, "mode"), Some("payment"));
        assert_eq!(field(&form, "subscription_data[metadata][account_id]"), None);
    }

    #[test]
    fn decodes_checkout_session() {
        let json = r#"{
            "id": "cs_1",
            "object": "checkout.session",
            "url": null,
            "status": "complete",
            "payment_status": "paid",
            "mode": "subscription",
            "customer": "cus_1",
            "subscription": "sub_1",
            "metadata": {"account_id": "7", "plan": "monthly"}
        }"#;
        let session: CheckoutSession = serde_json::from_str(json).unwrap();
        assert!(session.is_paid());
        assert_eq!(session.account_id(), Some(7));
    }

    #[test]
    fn decodes_payment_intent_list() {
        let json = r#"{
            "object": "list",
            "data": [{"id": "pi_1", "amount": 499, "currency": "usd",
                      "status": "succeeded", "created": 1700000000}],
            "has_more": false
        }"#;
        let list: ListResponse<PaymentIntent> = serde_json::from_str(json).unwrap();
        assert_eq!(list.data.len(), 1);
        assert_eq!(list.data[0].amount, 499);
        assert!(list.data[0].description.is_none());
    }
}
