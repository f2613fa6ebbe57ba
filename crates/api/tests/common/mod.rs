#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use babycontrol_api::auth::jwt::JwtConfig;
use babycontrol_api::auth::password::hash_password;
use babycontrol_api::config::ServerConfig;
use babycontrol_api::email::Mailer;
use babycontrol_api::router::build_app_router;
use babycontrol_api::state::AppState;
use babycontrol_billing::{
    BillingError, CheckoutRequest, CheckoutSession, Customer, PaymentIntent, PaymentProvider,
    Subscription, METADATA_ACCOUNT_ID, METADATA_PLAN,
};
use babycontrol_core::tokens::hash_token;
use babycontrol_core::types::DbId;
use babycontrol_db::models::setup_token::CreateSetupToken;
use babycontrol_db::repositories::SetupTokenRepo;
use chrono::{Duration, Utc};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::PgPool;
use tower::ServiceExt;

pub const SYSADMIN_PASSWORD: &str = "sysadmin-password";

/// Build a test `ServerConfig` with safe defaults and no external services.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        app_url: "http://localhost:5173".to_string(),
        jwt: JwtConfig {
            secret: "integration-test-secret".to_string(),
            expiry_hours: 24,
            setup_expiry_mins: 60,
        },
        sysadmin_password_hash: Some(hash_password(SYSADMIN_PASSWORD).unwrap()),
        setup_token_expiry_hours: 24,
        trial_days: 14,
        stripe: None,
        email: None,
    }
}

/// Build the full application router without a payment provider.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with(pool, None)
}

/// Build the full application router, optionally with a payment provider.
///
/// Goes through [`build_app_router`] so tests exercise the same middleware
/// stack as production.
pub fn build_test_app_with(pool: PgPool, payments: Option<Arc<dyn PaymentProvider>>) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        payments,
        mailer: Arc::new(Mailer::new(None)),
    };
    build_app_router(state, &config)
}

/// Build the app with a fresh [`FakePayments`], returned for inspection.
pub fn build_test_app_with_fake(pool: PgPool) -> (Router, Arc<FakePayments>) {
    let fake = Arc::new(FakePayments::default());
    let provider: Arc<dyn PaymentProvider> = fake.clone();
    (build_test_app_with(pool, Some(provider)), fake)
}

// ---------------------------------------------------------------------------
// Fake payment provider
// ---------------------------------------------------------------------------

/// In-memory provider.
///
/// Checkout sessions must be registered with [`FakePayments::add_session`]
/// before they can be retrieved. Subscriptions report `subscription_status`
/// (default `active`) with a period ending in 30 days, and every
/// cancel/reactivate call is recorded.
pub struct FakePayments {
    sessions: Mutex<HashMap<String, CheckoutSession>>,
    subscription_status: Mutex<String>,
    cancel_calls: Mutex<Vec<(String, bool)>>,
}

impl Default for FakePayments {
    fn default() -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            subscription_status: Mutex::new("active".to_string()),
            cancel_calls: Mutex::new(Vec::new()),
        }
    }
}

impl FakePayments {
    /// Register a checkout session for `account_id` and `plan`.
    ///
    /// Subscription plans get a subscription id of `sub_{id}`.
    pub fn add_session(&self, id: &str, account_id: DbId, plan: &str, payment_status: &str) {
        let subscription_mode = plan != "lifetime";
        let metadata = HashMap::from([
            (METADATA_ACCOUNT_ID.to_string(), account_id.to_string()),
            (METADATA_PLAN.to_string(), plan.to_string()),
        ]);
        let session = CheckoutSession {
            id: id.to_string(),
            url: None,
            status: Some("complete".to_string()),
            payment_status: payment_status.to_string(),
            mode: if subscription_mode { "subscription" } else { "payment" }.to_string(),
            customer: Some(format!("cus_{account_id}")),
            subscription: subscription_mode.then(|| format!("sub_{id}")),
            metadata,
        };
        self.sessions.lock().unwrap().insert(id.to_string(), session);
    }

    pub fn set_subscription_status(&self, status: &str) {
        *self.subscription_status.lock().unwrap() = status.to_string();
    }

    /// `(subscription_id, cancel_at_period_end)` for every cancel/reactivate call.
    pub fn cancel_calls(&self) -> Vec<(String, bool)> {
        self.cancel_calls.lock().unwrap().clone()
    }

    fn subscription(&self, id: &str, cancel_at_period_end: bool) -> Subscription {
        Subscription {
            id: id.to_string(),
            status: self.subscription_status.lock().unwrap().clone(),
            current_period_end: Some((Utc::now() + Duration::days(30)).timestamp()),
            cancel_at_period_end,
        }
    }
}

#[async_trait]
impl PaymentProvider for FakePayments {
    async fn create_customer(
        &self,
        _email: &str,
        _name: &str,
        account_id: DbId,
    ) -> Result<Customer, BillingError> {
        Ok(Customer {
            id: format!("cus_{account_id}"),
        })
    }

    async fn create_checkout_session(
        &self,
        request: &CheckoutRequest,
    ) -> Result<CheckoutSession, BillingError> {
        Ok(CheckoutSession {
            id: "cs_test".to_string(),
            url: Some("https://checkout.test/cs_test".to_string()),
            status: Some("open".to_string()),
            payment_status: "unpaid".to_string(),
            mode: request.plan.checkout_mode().to_string(),
            customer: Some(request.customer_id.clone()),
            subscription: None,
            metadata: Default::default(),
        })
    }

    async fn retrieve_checkout_session(
        &self,
        session_id: &str,
    ) -> Result<CheckoutSession, BillingError> {
        self.sessions
            .lock()
            .unwrap()
            .get(session_id)
            .cloned()
            .ok_or_else(|| BillingError::Api {
                status: 404,
                body: format!("No such checkout session: {session_id}"),
            })
    }

    async fn retrieve_subscription(
        &self,
        subscription_id: &str,
    ) -> Result<Subscription, BillingError> {
        Ok(self.subscription(subscription_id, false))
    }

    async fn set_cancel_at_period_end(
        &self,
        subscription_id: &str,
        cancel: bool,
    ) -> Result<Subscription, BillingError> {
        self.cancel_calls
            .lock()
            .unwrap()
            .push((subscription_id.to_string(), cancel));
        Ok(self.subscription(subscription_id, cancel))
    }

    async fn list_payment_intents(
        &self,
        _customer_id: &str,
        _limit: u32,
    ) -> Result<Vec<PaymentIntent>, BillingError> {
        Ok(Vec::new())
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Read the response body and parse it as JSON.
pub async fn body_json(response: Response) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("failed to read body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body is not valid JSON")
}

async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.unwrap()
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, json_request("GET", uri, None, None)).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, json_request("GET", uri, Some(token), None)).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response {
    send(app, json_request("POST", uri, None, Some(body))).await
}

pub async fn post_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response {
    send(app, json_request("POST", uri, Some(token), Some(body))).await
}

pub async fn put_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response {
    send(app, json_request("PUT", uri, Some(token), Some(body))).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, json_request("DELETE", uri, Some(token), None)).await
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Insert an unused setup token for `token` and return its id.
pub async fn create_setup_token(pool: &PgPool, token: &str, password: &str) -> DbId {
    SetupTokenRepo::create(
        pool,
        &CreateSetupToken {
            token_hash: hash_token(token),
            password_hash: hash_password(password).unwrap(),
            expires_at: Utc::now() + Duration::hours(24),
            created_by: "sysadmin".to_string(),
        },
    )
    .await
    .expect("setup token creation should succeed")
    .id
}

/// Exchange a setup token for a setup session token.
pub async fn setup_session(app: Router, token: &str, password: &str) -> String {
    let response = post_json(
        app,
        "/api/auth/setup-token",
        json!({ "token": token, "password": password }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    json["data"]["token"].as_str().unwrap().to_string()
}

/// Wizard payload with one admin caretaker (`01` / `111111`) and one baby.
pub fn setup_body(slug: &str) -> Value {
    json!({
        "name": "Test Family",
        "slug": slug,
        "authType": "CARETAKER",
        "caretakers": [
            { "loginId": "01", "name": "Parent", "type": "Parent", "role": "ADMIN", "securityPin": "111111" }
        ],
        "baby": { "firstName": "Ada", "birthDate": "2026-01-15", "gender": "FEMALE" }
    })
}

/// A family created through the setup wizard.
pub struct TestFamily {
    pub id: DbId,
    pub slug: String,
    pub baby_id: DbId,
    /// Token for the admin caretaker.
    pub token: String,
}

/// Create a family through a setup token and return the admin's token.
pub async fn create_family(app: Router, pool: &PgPool, slug: &str) -> TestFamily {
    let plaintext = format!("setup-{slug}");
    create_setup_token(pool, &plaintext, "setup-password").await;
    let session = setup_session(app.clone(), &plaintext, "setup-password").await;

    let response = post_json_auth(app, "/api/setup/start", setup_body(slug), &session).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    TestFamily {
        id: json["data"]["family"]["id"].as_i64().unwrap(),
        slug: slug.to_string(),
        baby_id: json["data"]["baby"]["id"].as_i64().unwrap(),
        token: json["data"]["auth"]["token"].as_str().unwrap().to_string(),
    }
}

/// Register an account and return `(account_id, token)`.
pub async fn register_account(app: Router, email: &str) -> (DbId, String) {
    let response = post_json(
        app,
        "/api/accounts/register",
        json!({ "email": email, "password": "account-password", "firstName": "Owner" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    (
        json["data"]["account"]["id"].as_i64().unwrap(),
        json["data"]["token"].as_str().unwrap().to_string(),
    )
}
