//! Handlers for the `/accounts` resource.
//!
//! Accounts are the paying owners of a family. They authenticate with
//! email and password and receive an account-kind token scoped to their
//! family once one exists.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use babycontrol_core::billing::AccessStatus;
use babycontrol_core::error::CoreError;
use babycontrol_core::tokens::{generate_token, hash_token, EMAIL_TOKEN_LENGTH};
use babycontrol_db::models::account::{
    AccountResponse, BillingMirror, CreateAccount, UpdateAccountProfile,
};
use babycontrol_db::repositories::{AccountRepo, FamilyRepo};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::password::validate_password_strength;
use crate::email::{password_reset_email, verification_email};
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::AccountUser;
use crate::response::{message, ok, DataResponse, MessageResponse};
use crate::state::AppState;
use crate::subscriptions::account_access;

use super::auth::{account_principal, issue_token, TokenResponse};
use super::{hash_secret, verify_secret};

/// Password-reset links are valid for one hour.
const RESET_TOKEN_EXPIRY_HOURS: i64 = 1;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    pub password: String,
    #[validate(length(min = 1, max = 100, message = "must be 1-100 characters"))]
    pub first_name: String,
    #[validate(length(max = 100, message = "must be at most 100 characters"))]
    pub last_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub token: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRequest {
    #[validate(length(min = 1, max = 100, message = "must be 1-100 characters"))]
    pub first_name: Option<String>,
    #[validate(length(max = 100, message = "must be at most 100 characters"))]
    pub last_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AccountAuthResponse {
    #[serde(flatten)]
    pub auth: TokenResponse,
    pub account: AccountResponse,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountStatusResponse {
    pub account: AccountResponse,
    pub family_slug: Option<String>,
    pub access: AccessStatus,
    pub has_access: bool,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/accounts/register
///
/// Create an account on a free trial and send the verification email.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<AccountAuthResponse>>)> {
    input.validate()?;
    validate_password_strength(&input.password)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    if AccountRepo::find_by_email(&state.pool, &input.email)
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::Conflict(
            "An account with this email already exists".into(),
        )));
    }

    let verification = generate_token(EMAIL_TOKEN_LENGTH);
    let create = CreateAccount {
        email: input.email.trim().to_string(),
        password_hash: hash_secret(&input.password)?,
        first_name: input.first_name.trim().to_string(),
        last_name: input.last_name.map(|n| n.trim().to_string()),
        verification_token_hash: Some(verification.hash),
        trial_ends_at: Some(Utc::now() + Duration::days(state.config.trial_days)),
    };
    let account = AccountRepo::create(&state.pool, &create).await?;

    tracing::info!(account_id = account.id, "Account registered");

    state
        .mailer
        .send_logged(&verification_email(
            &account.email,
            &account.first_name,
            &state.config.app_url,
            &verification.plaintext,
        ))
        .await;

    let auth = issue_token(&state, account_principal(account.id, None))?;
    Ok((
        StatusCode::CREATED,
        ok(AccountAuthResponse {
            auth,
            account: AccountResponse::from(&account),
        }),
    ))
}

/// POST /api/accounts/login
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<DataResponse<AccountAuthResponse>>> {
    let invalid = || AppError::Core(CoreError::Unauthorized("Invalid email or password".into()));

    let account = AccountRepo::find_by_email(&state.pool, input.email.trim())
        .await?
        .ok_or_else(invalid)?;
    if !verify_secret(&input.password, &account.password_hash)? {
        tracing::info!(account_id = account.id, "Account login failed");
        return Err(invalid());
    }
    if account.is_closed {
        return Err(AppError::Core(CoreError::Forbidden(
            "This account has been closed".into(),
        )));
    }

    let family = match account.family_id {
        Some(id) => FamilyRepo::find_by_id(&state.pool, id).await?,
        None => None,
    };

    tracing::info!(account_id = account.id, "Account logged in");
    let auth = issue_token(&state, account_principal(account.id, family.as_ref()))?;
    Ok(ok(AccountAuthResponse {
        auth,
        account: AccountResponse::from(&account),
    }))
}

/// POST /api/accounts/verify
pub async fn verify_email(
    State(state): State<AppState>,
    Json(input): Json<TokenRequest>,
) -> AppResult<Json<DataResponse<MessageResponse>>> {
    let account = AccountRepo::find_by_verification_hash(&state.pool, &hash_token(&input.token))
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Missing(
                "Invalid or already used verification link".into(),
            ))
        })?;

    AccountRepo::mark_verified(&state.pool, account.id).await?;
    tracing::info!(account_id = account.id, "Account email verified");
    Ok(message("Email verified"))
}

/// POST /api/accounts/forgot-password
///
/// Always answers 200 so the endpoint cannot be used to probe for emails.
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(input): Json<ForgotPasswordRequest>,
) -> AppResult<Json<DataResponse<MessageResponse>>> {
    input.validate()?;

    if let Some(account) = AccountRepo::find_by_email(&state.pool, input.email.trim())
        .await?
        .filter(|a| !a.is_closed)
    {
        let reset = generate_token(EMAIL_TOKEN_LENGTH);
        let expires_at = Utc::now() + Duration::hours(RESET_TOKEN_EXPIRY_HOURS);
        AccountRepo::set_reset_token(&state.pool, account.id, &reset.hash, expires_at).await?;

        state
            .mailer
            .send_logged(&password_reset_email(
                &account.email,
                &account.first_name,
                &state.config.app_url,
                &reset.plaintext,
            ))
            .await;
        tracing::info!(account_id = account.id, "Password reset requested");
    }

    Ok(message(
        "If an account exists for that email, a reset link has been sent",
    ))
}

/// POST /api/accounts/reset-password
pub async fn reset_password(
    State(state): State<AppState>,
    Json(input): Json<ResetPasswordRequest>,
) -> AppResult<Json<DataResponse<MessageResponse>>> {
    validate_password_strength(&input.password)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let account = AccountRepo::find_by_reset_hash(&state.pool, &hash_token(&input.token))
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Missing("Invalid reset link".into())))?;

    let expired = account
        .password_reset_expires_at
        .is_none_or(|at| at <= Utc::now());
    if expired {
        return Err(AppError::Core(CoreError::Gone(
            "This reset link has expired".into(),
        )));
    }

    let hash = hash_secret(&input.password)?;
    AccountRepo::update_password(&state.pool, account.id, &hash).await?;
    tracing::info!(account_id = account.id, "Password reset");
    Ok(message("Password updated"))
}

/// GET /api/accounts/status
pub async fn status(
    State(state): State<AppState>,
    AccountUser(account): AccountUser,
) -> AppResult<Json<DataResponse<AccountStatusResponse>>> {
    let family_slug = match account.family_id {
        Some(id) => FamilyRepo::find_by_id(&state.pool, id)
            .await?
            .map(|f| f.slug),
        None => None,
    };
    let access = account_access(&account);

    Ok(ok(AccountStatusResponse {
        account: AccountResponse::from(&account),
        family_slug,
        has_access: access.has_access(),
        access,
    }))
}

/// PUT /api/accounts/profile
pub async fn update_profile(
    State(state): State<AppState>,
    AccountUser(account): AccountUser,
    Json(input): Json<ProfileRequest>,
) -> AppResult<Json<DataResponse<AccountResponse>>> {
    input.validate()?;
    let update = UpdateAccountProfile {
        first_name: input.first_name.map(|n| n.trim().to_string()),
        last_name: input.last_name.map(|n| n.trim().to_string()),
    };
    let updated = AccountRepo::update_profile(&state.pool, account.id, &update)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Account",
            id: account.id,
        }))?;
    Ok(ok(AccountResponse::from(&updated)))
}

/// POST /api/accounts/close
///
/// Close the account. A running subscription is set to end with the
/// current period rather than refunded.
pub async fn close(
    State(state): State<AppState>,
    AccountUser(account): AccountUser,
) -> AppResult<Json<DataResponse<MessageResponse>>> {
    if let Some(subscription_id) = account.subscription_id.as_deref() {
        if !account.subscription_cancel_at_period_end {
            let payments = state.payments()?;
            let subscription = payments
                .set_cancel_at_period_end(subscription_id, true)
                .await?;
            AccountRepo::apply_billing(
                &state.pool,
                account.id,
                &BillingMirror {
                    plan_type: account.plan_type.clone(),
                    subscription_id: Some(subscription.id.clone()),
                    plan_expires_at: subscription.period_end().or(account.plan_expires_at),
                    cancel_at_period_end: true,
                },
            )
            .await?;
            tracing::info!(account_id = account.id, subscription_id, "Subscription set to cancel on close");
        }
    }

    AccountRepo::close(&state.pool, account.id).await?;
    tracing::info!(account_id = account.id, "Account closed");
    Ok(message("Account closed"))
}
