//! Handlers for the `/auth` resource: caretaker, sysadmin and setup-token logins.

use axum::extract::State;
use axum::Json;
use babycontrol_core::activity::AUTH_TYPE_SYSTEM;
use babycontrol_core::error::CoreError;
use babycontrol_core::roles::ROLE_ADMIN;
use babycontrol_core::tokens::hash_token;
use babycontrol_core::types::Timestamp;
use babycontrol_db::models::caretaker::Caretaker;
use babycontrol_db::models::family::Family;
use babycontrol_db::models::settings::Settings;
use babycontrol_db::repositories::{CaretakerRepo, FamilyRepo, SettingsRepo, SetupTokenRepo};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::jwt::{generate_token, Principal};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::Identity;
use crate::response::{ok, DataResponse};
use crate::state::AppState;

use super::verify_secret;

/// Consecutive failed PIN attempts before a caretaker (or the system PIN) is locked.
const MAX_FAILED_ATTEMPTS: i32 = 5;

/// Lock duration after exceeding [`MAX_FAILED_ATTEMPTS`].
const LOCK_DURATION_MINS: i64 = 15;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaretakerLoginRequest {
    pub family_slug: String,
    /// Ignored when the family uses the system PIN.
    #[serde(default)]
    pub login_id: Option<String>,
    pub security_pin: String,
}

#[derive(Debug, Deserialize)]
pub struct SysadminLoginRequest {
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct SetupTokenLoginRequest {
    pub token: String,
    pub password: String,
}

/// Returned by every endpoint that issues a bearer token.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub token: String,
    /// Token lifetime in seconds.
    pub expires_in: i64,
    pub identity: Principal,
}

/// Caretaker login result: the token plus what the client shows in its header.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaretakerLoginResponse {
    #[serde(flatten)]
    pub auth: TokenResponse,
    pub family_name: String,
    pub caretaker_name: Option<String>,
    pub auth_type: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/auth/caretaker
///
/// Log in with a family slug, login id and PIN. Families on `SYSTEM` auth,
/// or without any active caretakers, check the family-wide PIN instead.
pub async fn caretaker_login(
    State(state): State<AppState>,
    Json(input): Json<CaretakerLoginRequest>,
) -> AppResult<Json<DataResponse<CaretakerLoginResponse>>> {
    let family = FamilyRepo::find_by_slug(&state.pool, &input.family_slug)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Missing("Family not found".into())))?;
    if !family.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "This family is inactive".into(),
        )));
    }

    let settings = SettingsRepo::find_by_family(&state.pool, family.id)
        .await?
        .ok_or_else(|| AppError::InternalError(format!("Family {} has no settings", family.id)))?;
    let active_caretakers = CaretakerRepo::count_active(&state.pool, family.id).await?;

    let (caretaker_id, role, caretaker_name) =
        if settings.auth_type == AUTH_TYPE_SYSTEM || active_caretakers == 0 {
            check_system_pin(&state, &settings, &input.security_pin).await?;
            (None, ROLE_ADMIN.to_string(), None)
        } else {
            let login_id = input.login_id.as_deref().unwrap_or_default();
            let caretaker = CaretakerRepo::find_by_login_id(&state.pool, family.id, login_id)
                .await?
                .filter(|c| !c.inactive)
                .ok_or_else(invalid_credentials)?;
            check_caretaker_pin(&state, &caretaker, &input.security_pin).await?;
            (Some(caretaker.id), caretaker.role, Some(caretaker.name))
        };

    tracing::info!(family_id = family.id, caretaker_id = ?caretaker_id, "Caretaker logged in");

    let auth = issue_token(
        &state,
        Principal::Caretaker {
            family_id: family.id,
            family_slug: family.slug.clone(),
            caretaker_id,
            role,
        },
    )?;

    Ok(ok(CaretakerLoginResponse {
        auth,
        family_name: family.name,
        caretaker_name,
        auth_type: settings.auth_type,
    }))
}

/// POST /api/auth/sysadmin
pub async fn sysadmin_login(
    State(state): State<AppState>,
    Json(input): Json<SysadminLoginRequest>,
) -> AppResult<Json<DataResponse<TokenResponse>>> {
    let hash = state
        .config
        .sysadmin_password_hash
        .as_deref()
        .ok_or_else(|| AppError::ServiceUnavailable("Sysadmin login is not configured".into()))?;

    let valid = verify_secret(&input.password, hash)?;
    if !valid {
        tracing::warn!("Sysadmin login failed");
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid password".into(),
        )));
    }

    tracing::info!("Sysadmin logged in");
    Ok(ok(issue_token(&state, Principal::SysAdmin)?))
}

/// POST /api/auth/setup-token
///
/// Exchange a setup link token and its password for a short-lived setup session.
pub async fn setup_token_login(
    State(state): State<AppState>,
    Json(input): Json<SetupTokenLoginRequest>,
) -> AppResult<Json<DataResponse<TokenResponse>>> {
    let token = SetupTokenRepo::find_by_hash(&state.pool, &hash_token(&input.token))
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Missing("Setup link not found".into())))?;

    if token.is_spent(Utc::now()) {
        return Err(AppError::Core(CoreError::Gone(
            "This setup link has already been used or has expired".into(),
        )));
    }

    let valid = verify_secret(&input.password, &token.password_hash)?;
    if !valid {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid setup password".into(),
        )));
    }

    tracing::info!(setup_token_id = token.id, "Setup session started");
    Ok(ok(issue_token(
        &state,
        Principal::Setup {
            setup_token_id: token.id,
        },
    )?))
}

/// GET /api/auth/me
pub async fn me(Identity(principal): Identity) -> Json<DataResponse<Principal>> {
    ok(principal)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn invalid_credentials() -> AppError {
    AppError::Core(CoreError::Unauthorized("Invalid login ID or PIN".into()))
}

fn ensure_not_locked(locked_until: Option<Timestamp>) -> AppResult<()> {
    match locked_until {
        Some(until) if until > Utc::now() => Err(AppError::Core(CoreError::Forbidden(
            "Too many failed attempts. Try again later.".into(),
        ))),
        _ => Ok(()),
    }
}

/// Verify the family-wide PIN, applying the same lockout policy as caretakers.
async fn check_system_pin(state: &AppState, settings: &Settings, pin: &str) -> AppResult<()> {
    ensure_not_locked(settings.locked_until)?;

    if !verify_secret(pin, &settings.security_pin_hash)? {
        let count = SettingsRepo::increment_failed_login(&state.pool, settings.family_id).await?;
        if count >= MAX_FAILED_ATTEMPTS {
            let lock_until = Utc::now() + Duration::minutes(LOCK_DURATION_MINS);
            SettingsRepo::lock(&state.pool, settings.family_id, lock_until).await?;
            tracing::warn!(family_id = settings.family_id, "System PIN locked after failed attempts");
        } else {
            tracing::info!(family_id = settings.family_id, "System PIN login failed");
        }
        return Err(invalid_credentials());
    }

    SettingsRepo::record_successful_login(&state.pool, settings.family_id).await?;
    Ok(())
}

/// Verify a caretaker PIN, applying the lockout policy.
async fn check_caretaker_pin(state: &AppState, caretaker: &Caretaker, pin: &str) -> AppResult<()> {
    ensure_not_locked(caretaker.locked_until)?;

    let valid = verify_secret(pin, &caretaker.security_pin_hash)?;

    if !valid {
        CaretakerRepo::increment_failed_login(&state.pool, caretaker.id).await?;
        let new_count = caretaker.failed_login_count + 1;
        if new_count >= MAX_FAILED_ATTEMPTS {
            let lock_until = Utc::now() + Duration::minutes(LOCK_DURATION_MINS);
            CaretakerRepo::lock(&state.pool, caretaker.id, lock_until).await?;
            tracing::warn!(caretaker_id = caretaker.id, "Caretaker locked after failed PIN attempts");
        }
        return Err(invalid_credentials());
    }

    CaretakerRepo::record_successful_login(&state.pool, caretaker.id).await?;
    Ok(())
}

/// Sign a token for `principal`.
pub(crate) fn issue_token(state: &AppState, principal: Principal) -> AppResult<TokenResponse> {
    let expires_in = state.config.jwt.lifetime_secs(&principal);
    let token = generate_token(principal.clone(), &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;
    Ok(TokenResponse {
        token,
        expires_in,
        identity: principal,
    })
}

/// Token for an account, scoped to its family when it has one.
pub(crate) fn account_principal(account_id: i64, family: Option<&Family>) -> Principal {
    Principal::Account {
        account_id,
        family_id: family.map(|f| f.id),
        family_slug: family.map(|f| f.slug.clone()),
    }
}
