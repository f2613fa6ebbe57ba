//! Handlers for the `/family` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use babycontrol_core::error::CoreError;
use babycontrol_core::slug::{slug_rejection, validate_slug};
use babycontrol_core::tokens::{generate_token, SETUP_TOKEN_LENGTH};
use babycontrol_core::types::{DbId, Timestamp};
use babycontrol_db::models::family::{FamilyOverview, FamilyPublic, UpdateFamily};
use babycontrol_db::models::settings::Settings;
use babycontrol_db::models::setup_token::CreateSetupToken;
use babycontrol_db::repositories::{FamilyRepo, SettingsRepo, SetupTokenRepo};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::password::validate_password_strength;
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{FamilyAdmin, FamilyMember, SysAdmin};
use crate::response::{ok, DataResponse};
use crate::state::AppState;

use super::hash_secret;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct CheckSlugParams {
    pub slug: String,
}

#[derive(Debug, Serialize)]
pub struct SlugAvailability {
    pub available: bool,
    pub reason: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FamilyDetail {
    pub family: FamilyPublic,
    pub settings: Option<Settings>,
}

/// Body of `PUT /family`, editable by the family's admins.
#[derive(Debug, Deserialize)]
pub struct UpdateOwnFamily {
    pub name: Option<String>,
    pub slug: Option<String>,
}

/// Body of `PUT /family/{id}`, sysadmin only.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUpdateFamily {
    pub name: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct SetupLinkRequest {
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetupLinkResponse {
    /// Plaintext token. Shown once; only its hash is stored.
    pub token: String,
    pub url: String,
    pub expires_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/family/by-slug/{slug}
pub async fn get_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<DataResponse<FamilyPublic>>> {
    let family = FamilyRepo::find_by_slug(&state.pool, &slug)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Missing(format!("Family '{slug}' not found"))))?;
    Ok(ok(FamilyPublic::from(family)))
}

/// GET /api/family/check-slug?slug=
pub async fn check_slug(
    State(state): State<AppState>,
    Query(params): Query<CheckSlugParams>,
) -> AppResult<Json<DataResponse<SlugAvailability>>> {
    let slug = params.slug.trim().to_lowercase();
    if let Some(reason) = slug_rejection(&slug) {
        return Ok(ok(SlugAvailability {
            available: false,
            reason: Some(reason.to_string()),
        }));
    }

    let taken = FamilyRepo::slug_exists(&state.pool, &slug).await?;
    Ok(ok(SlugAvailability {
        available: !taken,
        reason: taken.then(|| "This slug is already taken".to_string()),
    }))
}

/// GET /api/family
pub async fn get_current(
    State(state): State<AppState>,
    member: FamilyMember,
) -> AppResult<Json<DataResponse<FamilyDetail>>> {
    let settings = SettingsRepo::find_by_family(&state.pool, member.family_id()).await?;
    Ok(ok(FamilyDetail {
        family: FamilyPublic::from(member.family),
        settings,
    }))
}

/// PUT /api/family
pub async fn update_current(
    State(state): State<AppState>,
    FamilyAdmin(member): FamilyAdmin,
    Json(input): Json<UpdateOwnFamily>,
) -> AppResult<Json<DataResponse<FamilyPublic>>> {
    let name = normalize_name(input.name)?;
    let slug = match input.slug {
        Some(slug) => {
            let slug = slug.trim().to_lowercase();
            validate_slug(&slug)?;
            if slug != member.family.slug && FamilyRepo::slug_exists(&state.pool, &slug).await? {
                return Err(AppError::Core(CoreError::Conflict(
                    "This slug is already taken".into(),
                )));
            }
            Some(slug)
        }
        None => None,
    };

    let family_id = member.family_id();
    let update = UpdateFamily {
        slug,
        name,
        is_active: None,
    };
    let family = FamilyRepo::update(&state.pool, family_id, &update)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Family",
            id: family_id,
        }))?;

    tracing::info!(family_id, slug = %family.slug, "Family updated");
    Ok(ok(FamilyPublic::from(family)))
}

/// GET /api/family/list
pub async fn list(
    State(state): State<AppState>,
    _admin: SysAdmin,
) -> AppResult<Json<DataResponse<Vec<FamilyOverview>>>> {
    let families = FamilyRepo::list_overview(&state.pool).await?;
    Ok(ok(families))
}

/// PUT /api/family/{id}
pub async fn admin_update(
    State(state): State<AppState>,
    _admin: SysAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<AdminUpdateFamily>,
) -> AppResult<Json<DataResponse<FamilyPublic>>> {
    let update = UpdateFamily {
        slug: None,
        name: normalize_name(input.name)?,
        is_active: input.is_active,
    };
    let family = FamilyRepo::update(&state.pool, id, &update)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Family",
            id,
        }))?;

    tracing::info!(family_id = id, is_active = family.is_active, "Family updated by sysadmin");
    Ok(ok(FamilyPublic::from(family)))
}

/// POST /api/family/setup-link
///
/// Issue a single-use setup link protected by `password`.
pub async fn create_setup_link(
    State(state): State<AppState>,
    _admin: SysAdmin,
    Json(input): Json<SetupLinkRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<SetupLinkResponse>>)> {
    validate_password_strength(&input.password)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let token = generate_token(SETUP_TOKEN_LENGTH);
    let expires_at = Utc::now() + Duration::hours(state.config.setup_token_expiry_hours);
    let created = SetupTokenRepo::create(
        &state.pool,
        &CreateSetupToken {
            token_hash: token.hash,
            password_hash: hash_secret(&input.password)?,
            expires_at,
            created_by: "sysadmin".to_string(),
        },
    )
    .await?;

    tracing::info!(setup_token_id = created.id, %expires_at, "Setup link created");

    Ok((
        StatusCode::CREATED,
        ok(SetupLinkResponse {
            url: format!("{}/setup/{}", state.config.app_url, token.plaintext),
            token: token.plaintext,
            expires_at: created.expires_at,
        }),
    ))
}

/// Trim a new family name; empty names are rejected.
fn normalize_name(name: Option<String>) -> Result<Option<String>, CoreError> {
    match name.map(|n| n.trim().to_string()) {
        Some(n) if n.is_empty() => Err(CoreError::Validation("Family name is required".into())),
        other => Ok(other),
    }
}
