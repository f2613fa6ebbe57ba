//! Handlers for the `/caretaker` resource (family admins only).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use babycontrol_core::activity::{validate_one_of, validate_required};
use babycontrol_core::error::CoreError;
use babycontrol_core::pin::{validate_login_id, validate_pin};
use babycontrol_core::roles::{ROLE_ADMIN, ROLE_USER, VALID_CARETAKER_ROLES};
use babycontrol_core::types::DbId;
use babycontrol_db::models::caretaker::{Caretaker, CreateCaretaker, UpdateCaretaker};
use babycontrol_db::repositories::CaretakerRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::FamilyAdmin;
use crate::response::ok;
use crate::state::AppState;

use super::hash_secret;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCaretakerRequest {
    pub login_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub caretaker_type: Option<String>,
    pub role: Option<String>,
    pub security_pin: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCaretakerRequest {
    pub login_id: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub caretaker_type: Option<String>,
    pub role: Option<String>,
    pub security_pin: Option<String>,
    pub inactive: Option<bool>,
}

/// GET /api/caretaker
pub async fn list_caretakers(
    FamilyAdmin(member): FamilyAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let caretakers = CaretakerRepo::list_by_family(&state.pool, member.family_id()).await?;
    Ok(ok(caretakers))
}

/// POST /api/caretaker
pub async fn create_caretaker(
    FamilyAdmin(member): FamilyAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateCaretakerRequest>,
) -> AppResult<impl IntoResponse> {
    let family_id = member.family_id();
    validate_login_id(&input.login_id)?;
    validate_required(&input.name, "Name")?;
    validate_pin(&input.security_pin)?;
    let role = input.role.unwrap_or_else(|| ROLE_USER.to_string());
    validate_one_of(&role, VALID_CARETAKER_ROLES, "role")?;
    ensure_login_id_free(&state, family_id, &input.login_id, None).await?;

    let caretaker = CaretakerRepo::create(
        &state.pool,
        &CreateCaretaker {
            family_id,
            login_id: input.login_id,
            name: input.name.trim().to_string(),
            caretaker_type: input.caretaker_type,
            role,
            security_pin_hash: hash_secret(&input.security_pin)?,
        },
    )
    .await?;

    tracing::info!(family_id, caretaker_id = caretaker.id, role = %caretaker.role, "Caretaker created");
    Ok((StatusCode::CREATED, ok(caretaker)))
}

/// PUT /api/caretaker/{id}
pub async fn update_caretaker(
    FamilyAdmin(member): FamilyAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCaretakerRequest>,
) -> AppResult<impl IntoResponse> {
    let family_id = member.family_id();
    let existing = find_caretaker(&state, family_id, id).await?;

    if let Some(login_id) = &input.login_id {
        validate_login_id(login_id)?;
        ensure_login_id_free(&state, family_id, login_id, Some(id)).await?;
    }
    if let Some(name) = &input.name {
        validate_required(name, "Name")?;
    }
    if let Some(role) = &input.role {
        validate_one_of(role, VALID_CARETAKER_ROLES, "role")?;
    }
    let security_pin_hash = match &input.security_pin {
        Some(pin) => {
            validate_pin(pin)?;
            Some(hash_secret(pin)?)
        }
        None => None,
    };

    let demoted = input.role.as_deref().is_some_and(|r| r != ROLE_ADMIN);
    let deactivated = input.inactive == Some(true);
    if demoted || deactivated {
        ensure_not_last_admin(&state, &existing).await?;
    }

    let update = UpdateCaretaker {
        login_id: input.login_id,
        name: input.name.map(|n| n.trim().to_string()),
        caretaker_type: input.caretaker_type,
        role: input.role,
        security_pin_hash,
        inactive: input.inactive,
    };
    let caretaker = CaretakerRepo::update(&state.pool, family_id, id, &update)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Caretaker",
            id,
        }))?;

    tracing::info!(family_id, caretaker_id = id, "Caretaker updated");
    Ok(ok(caretaker))
}

/// DELETE /api/caretaker/{id}
///
/// Soft delete; the login id becomes available again.
pub async fn delete_caretaker(
    FamilyAdmin(member): FamilyAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let family_id = member.family_id();
    let existing = find_caretaker(&state, family_id, id).await?;
    ensure_not_last_admin(&state, &existing).await?;

    CaretakerRepo::soft_delete(&state.pool, family_id, id).await?;
    tracing::info!(family_id, caretaker_id = id, "Caretaker deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn find_caretaker(state: &AppState, family_id: DbId, id: DbId) -> AppResult<Caretaker> {
    CaretakerRepo::find_by_id(&state.pool, family_id, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Caretaker",
            id,
        }))
}

/// 409 when another live caretaker of the family already uses `login_id`.
async fn ensure_login_id_free(
    state: &AppState,
    family_id: DbId,
    login_id: &str,
    current: Option<DbId>,
) -> AppResult<()> {
    match CaretakerRepo::find_by_login_id(&state.pool, family_id, login_id).await? {
        Some(other) if Some(other.id) != current => Err(AppError::Core(CoreError::Conflict(
            format!("Login ID '{login_id}' is already in use"),
        ))),
        _ => Ok(()),
    }
}

/// 400 when `caretaker` is the family's only active admin.
async fn ensure_not_last_admin(state: &AppState, caretaker: &Caretaker) -> AppResult<()> {
    if caretaker.role != ROLE_ADMIN || caretaker.inactive {
        return Ok(());
    }
    let others =
        CaretakerRepo::count_active_admins(&state.pool, caretaker.family_id, Some(caretaker.id))
            .await?;
    if others == 0 {
        return Err(AppError::BadRequest(
            "Cannot remove the last active admin".into(),
        ));
    }
    Ok(())
}
