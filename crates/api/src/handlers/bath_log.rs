//! Handlers for the `/bath-log` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use babycontrol_core::activity::validate_text_length;
use babycontrol_core::error::CoreError;
use babycontrol_core::types::DbId;
use babycontrol_db::models::bath_log::{CreateBathLog, UpdateBathLog};
use babycontrol_db::repositories::BathLogRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{FamilyMember, FamilyWriter};
use crate::query::LogQuery;
use crate::response::ok;
use crate::state::AppState;

use super::ensure_baby_in_family;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "BathLog",
        id,
    })
}

/// GET /api/bath-log
pub async fn list_bath_logs(
    member: FamilyMember,
    State(state): State<AppState>,
    Query(params): Query<LogQuery>,
) -> AppResult<impl IntoResponse> {
    let filter = params.into_filter(member.family_id())?;
    let logs = BathLogRepo::list(&state.pool, &filter).await?;
    Ok(ok(logs))
}

/// POST /api/bath-log
pub async fn create_bath_log(
    FamilyWriter(member): FamilyWriter,
    State(state): State<AppState>,
    Json(input): Json<CreateBathLog>,
) -> AppResult<impl IntoResponse> {
    validate_text_length(input.notes.as_deref(), "Notes")?;
    ensure_baby_in_family(&state, member.family_id(), input.baby_id).await?;

    let log =
        BathLogRepo::create(&state.pool, member.family_id(), member.caretaker_id, &input).await?;
    Ok((StatusCode::CREATED, ok(log)))
}

/// GET /api/bath-log/{id}
pub async fn get_bath_log(
    member: FamilyMember,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let log = BathLogRepo::find_by_id(&state.pool, member.family_id(), id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(ok(log))
}

/// PUT /api/bath-log/{id}
pub async fn update_bath_log(
    FamilyWriter(member): FamilyWriter,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateBathLog>,
) -> AppResult<impl IntoResponse> {
    validate_text_length(input.notes.as_deref(), "Notes")?;
    let log = BathLogRepo::update(&state.pool, member.family_id(), id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(ok(log))
}

/// DELETE /api/bath-log/{id}
pub async fn delete_bath_log(
    FamilyWriter(member): FamilyWriter,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !BathLogRepo::soft_delete(&state.pool, member.family_id(), id).await? {
        return Err(not_found(id));
    }
    Ok(StatusCode::NO_CONTENT)
}
