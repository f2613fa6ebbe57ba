//! Handlers for the `/diaper-log` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use babycontrol_core::activity::{
    validate_one_of, validate_optional_one_of, validate_text_length, DIAPER_TYPES,
};
use babycontrol_core::error::CoreError;
use babycontrol_core::types::DbId;
use babycontrol_db::models::diaper_log::{CreateDiaperLog, UpdateDiaperLog};
use babycontrol_db::repositories::DiaperLogRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{FamilyMember, FamilyWriter};
use crate::query::LogQuery;
use crate::response::ok;
use crate::state::AppState;

use super::ensure_baby_in_family;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "DiaperLog",
        id,
    })
}

/// GET /api/diaper-log
pub async fn list_diaper_logs(
    member: FamilyMember,
    State(state): State<AppState>,
    Query(params): Query<LogQuery>,
) -> AppResult<impl IntoResponse> {
    let filter = params.into_filter(member.family_id())?;
    let logs = DiaperLogRepo::list(&state.pool, &filter).await?;
    Ok(ok(logs))
}

/// POST /api/diaper-log
pub async fn create_diaper_log(
    FamilyWriter(member): FamilyWriter,
    State(state): State<AppState>,
    Json(input): Json<CreateDiaperLog>,
) -> AppResult<impl IntoResponse> {
    validate_one_of(&input.diaper_type, DIAPER_TYPES, "diaper type")?;
    validate_text_length(input.condition.as_deref(), "Condition")?;
    validate_text_length(input.color.as_deref(), "Color")?;
    ensure_baby_in_family(&state, member.family_id(), input.baby_id).await?;

    let log =
        DiaperLogRepo::create(&state.pool, member.family_id(), member.caretaker_id, &input).await?;

    tracing::debug!(family_id = member.family_id(), diaper_log_id = log.id, "Diaper logged");
    Ok((StatusCode::CREATED, ok(log)))
}

/// GET /api/diaper-log/{id}
pub async fn get_diaper_log(
    member: FamilyMember,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let log = DiaperLogRepo::find_by_id(&state.pool, member.family_id(), id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(ok(log))
}

/// PUT /api/diaper-log/{id}
pub async fn update_diaper_log(
    FamilyWriter(member): FamilyWriter,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateDiaperLog>,
) -> AppResult<impl IntoResponse> {
    validate_optional_one_of(input.diaper_type.as_deref(), DIAPER_TYPES, "diaper type")?;
    validate_text_length(input.condition.as_deref(), "Condition")?;
    validate_text_length(input.color.as_deref(), "Color")?;

    let log = DiaperLogRepo::update(&state.pool, member.family_id(), id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(ok(log))
}

/// DELETE /api/diaper-log/{id}
pub async fn delete_diaper_log(
    FamilyWriter(member): FamilyWriter,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !DiaperLogRepo::soft_delete(&state.pool, member.family_id(), id).await? {
        return Err(not_found(id));
    }
    Ok(StatusCode::NO_CONTENT)
}
