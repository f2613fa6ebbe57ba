//! Handlers for the `/sleep-log` resource.
//!
//! The stored duration is derived from start and end; updates recompute it
//! from the merged times so a partial edit never leaves it stale.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use babycontrol_core::activity::{
    sleep_duration_minutes, validate_one_of, validate_optional_one_of, validate_text_length,
    SLEEP_QUALITIES, SLEEP_TYPES,
};
use babycontrol_core::error::CoreError;
use babycontrol_core::types::DbId;
use babycontrol_db::models::sleep_log::{CreateSleepLog, UpdateSleepLog};
use babycontrol_db::repositories::SleepLogRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{FamilyMember, FamilyWriter};
use crate::query::LogQuery;
use crate::response::ok;
use crate::state::AppState;

use super::ensure_baby_in_family;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "SleepLog",
        id,
    })
}

/// GET /api/sleep-log
pub async fn list_sleep_logs(
    member: FamilyMember,
    State(state): State<AppState>,
    Query(params): Query<LogQuery>,
) -> AppResult<impl IntoResponse> {
    let filter = params.into_filter(member.family_id())?;
    let logs = SleepLogRepo::list(&state.pool, &filter).await?;
    Ok(ok(logs))
}

/// POST /api/sleep-log
pub async fn create_sleep_log(
    FamilyWriter(member): FamilyWriter,
    State(state): State<AppState>,
    Json(input): Json<CreateSleepLog>,
) -> AppResult<impl IntoResponse> {
    validate_one_of(&input.sleep_type, SLEEP_TYPES, "sleep type")?;
    validate_optional_one_of(input.quality.as_deref(), SLEEP_QUALITIES, "sleep quality")?;
    validate_text_length(input.location.as_deref(), "Location")?;
    let duration = sleep_duration_minutes(input.start_time, input.end_time)?;
    ensure_baby_in_family(&state, member.family_id(), input.baby_id).await?;

    let log = SleepLogRepo::create(
        &state.pool,
        member.family_id(),
        member.caretaker_id,
        &input,
        duration,
    )
    .await?;

    tracing::debug!(family_id = member.family_id(), sleep_log_id = log.id, "Sleep logged");
    Ok((StatusCode::CREATED, ok(log)))
}

/// GET /api/sleep-log/{id}
pub async fn get_sleep_log(
    member: FamilyMember,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let log = SleepLogRepo::find_by_id(&state.pool, member.family_id(), id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(ok(log))
}

/// PUT /api/sleep-log/{id}
pub async fn update_sleep_log(
    FamilyWriter(member): FamilyWriter,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateSleepLog>,
) -> AppResult<impl IntoResponse> {
    validate_optional_one_of(input.sleep_type.as_deref(), SLEEP_TYPES, "sleep type")?;
    validate_optional_one_of(input.quality.as_deref(), SLEEP_QUALITIES, "sleep quality")?;
    validate_text_length(input.location.as_deref(), "Location")?;

    let existing = SleepLogRepo::find_by_id(&state.pool, member.family_id(), id)
        .await?
        .ok_or_else(|| not_found(id))?;
    let start = input.start_time.unwrap_or(existing.start_time);
    let end = input.end_time.or(existing.end_time);
    let duration = sleep_duration_minutes(start, end)?;

    let log = SleepLogRepo::update(&state.pool, member.family_id(), id, &input, duration)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(ok(log))
}

/// DELETE /api/sleep-log/{id}
pub async fn delete_sleep_log(
    FamilyWriter(member): FamilyWriter,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !SleepLogRepo::soft_delete(&state.pool, member.family_id(), id).await? {
        return Err(not_found(id));
    }
    Ok(StatusCode::NO_CONTENT)
}
