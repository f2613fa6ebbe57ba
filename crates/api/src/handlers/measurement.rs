//! Handlers for the `/measurement` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use babycontrol_core::activity::{
    validate_non_negative, validate_one_of, validate_text_length, MEASUREMENT_TYPES,
};
use babycontrol_core::error::CoreError;
use babycontrol_core::types::DbId;
use babycontrol_db::models::measurement::{CreateMeasurement, UpdateMeasurement};
use babycontrol_db::repositories::MeasurementRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{FamilyMember, FamilyWriter};
use crate::query::LogQuery;
use crate::response::ok;
use crate::state::AppState;

use super::{ensure_baby_in_family, ensure_unit_applies};

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Measurement",
        id,
    })
}

/// Unit tag a measurement type is recorded in.
fn unit_activity(measurement_type: &str) -> &'static str {
    match measurement_type {
        "WEIGHT" => "weight",
        "TEMPERATURE" => "temp",
        _ => "height",
    }
}

/// GET /api/measurement
pub async fn list_measurements(
    member: FamilyMember,
    State(state): State<AppState>,
    Query(params): Query<LogQuery>,
) -> AppResult<impl IntoResponse> {
    let filter = params.into_filter(member.family_id())?;
    let measurements = MeasurementRepo::list(&state.pool, &filter).await?;
    Ok(ok(measurements))
}

/// POST /api/measurement
pub async fn create_measurement(
    FamilyWriter(member): FamilyWriter,
    State(state): State<AppState>,
    Json(input): Json<CreateMeasurement>,
) -> AppResult<impl IntoResponse> {
    validate_one_of(&input.measurement_type, MEASUREMENT_TYPES, "measurement type")?;
    validate_non_negative(Some(input.value), "Value")?;
    validate_text_length(input.notes.as_deref(), "Notes")?;
    ensure_unit_applies(&state, &input.unit_abbr, unit_activity(&input.measurement_type)).await?;
    ensure_baby_in_family(&state, member.family_id(), input.baby_id).await?;

    let measurement =
        MeasurementRepo::create(&state.pool, member.family_id(), member.caretaker_id, &input)
            .await?;
    Ok((StatusCode::CREATED, ok(measurement)))
}

/// GET /api/measurement/{id}
pub async fn get_measurement(
    member: FamilyMember,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let measurement = MeasurementRepo::find_by_id(&state.pool, member.family_id(), id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(ok(measurement))
}

/// PUT /api/measurement/{id}
pub async fn update_measurement(
    FamilyWriter(member): FamilyWriter,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateMeasurement>,
) -> AppResult<impl IntoResponse> {
    let existing = MeasurementRepo::find_by_id(&state.pool, member.family_id(), id)
        .await?
        .ok_or_else(|| not_found(id))?;
    let measurement_type = input
        .measurement_type
        .as_deref()
        .unwrap_or(&existing.measurement_type);
    validate_one_of(measurement_type, MEASUREMENT_TYPES, "measurement type")?;
    validate_non_negative(input.value, "Value")?;
    validate_text_length(input.notes.as_deref(), "Notes")?;
    let unit = input.unit_abbr.as_deref().unwrap_or(&existing.unit_abbr);
    ensure_unit_applies(&state, unit, unit_activity(measurement_type)).await?;

    let measurement = MeasurementRepo::update(&state.pool, member.family_id(), id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(ok(measurement))
}

/// DELETE /api/measurement/{id}
pub async fn delete_measurement(
    FamilyWriter(member): FamilyWriter,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !MeasurementRepo::soft_delete(&state.pool, member.family_id(), id).await? {
        return Err(not_found(id));
    }
    Ok(StatusCode::NO_CONTENT)
}
