//! Handlers for the family medicine catalogue (`/medicine`) and dose
//! records (`/medicine-log`).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use babycontrol_core::activity::{
    validate_hhmm, validate_non_negative, validate_required, validate_text_length,
};
use babycontrol_core::error::CoreError;
use babycontrol_core::types::DbId;
use babycontrol_db::models::medicine::{
    CreateMedicine, CreateMedicineLog, UpdateMedicine, UpdateMedicineLog,
};
use babycontrol_db::repositories::{MedicineLogRepo, MedicineRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{FamilyMember, FamilyWriter};
use crate::query::{IncludeInactiveParams, LogQuery};
use crate::response::ok;
use crate::state::AppState;

use super::{ensure_baby_in_family, ensure_unit_applies};

/// Unit tag for medicine doses.
const MEDICINE_UNIT_ACTIVITY: &str = "medicine";

fn medicine_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Medicine",
        id,
    })
}

fn log_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "MedicineLog",
        id,
    })
}

// ---------------------------------------------------------------------------
// Catalogue
// ---------------------------------------------------------------------------

/// GET /api/medicine
pub async fn list_medicines(
    member: FamilyMember,
    State(state): State<AppState>,
    Query(params): Query<IncludeInactiveParams>,
) -> AppResult<impl IntoResponse> {
    let medicines =
        MedicineRepo::list(&state.pool, member.family_id(), params.include_inactive).await?;
    Ok(ok(medicines))
}

/// POST /api/medicine
pub async fn create_medicine(
    FamilyWriter(member): FamilyWriter,
    State(state): State<AppState>,
    Json(input): Json<CreateMedicine>,
) -> AppResult<impl IntoResponse> {
    validate_required(&input.name, "Name")?;
    validate_non_negative(input.typical_dose, "Typical dose")?;
    validate_text_length(input.notes.as_deref(), "Notes")?;
    if let Some(spacing) = &input.dose_min_time {
        validate_hhmm(spacing, "Minimum time between doses")?;
    }
    if let Some(unit) = &input.unit_abbr {
        ensure_unit_applies(&state, unit, MEDICINE_UNIT_ACTIVITY).await?;
    }

    let medicine = MedicineRepo::create(&state.pool, member.family_id(), &input).await?;

    tracing::info!(family_id = member.family_id(), medicine_id = medicine.id, "Medicine added");
    Ok((StatusCode::CREATED, ok(medicine)))
}

/// PUT /api/medicine/{id}
pub async fn update_medicine(
    FamilyWriter(member): FamilyWriter,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateMedicine>,
) -> AppResult<impl IntoResponse> {
    if let Some(name) = &input.name {
        validate_required(name, "Name")?;
    }
    validate_non_negative(input.typical_dose, "Typical dose")?;
    validate_text_length(input.notes.as_deref(), "Notes")?;
    if let Some(spacing) = &input.dose_min_time {
        validate_hhmm(spacing, "Minimum time between doses")?;
    }
    if let Some(unit) = &input.unit_abbr {
        ensure_unit_applies(&state, unit, MEDICINE_UNIT_ACTIVITY).await?;
    }

    let medicine = MedicineRepo::update(&state.pool, member.family_id(), id, &input)
        .await?
        .ok_or_else(|| medicine_not_found(id))?;
    Ok(ok(medicine))
}

/// DELETE /api/medicine/{id}
///
/// Soft delete; existing dose records keep their reference.
pub async fn delete_medicine(
    FamilyWriter(member): FamilyWriter,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !MedicineRepo::soft_delete(&state.pool, member.family_id(), id).await? {
        return Err(medicine_not_found(id));
    }
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Dose records
// ---------------------------------------------------------------------------

/// GET /api/medicine-log
pub async fn list_medicine_logs(
    member: FamilyMember,
    State(state): State<AppState>,
    Query(params): Query<LogQuery>,
) -> AppResult<impl IntoResponse> {
    let filter = params.into_filter(member.family_id())?;
    let logs = MedicineLogRepo::list(&state.pool, &filter).await?;
    Ok(ok(logs))
}

/// POST /api/medicine-log
///
/// The medicine must be an active entry of the caller's catalogue.
pub async fn create_medicine_log(
    FamilyWriter(member): FamilyWriter,
    State(state): State<AppState>,
    Json(input): Json<CreateMedicineLog>,
) -> AppResult<impl IntoResponse> {
    validate_non_negative(Some(input.dose_amount), "Dose amount")?;
    validate_text_length(input.notes.as_deref(), "Notes")?;
    if let Some(unit) = &input.unit_abbr {
        ensure_unit_applies(&state, unit, MEDICINE_UNIT_ACTIVITY).await?;
    }
    ensure_baby_in_family(&state, member.family_id(), input.baby_id).await?;

    let medicine = MedicineRepo::find_by_id(&state.pool, member.family_id(), input.medicine_id)
        .await?
        .ok_or_else(|| medicine_not_found(input.medicine_id))?;
    if !medicine.active {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Medicine '{}' is inactive",
            medicine.name
        ))));
    }

    let log =
        MedicineLogRepo::create(&state.pool, member.family_id(), member.caretaker_id, &input)
            .await?;

    tracing::debug!(
        family_id = member.family_id(),
        medicine_log_id = log.id,
        medicine_id = medicine.id,
        "Medicine dose logged",
    );
    Ok((StatusCode::CREATED, ok(log)))
}

/// GET /api/medicine-log/{id}
pub async fn get_medicine_log(
    member: FamilyMember,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let log = MedicineLogRepo::find_by_id(&state.pool, member.family_id(), id)
        .await?
        .ok_or_else(|| log_not_found(id))?;
    Ok(ok(log))
}

/// PUT /api/medicine-log/{id}
pub async fn update_medicine_log(
    FamilyWriter(member): FamilyWriter,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateMedicineLog>,
) -> AppResult<impl IntoResponse> {
    validate_non_negative(input.dose_amount, "Dose amount")?;
    validate_text_length(input.notes.as_deref(), "Notes")?;
    if let Some(unit) = &input.unit_abbr {
        ensure_unit_applies(&state, unit, MEDICINE_UNIT_ACTIVITY).await?;
    }

    let log = MedicineLogRepo::update(&state.pool, member.family_id(), id, &input)
        .await?
        .ok_or_else(|| log_not_found(id))?;
    Ok(ok(log))
}

/// DELETE /api/medicine-log/{id}
pub async fn delete_medicine_log(
    FamilyWriter(member): FamilyWriter,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !MedicineLogRepo::soft_delete(&state.pool, member.family_id(), id).await? {
        return Err(log_not_found(id));
    }
    Ok(StatusCode::NO_CONTENT)
}
