//! Handlers for the `/baby` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use babycontrol_core::activity::{
    validate_hhmm, validate_optional_one_of, validate_required, GENDERS,
};
use babycontrol_core::error::CoreError;
use babycontrol_core::types::DbId;
use babycontrol_db::models::baby::{CreateBaby, UpdateBaby};
use babycontrol_db::repositories::BabyRepo;
use chrono::Utc;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{FamilyAdmin, FamilyMember, FamilyWriter};
use crate::query::IncludeInactiveParams;
use crate::response::ok;
use crate::state::AppState;

/// Field rules shared by baby creation here and in family setup.
pub(crate) fn validate_new_baby(input: &CreateBaby) -> Result<(), CoreError> {
    validate_required(&input.first_name, "First name")?;
    validate_optional_one_of(input.gender.as_deref(), GENDERS, "gender")?;
    validate_birth_date(input.birth_date)?;
    if let Some(t) = &input.feed_warning_time {
        validate_hhmm(t, "Feed warning time")?;
    }
    if let Some(t) = &input.diaper_warning_time {
        validate_hhmm(t, "Diaper warning time")?;
    }
    Ok(())
}

fn validate_birth_date(date: chrono::NaiveDate) -> Result<(), CoreError> {
    if date > Utc::now().date_naive() {
        return Err(CoreError::Validation(
            "Birth date cannot be in the future".into(),
        ));
    }
    Ok(())
}

fn validate_baby_update(input: &UpdateBaby) -> Result<(), CoreError> {
    if let Some(name) = &input.first_name {
        validate_required(name, "First name")?;
    }
    validate_optional_one_of(input.gender.as_deref(), GENDERS, "gender")?;
    if let Some(date) = input.birth_date {
        validate_birth_date(date)?;
    }
    if let Some(t) = &input.feed_warning_time {
        validate_hhmm(t, "Feed warning time")?;
    }
    if let Some(t) = &input.diaper_warning_time {
        validate_hhmm(t, "Diaper warning time")?;
    }
    Ok(())
}

/// POST /api/baby/create
pub async fn create_baby(
    FamilyWriter(member): FamilyWriter,
    State(state): State<AppState>,
    Json(input): Json<CreateBaby>,
) -> AppResult<impl IntoResponse> {
    validate_new_baby(&input)?;
    let baby = BabyRepo::create(&state.pool, member.family_id(), &input).await?;

    tracing::info!(family_id = member.family_id(), baby_id = baby.id, "Baby created");
    Ok((StatusCode::CREATED, ok(baby)))
}

/// GET /api/baby
pub async fn list_babies(
    member: FamilyMember,
    State(state): State<AppState>,
    Query(params): Query<IncludeInactiveParams>,
) -> AppResult<impl IntoResponse> {
    let babies =
        BabyRepo::list_by_family(&state.pool, member.family_id(), params.include_inactive).await?;
    Ok(ok(babies))
}

/// GET /api/baby/{id}
pub async fn get_baby(
    member: FamilyMember,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let baby = BabyRepo::find_by_id(&state.pool, member.family_id(), id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Baby", id }))?;
    Ok(ok(baby))
}

/// PUT /api/baby/{id}
pub async fn update_baby(
    FamilyWriter(member): FamilyWriter,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateBaby>,
) -> AppResult<impl IntoResponse> {
    validate_baby_update(&input)?;
    let baby = BabyRepo::update(&state.pool, member.family_id(), id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Baby", id }))?;
    Ok(ok(baby))
}

/// DELETE /api/baby/{id}
///
/// Soft delete; the baby's logs are kept.
pub async fn delete_baby(
    FamilyAdmin(member): FamilyAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let deleted = BabyRepo::soft_delete(&state.pool, member.family_id(), id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound { entity: "Baby", id }));
    }

    tracing::info!(family_id = member.family_id(), baby_id = id, "Baby deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::NaiveDate;

    fn new_baby() -> CreateBaby {
        CreateBaby {
            first_name: "Ada".into(),
            last_name: None,
            birth_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            gender: Some("FEMALE".into()),
            feed_warning_time: Some("03:00".into()),
            diaper_warning_time: None,
        }
    }

    #[test]
    fn accepts_well_formed_baby() {
        assert!(validate_new_baby(&new_baby()).is_ok());
    }

    #[test]
    fn rejects_unknown_gender_and_bad_warning_time() {
        let mut baby = new_baby();
        baby.gender = Some("OTHER".into());
        assert_matches!(validate_new_baby(&baby), Err(CoreError::Validation(_)));

        let mut baby = new_baby();
        baby.diaper_warning_time = Some("2h".into());
        assert_matches!(validate_new_baby(&baby), Err(CoreError::Validation(_)));
    }

    #[test]
    fn rejects_future_birth_date() {
        let mut baby = new_baby();
        baby.birth_date = Utc::now().date_naive() + chrono::Duration::days(2);
        assert_matches!(validate_new_baby(&baby), Err(CoreError::Validation(_)));
    }
}
