//! Handlers for the `/milestone` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use babycontrol_core::activity::{
    validate_one_of, validate_optional_one_of, validate_required, validate_text_length,
    MILESTONE_CATEGORIES,
};
use babycontrol_core::error::CoreError;
use babycontrol_core::types::DbId;
use babycontrol_db::models::milestone::{CreateMilestone, UpdateMilestone};
use babycontrol_db::repositories::MilestoneRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{FamilyMember, FamilyWriter};
use crate::query::LogQuery;
use crate::response::ok;
use crate::state::AppState;

use super::ensure_baby_in_family;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Milestone",
        id,
    })
}

/// GET /api/milestone
pub async fn list_milestones(
    member: FamilyMember,
    State(state): State<AppState>,
    Query(params): Query<LogQuery>,
) -> AppResult<impl IntoResponse> {
    let filter = params.into_filter(member.family_id())?;
    let milestones = MilestoneRepo::list(&state.pool, &filter).await?;
    Ok(ok(milestones))
}

/// POST /api/milestone
pub async fn create_milestone(
    FamilyWriter(member): FamilyWriter,
    State(state): State<AppState>,
    Json(input): Json<CreateMilestone>,
) -> AppResult<impl IntoResponse> {
    validate_required(&input.title, "Title")?;
    validate_one_of(&input.category, MILESTONE_CATEGORIES, "milestone category")?;
    validate_text_length(input.description.as_deref(), "Description")?;
    ensure_baby_in_family(&state, member.family_id(), input.baby_id).await?;

    let milestone =
        MilestoneRepo::create(&state.pool, member.family_id(), member.caretaker_id, &input).await?;

    tracing::info!(
        family_id = member.family_id(),
        milestone_id = milestone.id,
        category = %milestone.category,
        "Milestone recorded",
    );
    Ok((StatusCode::CREATED, ok(milestone)))
}

/// GET /api/milestone/{id}
pub async fn get_milestone(
    member: FamilyMember,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let milestone = MilestoneRepo::find_by_id(&state.pool, member.family_id(), id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(ok(milestone))
}

/// PUT /api/milestone/{id}
pub async fn update_milestone(
    FamilyWriter(member): FamilyWriter,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateMilestone>,
) -> AppResult<impl IntoResponse> {
    if let Some(title) = &input.title {
        validate_required(title, "Title")?;
    }
    validate_optional_one_of(input.category.as_deref(), MILESTONE_CATEGORIES, "milestone category")?;
    validate_text_length(input.description.as_deref(), "Description")?;

    let milestone = MilestoneRepo::update(&state.pool, member.family_id(), id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(ok(milestone))
}

/// DELETE /api/milestone/{id}
pub async fn delete_milestone(
    FamilyWriter(member): FamilyWriter,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !MilestoneRepo::soft_delete(&state.pool, member.family_id(), id).await? {
        return Err(not_found(id));
    }
    Ok(StatusCode::NO_CONTENT)
}
