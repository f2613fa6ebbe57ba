//! Handlers for the `/note` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use babycontrol_core::activity::{validate_required, validate_text_length};
use babycontrol_core::error::CoreError;
use babycontrol_core::types::DbId;
use babycontrol_db::models::note::{CreateNote, UpdateNote};
use babycontrol_db::repositories::NoteRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{FamilyMember, FamilyWriter};
use crate::query::LogQuery;
use crate::response::ok;
use crate::state::AppState;

use super::ensure_baby_in_family;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Note", id })
}

/// GET /api/note
pub async fn list_notes(
    member: FamilyMember,
    State(state): State<AppState>,
    Query(params): Query<LogQuery>,
) -> AppResult<impl IntoResponse> {
    let filter = params.into_filter(member.family_id())?;
    let notes = NoteRepo::list(&state.pool, &filter).await?;
    Ok(ok(notes))
}

/// POST /api/note
pub async fn create_note(
    FamilyWriter(member): FamilyWriter,
    State(state): State<AppState>,
    Json(input): Json<CreateNote>,
) -> AppResult<impl IntoResponse> {
    validate_required(&input.content, "Content")?;
    validate_text_length(Some(&input.content), "Content")?;
    validate_text_length(input.category.as_deref(), "Category")?;
    ensure_baby_in_family(&state, member.family_id(), input.baby_id).await?;

    let note = NoteRepo::create(&state.pool, member.family_id(), member.caretaker_id, &input).await?;
    Ok((StatusCode::CREATED, ok(note)))
}

/// GET /api/note/{id}
pub async fn get_note(
    member: FamilyMember,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let note = NoteRepo::find_by_id(&state.pool, member.family_id(), id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(ok(note))
}

/// PUT /api/note/{id}
pub async fn update_note(
    FamilyWriter(member): FamilyWriter,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateNote>,
) -> AppResult<impl IntoResponse> {
    if let Some(content) = &input.content {
        validate_required(content, "Content")?;
    }
    validate_text_length(input.content.as_deref(), "Content")?;
    validate_text_length(input.category.as_deref(), "Category")?;

    let note = NoteRepo::update(&state.pool, member.family_id(), id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(ok(note))
}

/// DELETE /api/note/{id}
pub async fn delete_note(
    FamilyWriter(member): FamilyWriter,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !NoteRepo::soft_delete(&state.pool, member.family_id(), id).await? {
        return Err(not_found(id));
    }
    Ok(StatusCode::NO_CONTENT)
}
