//! Handlers for the `/feed-log` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use babycontrol_core::activity::{validate_feed, validate_text_length};
use babycontrol_core::error::CoreError;
use babycontrol_core::types::DbId;
use babycontrol_db::models::feed_log::{CreateFeedLog, UpdateFeedLog};
use babycontrol_db::repositories::FeedLogRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{FamilyMember, FamilyWriter};
use crate::query::LogQuery;
use crate::response::ok;
use crate::state::AppState;

use super::ensure_baby_in_family;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "FeedLog",
        id,
    })
}

fn validate_duration(seconds: Option<i32>) -> Result<(), CoreError> {
    match seconds {
        Some(s) if s < 0 => Err(CoreError::Validation(
            "Feed duration must not be negative".into(),
        )),
        _ => Ok(()),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LastFeedParams {
    pub baby_id: DbId,
}

/// GET /api/feed-log
pub async fn list_feed_logs(
    member: FamilyMember,
    State(state): State<AppState>,
    Query(params): Query<LogQuery>,
) -> AppResult<impl IntoResponse> {
    let filter = params.into_filter(member.family_id())?;
    let logs = FeedLogRepo::list(&state.pool, &filter).await?;
    Ok(ok(logs))
}

/// GET /api/feed-log/last?babyId=
///
/// Most recent feed, used by the client for the feed warning timer.
pub async fn last_feed(
    member: FamilyMember,
    State(state): State<AppState>,
    Query(params): Query<LastFeedParams>,
) -> AppResult<impl IntoResponse> {
    ensure_baby_in_family(&state, member.family_id(), params.baby_id).await?;
    let log = FeedLogRepo::latest_for_baby(&state.pool, member.family_id(), params.baby_id).await?;
    Ok(ok(log))
}

/// POST /api/feed-log
pub async fn create_feed_log(
    FamilyWriter(member): FamilyWriter,
    State(state): State<AppState>,
    Json(input): Json<CreateFeedLog>,
) -> AppResult<impl IntoResponse> {
    validate_feed(&input.feed_type, input.side.as_deref(), input.amount)?;
    validate_duration(input.feed_duration_seconds)?;
    validate_text_length(input.food.as_deref(), "Food")?;
    ensure_baby_in_family(&state, member.family_id(), input.baby_id).await?;

    let log = FeedLogRepo::create(&state.pool, member.family_id(), member.caretaker_id, &input).await?;

    tracing::debug!(family_id = member.family_id(), feed_log_id = log.id, "Feed logged");
    Ok((StatusCode::CREATED, ok(log)))
}

/// GET /api/feed-log/{id}
pub async fn get_feed_log(
    member: FamilyMember,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let log = FeedLogRepo::find_by_id(&state.pool, member.family_id(), id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(ok(log))
}

/// PUT /api/feed-log/{id}
///
/// A new side is checked against the merged feed type.
pub async fn update_feed_log(
    FamilyWriter(member): FamilyWriter,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateFeedLog>,
) -> AppResult<impl IntoResponse> {
    let existing = FeedLogRepo::find_by_id(&state.pool, member.family_id(), id)
        .await?
        .ok_or_else(|| not_found(id))?;
    let feed_type = input.feed_type.as_deref().unwrap_or(&existing.feed_type);
    validate_feed(feed_type, input.side.as_deref(), input.amount)?;
    validate_duration(input.feed_duration_seconds)?;
    validate_text_length(input.food.as_deref(), "Food")?;

    let log = FeedLogRepo::update(&state.pool, member.family_id(), id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(ok(log))
}

/// DELETE /api/feed-log/{id}
pub async fn delete_feed_log(
    FamilyWriter(member): FamilyWriter,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !FeedLogRepo::soft_delete(&state.pool, member.family_id(), id).await? {
        return Err(not_found(id));
    }
    Ok(StatusCode::NO_CONTENT)
}
