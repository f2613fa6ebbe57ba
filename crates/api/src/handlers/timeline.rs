//! Handler for the merged activity `/timeline`.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use babycontrol_db::repositories::TimelineRepo;

use crate::error::AppResult;
use crate::middleware::rbac::FamilyMember;
use crate::query::LogQuery;
use crate::response::ok;
use crate::state::AppState;

/// GET /api/timeline?babyId=&limit=
///
/// Most recent entries across every activity kind, newest first.
pub async fn get_timeline(
    member: FamilyMember,
    State(state): State<AppState>,
    Query(params): Query<LogQuery>,
) -> AppResult<impl IntoResponse> {
    let filter = params.into_filter(member.family_id())?;
    let entries = TimelineRepo::list(&state.pool, &filter).await?;
    Ok(ok(entries))
}
