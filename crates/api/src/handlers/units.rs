//! Handler for the public `/units` lookup.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use babycontrol_db::repositories::UnitRepo;
use serde::Deserialize;

use crate::error::AppResult;
use crate::response::ok;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UnitParams {
    /// Activity tag such as `bottle` or `weight`.
    pub activity: Option<String>,
}

/// GET /api/units?activity=
pub async fn list_units(
    State(state): State<AppState>,
    Query(params): Query<UnitParams>,
) -> AppResult<impl IntoResponse> {
    let mut units = UnitRepo::list(&state.pool).await?;
    if let Some(activity) = params.activity.as_deref().filter(|a| !a.is_empty()) {
        units.retain(|u| u.applies_to(activity));
    }
    Ok(ok(units))
}
