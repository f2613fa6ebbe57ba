//! Handlers for the family `/settings` resource.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use babycontrol_core::activity::{validate_one_of, validate_required, AUTH_TYPES};
use babycontrol_core::pin::validate_pin;
use babycontrol_db::models::settings::UpdateSettings;
use babycontrol_db::repositories::SettingsRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{FamilyAdmin, FamilyMember};
use crate::response::ok;
use crate::state::AppState;

use super::{ensure_unit_applies, hash_secret};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingsRequest {
    pub family_name: Option<String>,
    /// New family-wide PIN in plaintext.
    pub security_pin: Option<String>,
    pub auth_type: Option<String>,
    pub default_bottle_unit: Option<String>,
    pub default_solid_unit: Option<String>,
    pub default_height_unit: Option<String>,
    pub default_weight_unit: Option<String>,
    pub default_temp_unit: Option<String>,
}

/// GET /api/settings
pub async fn get_settings(
    member: FamilyMember,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let family_id = member.family_id();
    let settings = SettingsRepo::find_by_family(&state.pool, family_id)
        .await?
        .ok_or_else(|| AppError::InternalError(format!("Family {family_id} has no settings")))?;
    Ok(ok(settings))
}

/// PUT /api/settings
pub async fn update_settings(
    FamilyAdmin(member): FamilyAdmin,
    State(state): State<AppState>,
    Json(input): Json<UpdateSettingsRequest>,
) -> AppResult<impl IntoResponse> {
    if let Some(name) = &input.family_name {
        validate_required(name, "Family name")?;
    }
    if let Some(auth_type) = &input.auth_type {
        validate_one_of(auth_type, AUTH_TYPES, "auth type")?;
    }
    let security_pin_hash = match &input.security_pin {
        Some(pin) => {
            validate_pin(pin)?;
            Some(hash_secret(pin)?)
        }
        None => None,
    };

    let unit_fields = [
        (&input.default_bottle_unit, "bottle"),
        (&input.default_solid_unit, "solids"),
        (&input.default_height_unit, "height"),
        (&input.default_weight_unit, "weight"),
        (&input.default_temp_unit, "temp"),
    ];
    for (value, activity) in unit_fields {
        if let Some(abbr) = value {
            ensure_unit_applies(&state, abbr, activity).await?;
        }
    }

    let family_id = member.family_id();
    let update = UpdateSettings {
        family_name: input.family_name.map(|n| n.trim().to_string()),
        security_pin_hash,
        auth_type: input.auth_type,
        default_bottle_unit: input.default_bottle_unit,
        default_solid_unit: input.default_solid_unit,
        default_height_unit: input.default_height_unit,
        default_weight_unit: input.default_weight_unit,
        default_temp_unit: input.default_temp_unit,
    };
    let settings = SettingsRepo::update(&state.pool, family_id, &update)
        .await?
        .ok_or_else(|| AppError::InternalError(format!("Family {family_id} has no settings")))?;

    tracing::info!(family_id, auth_type = %settings.auth_type, "Settings updated");
    Ok(ok(settings))
}
