//! Per-family settings model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use babycontrol_core::types::{DbId, Timestamp};

/// A row from the `settings` table (one per family).
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub id: DbId,
    pub family_id: DbId,
    pub family_name: String,
    #[serde(skip_serializing)]
    pub security_pin_hash: String,
    pub auth_type: String,
    pub default_bottle_unit: String,
    pub default_solid_unit: String,
    pub default_height_unit: String,
    pub default_weight_unit: String,
    pub default_temp_unit: String,
    /// Consecutive failed system-PIN logins.
    #[serde(skip_serializing)]
    pub failed_login_count: i32,
    #[serde(skip_serializing)]
    pub locked_until: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for updating settings. All fields are optional; the PIN arrives
/// already hashed.
#[derive(Debug, Clone, Default)]
pub struct UpdateSettings {
    pub family_name: Option<String>,
    pub security_pin_hash: Option<String>,
    pub auth_type: Option<String>,
    pub default_bottle_unit: Option<String>,
    pub default_solid_unit: Option<String>,
    pub default_height_unit: Option<String>,
    pub default_weight_unit: Option<String>,
    pub default_temp_unit: Option<String>,
}
