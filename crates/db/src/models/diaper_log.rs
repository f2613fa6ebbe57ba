//! Diaper log model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use babycontrol_core::types::{DbId, Timestamp};

/// A row from the `diaper_logs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiaperLog {
    pub id: DbId,
    pub baby_id: DbId,
    pub caretaker_id: Option<DbId>,
    pub time: Timestamp,
    pub diaper_type: String,
    pub condition: Option<String>,
    pub color: Option<String>,
    pub blowout: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a diaper log.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDiaperLog {
    pub baby_id: DbId,
    pub time: Timestamp,
    pub diaper_type: String,
    pub condition: Option<String>,
    pub color: Option<String>,
    /// Defaults to `false` if omitted.
    pub blowout: Option<bool>,
}

/// DTO for updating a diaper log. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDiaperLog {
    pub time: Option<Timestamp>,
    pub diaper_type: Option<String>,
    pub condition: Option<String>,
    pub color: Option<String>,
    pub blowout: Option<bool>,
}
