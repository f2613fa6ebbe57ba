//! Baby entity model and DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use babycontrol_core::types::{DbId, Timestamp};

/// A row from the `babies` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Baby {
    pub id: DbId,
    pub family_id: DbId,
    pub first_name: String,
    pub last_name: Option<String>,
    pub birth_date: NaiveDate,
    pub gender: Option<String>,
    pub inactive: bool,
    pub feed_warning_time: String,
    pub diaper_warning_time: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a baby. `family_id` comes from the caller's identity.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBaby {
    pub first_name: String,
    pub last_name: Option<String>,
    pub birth_date: NaiveDate,
    pub gender: Option<String>,
    /// Defaults to `03:00` if omitted.
    pub feed_warning_time: Option<String>,
    /// Defaults to `02:00` if omitted.
    pub diaper_warning_time: Option<String>,
}

/// DTO for updating a baby. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBaby {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub gender: Option<String>,
    pub inactive: Option<bool>,
    pub feed_warning_time: Option<String>,
    pub diaper_warning_time: Option<String>,
}
