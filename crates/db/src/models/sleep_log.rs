//! Sleep log model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use babycontrol_core::types::{DbId, Timestamp};

/// A row from the `sleep_logs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepLog {
    pub id: DbId,
    pub baby_id: DbId,
    pub caretaker_id: Option<DbId>,
    pub start_time: Timestamp,
    pub end_time: Option<Timestamp>,
    /// Computed from start/end; `None` while the sleep is ongoing.
    pub duration_minutes: Option<i32>,
    pub sleep_type: String,
    pub location: Option<String>,
    pub quality: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a sleep log.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSleepLog {
    pub baby_id: DbId,
    pub start_time: Timestamp,
    pub end_time: Option<Timestamp>,
    pub sleep_type: String,
    pub location: Option<String>,
    pub quality: Option<String>,
}

/// DTO for updating a sleep log. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSleepLog {
    pub start_time: Option<Timestamp>,
    pub end_time: Option<Timestamp>,
    pub sleep_type: Option<String>,
    pub location: Option<String>,
    pub quality: Option<String>,
}
