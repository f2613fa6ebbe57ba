//! Feed log model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use babycontrol_core::types::{DbId, Timestamp};

/// A row from the `feed_logs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedLog {
    pub id: DbId,
    pub baby_id: DbId,
    pub caretaker_id: Option<DbId>,
    pub time: Timestamp,
    pub feed_type: String,
    pub amount: Option<f64>,
    pub unit_abbr: Option<String>,
    pub side: Option<String>,
    pub food: Option<String>,
    pub feed_duration_seconds: Option<i32>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a feed log.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFeedLog {
    pub baby_id: DbId,
    pub time: Timestamp,
    pub feed_type: String,
    pub amount: Option<f64>,
    pub unit_abbr: Option<String>,
    pub side: Option<String>,
    pub food: Option<String>,
    pub feed_duration_seconds: Option<i32>,
}

/// DTO for updating a feed log. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFeedLog {
    pub time: Option<Timestamp>,
    pub feed_type: Option<String>,
    pub amount: Option<f64>,
    pub unit_abbr: Option<String>,
    pub side: Option<String>,
    pub food: Option<String>,
    pub feed_duration_seconds: Option<i32>,
}
