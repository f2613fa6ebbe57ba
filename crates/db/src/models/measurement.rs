//! Growth and temperature measurement model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use babycontrol_core::types::{DbId, Timestamp};

/// A row from the `measurements` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Measurement {
    pub id: DbId,
    pub baby_id: DbId,
    pub caretaker_id: Option<DbId>,
    pub date: Timestamp,
    pub measurement_type: String,
    pub value: f64,
    pub unit_abbr: String,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMeasurement {
    pub baby_id: DbId,
    pub date: Timestamp,
    pub measurement_type: String,
    pub value: f64,
    pub unit_abbr: String,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMeasurement {
    pub date: Option<Timestamp>,
    pub measurement_type: Option<String>,
    pub value: Option<f64>,
    pub unit_abbr: Option<String>,
    pub notes: Option<String>,
}
