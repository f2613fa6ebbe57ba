//! Bath log model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use babycontrol_core::types::{DbId, Timestamp};

/// A row from the `bath_logs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BathLog {
    pub id: DbId,
    pub baby_id: DbId,
    pub caretaker_id: Option<DbId>,
    pub time: Timestamp,
    pub soap_used: bool,
    pub shampoo_used: bool,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a bath log.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBathLog {
    pub baby_id: DbId,
    pub time: Timestamp,
    /// Defaults to `true` if omitted.
    pub soap_used: Option<bool>,
    /// Defaults to `true` if omitted.
    pub shampoo_used: Option<bool>,
    pub notes: Option<String>,
}

/// DTO for updating a bath log. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBathLog {
    pub time: Option<Timestamp>,
    pub soap_used: Option<bool>,
    pub shampoo_used: Option<bool>,
    pub notes: Option<String>,
}
