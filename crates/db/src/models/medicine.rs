//! Medicine catalogue and medicine log models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use babycontrol_core::types::{DbId, Timestamp};

/// A row from the `medicines` table (family-wide catalogue).
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Medicine {
    pub id: DbId,
    pub family_id: DbId,
    pub name: String,
    pub typical_dose: Option<f64>,
    pub unit_abbr: Option<String>,
    /// Minimum spacing between doses, `HH:MM`.
    pub dose_min_time: Option<String>,
    pub notes: Option<String>,
    pub active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMedicine {
    pub name: String,
    pub typical_dose: Option<f64>,
    pub unit_abbr: Option<String>,
    pub dose_min_time: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMedicine {
    pub name: Option<String>,
    pub typical_dose: Option<f64>,
    pub unit_abbr: Option<String>,
    pub dose_min_time: Option<String>,
    pub notes: Option<String>,
    pub active: Option<bool>,
}

/// A row from the `medicine_logs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicineLog {
    pub id: DbId,
    pub baby_id: DbId,
    pub caretaker_id: Option<DbId>,
    pub medicine_id: DbId,
    pub time: Timestamp,
    pub dose_amount: f64,
    pub unit_abbr: Option<String>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMedicineLog {
    pub baby_id: DbId,
    pub medicine_id: DbId,
    pub time: Timestamp,
    pub dose_amount: f64,
    pub unit_abbr: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMedicineLog {
    pub time: Option<Timestamp>,
    pub dose_amount: Option<f64>,
    pub unit_abbr: Option<String>,
    pub notes: Option<String>,
}
