//! Caretaker entity model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use babycontrol_core::types::{DbId, Timestamp};

/// A row from the `caretakers` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Caretaker {
    pub id: DbId,
    pub family_id: DbId,
    pub login_id: String,
    pub name: String,
    pub caretaker_type: Option<String>,
    pub role: String,
    #[serde(skip_serializing)]
    pub security_pin_hash: String,
    pub inactive: bool,
    #[serde(skip_serializing)]
    pub failed_login_count: i32,
    #[serde(skip_serializing)]
    pub locked_until: Option<Timestamp>,
    #[serde(skip_serializing)]
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a caretaker. The PIN arrives already hashed.
#[derive(Debug, Clone)]
pub struct CreateCaretaker {
    pub family_id: DbId,
    pub login_id: String,
    pub name: String,
    pub caretaker_type: Option<String>,
    pub role: String,
    pub security_pin_hash: String,
}

/// DTO for updating a caretaker. All fields are optional.
#[derive(Debug, Clone, Default)]
pub struct UpdateCaretaker {
    pub login_id: Option<String>,
    pub name: Option<String>,
    pub caretaker_type: Option<String>,
    pub role: Option<String>,
    pub security_pin_hash: Option<String>,
    pub inactive: Option<bool>,
}
