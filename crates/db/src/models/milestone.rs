//! Milestone model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use babycontrol_core::types::{DbId, Timestamp};

/// A row from the `milestones` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub id: DbId,
    pub baby_id: DbId,
    pub caretaker_id: Option<DbId>,
    pub date: Timestamp,
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a milestone.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMilestone {
    pub baby_id: DbId,
    pub date: Timestamp,
    pub title: String,
    pub description: Option<String>,
    pub category: String,
}

/// DTO for updating a milestone. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMilestone {
    pub date: Option<Timestamp>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
}
