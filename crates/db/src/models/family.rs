//! Family (tenant) entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use babycontrol_core::types::{DbId, Timestamp};

/// A family row from the `families` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Family {
    pub id: DbId,
    pub slug: String,
    pub name: String,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Public view of a family returned by slug lookup.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyPublic {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub is_active: bool,
}

impl From<Family> for FamilyPublic {
    fn from(f: Family) -> Self {
        Self {
            id: f.id,
            name: f.name,
            slug: f.slug,
            is_active: f.is_active,
        }
    }
}

/// Family row enriched with counts, for the sysadmin listing.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyOverview {
    pub id: DbId,
    pub slug: String,
    pub name: String,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub baby_count: i64,
    pub caretaker_count: i64,
    pub account_email: Option<String>,
}

/// DTO for updating an existing family. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFamily {
    pub slug: Option<String>,
    pub name: Option<String>,
    pub is_active: Option<bool>,
}
