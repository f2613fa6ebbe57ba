//! Setup token model: single-use onboarding credential.

use serde::Serialize;
use sqlx::FromRow;
use babycontrol_core::types::{DbId, Timestamp};

/// A row from the `setup_tokens` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetupToken {
    pub id: DbId,
    #[serde(skip_serializing)]
    pub token_hash: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub expires_at: Timestamp,
    pub used_at: Option<Timestamp>,
    pub created_by: String,
    pub family_id: Option<DbId>,
    pub created_at: Timestamp,
}

impl SetupToken {
    /// `true` once consumed or past its expiry.
    pub fn is_spent(&self, now: Timestamp) -> bool {
        self.used_at.is_some() || self.expires_at <= now
    }
}

/// DTO for creating a setup token.
#[derive(Debug, Clone)]
pub struct CreateSetupToken {
    pub token_hash: String,
    pub password_hash: String,
    pub expires_at: Timestamp,
    pub created_by: String,
}
