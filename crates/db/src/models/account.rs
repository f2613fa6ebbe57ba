//! Account entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use babycontrol_core::types::{DbId, Timestamp};

/// Full account row from the `accounts` table.
///
/// Contains the password and token hashes -- NEVER serialize this to API
/// responses directly. Use [`AccountResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct Account {
    pub id: DbId,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: Option<String>,
    pub verified: bool,
    pub verification_token_hash: Option<String>,
    pub password_reset_token_hash: Option<String>,
    pub password_reset_expires_at: Option<Timestamp>,
    pub stripe_customer_id: Option<String>,
    pub subscription_id: Option<String>,
    pub plan_type: Option<String>,
    pub plan_expires_at: Option<Timestamp>,
    pub trial_ends_at: Option<Timestamp>,
    pub subscription_cancel_at_period_end: bool,
    pub family_id: Option<DbId>,
    pub is_closed: bool,
    pub closed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Safe account representation for API responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub id: DbId,
    pub email: String,
    pub first_name: String,
    pub last_name: Option<String>,
    pub verified: bool,
    pub plan_type: Option<String>,
    pub plan_expires_at: Option<Timestamp>,
    pub trial_ends_at: Option<Timestamp>,
    pub subscription_cancel_at_period_end: bool,
    pub family_id: Option<DbId>,
    pub is_closed: bool,
    pub created_at: Timestamp,
}

impl From<&Account> for AccountResponse {
    fn from(a: &Account) -> Self {
        Self {
            id: a.id,
            email: a.email.clone(),
            first_name: a.first_name.clone(),
            last_name: a.last_name.clone(),
            verified: a.verified,
            plan_type: a.plan_type.clone(),
            plan_expires_at: a.plan_expires_at,
            trial_ends_at: a.trial_ends_at,
            subscription_cancel_at_period_end: a.subscription_cancel_at_period_end,
            family_id: a.family_id,
            is_closed: a.is_closed,
            created_at: a.created_at,
        }
    }
}

/// DTO for creating a new account. Email is stored lower-cased.
#[derive(Debug, Clone)]
pub struct CreateAccount {
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: Option<String>,
    pub verification_token_hash: Option<String>,
    pub trial_ends_at: Option<Timestamp>,
}

/// DTO for profile edits. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccountProfile {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Billing fields mirrored from Stripe onto the account row.
#[derive(Debug, Clone)]
pub struct BillingMirror {
    pub plan_type: Option<String>,
    pub subscription_id: Option<String>,
    pub plan_expires_at: Option<Timestamp>,
    pub cancel_at_period_end: bool,
}
