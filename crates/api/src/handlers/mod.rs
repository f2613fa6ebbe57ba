pub mod account;
pub mod auth;
pub mod baby;
pub mod bath_log;
pub mod caretaker;
pub mod diaper_log;
pub mod family;
pub mod feed_log;
pub mod measurement;
pub mod medicine;
pub mod milestone;
pub mod note;
pub mod payments;
pub mod settings;
pub mod setup;
pub mod sleep_log;
pub mod timeline;
pub mod units;

use babycontrol_core::error::CoreError;
use babycontrol_core::types::DbId;
use babycontrol_db::repositories::{BabyRepo, UnitRepo};

use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Argon2 hash of a password or PIN.
pub(crate) fn hash_secret(secret: &str) -> AppResult<String> {
    hash_password(secret).map_err(|e| AppError::InternalError(format!("Hashing error: {e}")))
}

/// Check a password or PIN against its stored hash.
pub(crate) fn verify_secret(secret: &str, hash: &str) -> AppResult<bool> {
    verify_password(secret, hash)
        .map_err(|e| AppError::InternalError(format!("Verification error: {e}")))
}

/// 404 unless the baby belongs to `family_id`.
///
/// Babies of other families are reported as missing, never as forbidden.
pub(crate) async fn ensure_baby_in_family(
    state: &AppState,
    family_id: DbId,
    baby_id: DbId,
) -> AppResult<()> {
    if BabyRepo::belongs_to_family(&state.pool, family_id, baby_id).await? {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Baby",
            id: baby_id,
        }))
    }
}

/// 400 unless `abbr` is a known unit for `activity`.
pub(crate) async fn ensure_unit_applies(
    state: &AppState,
    abbr: &str,
    activity: &str,
) -> AppResult<()> {
    match UnitRepo::find_by_abbr(&state.pool, abbr).await? {
        Some(unit) if unit.applies_to(activity) => Ok(()),
        Some(_) => Err(AppError::Core(CoreError::Validation(format!(
            "Unit '{abbr}' cannot be used for {activity}"
        )))),
        None => Err(AppError::Core(CoreError::Validation(format!(
            "Unknown unit '{abbr}'"
        )))),
    }
}
