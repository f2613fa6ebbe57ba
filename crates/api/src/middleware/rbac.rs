//! Tenant and role extractors.
//!
//! Each extractor builds on [`Identity`] and rejects callers that do not
//! meet its requirement, so a handler's signature states who may call it.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use babycontrol_core::billing::ExpirationInfo;
use babycontrol_core::error::CoreError;
use babycontrol_core::roles::{ROLE_ADMIN, ROLE_OWNER};
use babycontrol_core::types::DbId;
use babycontrol_db::models::account::Account;
use babycontrol_db::models::family::Family;
use babycontrol_db::repositories::{AccountRepo, CaretakerRepo, FamilyRepo, SetupTokenRepo};
use chrono::Utc;

use super::auth::Identity;
use crate::auth::jwt::Principal;
use crate::error::{AppError, AppResult};
use crate::state::AppState;
use crate::subscriptions::current_access;

fn forbidden(msg: &str) -> AppError {
    AppError::Core(CoreError::Forbidden(msg.into()))
}

// ---------------------------------------------------------------------------
// FamilyMember
// ---------------------------------------------------------------------------

/// A caretaker of the family, or the account that owns it.
///
/// The family (and for caretakers, the caretaker row) is re-read on every
/// request so deactivated families and removed caretakers lose access
/// immediately.
#[derive(Debug, Clone)]
pub struct FamilyMember {
    pub family: Family,
    /// `None` for the system login and for account owners.
    pub caretaker_id: Option<DbId>,
    pub role: String,
    pub is_owner: bool,
}

impl FamilyMember {
    pub fn family_id(&self) -> DbId {
        self.family.id
    }

    pub fn is_admin(&self) -> bool {
        self.is_owner || self.role == ROLE_ADMIN
    }
}

impl FromRequestParts<AppState> for FamilyMember {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Identity(principal) = Identity::from_request_parts(parts, state).await?;

        let (family_id, caretaker_id, role, is_owner) = match principal {
            Principal::Caretaker {
                family_id,
                caretaker_id,
                role,
                ..
            } => (family_id, caretaker_id, role, false),
            Principal::Account { account_id, .. } => {
                let account = load_open_account(state, account_id).await?;
                let family_id = account
                    .family_id
                    .ok_or_else(|| forbidden("Account has no family yet"))?;
                (family_id, None, ROLE_OWNER.to_string(), true)
            }
            Principal::SysAdmin | Principal::Setup { .. } => {
                return Err(forbidden("Family access required"));
            }
        };

        let family = FamilyRepo::find_by_id(&state.pool, family_id)
            .await?
            .ok_or_else(|| forbidden("Family no longer exists"))?;
        if !family.is_active {
            return Err(forbidden("This family is inactive"));
        }

        // Caretakers removed or deactivated since login lose access.
        let role = match caretaker_id {
            Some(id) => {
                let caretaker = CaretakerRepo::find_by_id(&state.pool, family_id, id)
                    .await?
                    .filter(|c| !c.inactive)
                    .ok_or_else(|| {
                        AppError::Core(CoreError::Unauthorized(
                            "Caretaker is no longer active".into(),
                        ))
                    })?;
                caretaker.role
            }
            None => role,
        };

        Ok(FamilyMember {
            family,
            caretaker_id,
            role,
            is_owner,
        })
    }
}

// ---------------------------------------------------------------------------
// FamilyWriter
// ---------------------------------------------------------------------------

/// A [`FamilyMember`] whose family still has access.
///
/// Families owned by an account with a lapsed trial or plan get 403 with
/// an `expirationInfo` payload. Families without an owning account never
/// expire.
#[derive(Debug, Clone)]
pub struct FamilyWriter(pub FamilyMember);

impl FromRequestParts<AppState> for FamilyWriter {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let member = FamilyMember::from_request_parts(parts, state).await?;
        ensure_family_access(state, &member.family, member.is_owner).await?;
        Ok(FamilyWriter(member))
    }
}

/// Reject with [`AppError::Expired`] when the family's owning account has lapsed.
///
/// A tracked subscription past its stored period end is re-read from the
/// payment provider before access is denied.
pub async fn ensure_family_access(
    state: &AppState,
    family: &Family,
    caller_is_owner: bool,
) -> AppResult<()> {
    let Some(account) = AccountRepo::find_by_family(&state.pool, family.id).await? else {
        return Ok(());
    };
    let (account, status) = current_access(state, account).await;
    match ExpirationInfo::from_status(&status, account.id, Some(family.slug.clone()), caller_is_owner)
    {
        Some(info) => {
            tracing::info!(family_id = family.id, kind = info.kind, "Family access expired");
            Err(AppError::Expired(Box::new(info)))
        }
        None => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// FamilyAdmin
// ---------------------------------------------------------------------------

/// A caretaker with the `ADMIN` role (or the system login), or the account owner.
#[derive(Debug, Clone)]
pub struct FamilyAdmin(pub FamilyMember);

impl FromRequestParts<AppState> for FamilyAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let member = FamilyMember::from_request_parts(parts, state).await?;
        if !member.is_admin() {
            return Err(forbidden("Admin role required"));
        }
        Ok(FamilyAdmin(member))
    }
}

// ---------------------------------------------------------------------------
// AccountUser
// ---------------------------------------------------------------------------

/// An account owner; the account row is loaded fresh.
#[derive(Debug, Clone)]
pub struct AccountUser(pub Account);

impl FromRequestParts<AppState> for AccountUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match Identity::from_request_parts(parts, state).await? {
            Identity(Principal::Account { account_id, .. }) => {
                Ok(AccountUser(load_open_account(state, account_id).await?))
            }
            _ => Err(forbidden("Account authentication required")),
        }
    }
}

async fn load_open_account(state: &AppState, account_id: DbId) -> AppResult<Account> {
    let account = AccountRepo::find_by_id(&state.pool, account_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("Account no longer exists".into())))?;
    if account.is_closed {
        return Err(forbidden("Account is closed"));
    }
    Ok(account)
}

// ---------------------------------------------------------------------------
// SysAdmin
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
pub struct SysAdmin;

impl FromRequestParts<AppState> for SysAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match Identity::from_request_parts(parts, state).await? {
            Identity(Principal::SysAdmin) => Ok(SysAdmin),
            _ => Err(forbidden("System administrator access required")),
        }
    }
}

// ---------------------------------------------------------------------------
// SetupAuthority
// ---------------------------------------------------------------------------

/// Someone allowed to create a family.
#[derive(Debug, Clone)]
pub enum SetupAuthority {
    /// Holder of an unspent setup token.
    Token(DbId),
    /// An account that has no family yet.
    Account(Account),
}

impl FromRequestParts<AppState> for SetupAuthority {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match Identity::from_request_parts(parts, state).await? {
            Identity(Principal::Setup { setup_token_id }) => {
                let token = SetupTokenRepo::find_by_id(&state.pool, setup_token_id)
                    .await?
                    .ok_or_else(|| {
                        AppError::Core(CoreError::Missing("Setup token not found".into()))
                    })?;
                if token.is_spent(Utc::now()) {
                    return Err(AppError::Core(CoreError::Gone(
                        "This setup link has already been used or has expired".into(),
                    )));
                }
                Ok(SetupAuthority::Token(setup_token_id))
            }
            Identity(Principal::Account { account_id, .. }) => {
                let account = load_open_account(state, account_id).await?;
                if account.family_id.is_some() {
                    return Err(AppError::Core(CoreError::Conflict(
                        "Account already has a family".into(),
                    )));
                }
                Ok(SetupAuthority::Account(account))
            }
            _ => Err(forbidden("Setup token or account required")),
        }
    }
}
