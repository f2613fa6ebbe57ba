//! Handler for the family setup wizard (`POST /setup/start`).
//!
//! Everything is validated and hashed up front; the writes then happen in
//! one transaction inside [`SetupRepo::create_family`], which also consumes
//! the setup token or links the account.

use std::collections::HashSet;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use babycontrol_core::activity::{
    validate_one_of, validate_required, AUTH_TYPES, AUTH_TYPE_CARETAKER, AUTH_TYPE_SYSTEM,
};
use babycontrol_core::error::CoreError;
use babycontrol_core::pin::{validate_login_id, validate_pin};
use babycontrol_core::roles::{ROLE_ADMIN, ROLE_USER, VALID_CARETAKER_ROLES};
use babycontrol_core::slug::{slugify, validate_slug};
use babycontrol_db::models::baby::{Baby, CreateBaby};
use babycontrol_db::models::caretaker::Caretaker;
use babycontrol_db::models::family::FamilyPublic;
use babycontrol_db::models::family_setup::{FamilySetup, SetupCaretaker, SetupOrigin, SetupOutcome};
use babycontrol_db::models::settings::Settings;
use babycontrol_db::repositories::{FamilyRepo, SetupRepo};
use serde::{Deserialize, Serialize};

use crate::auth::jwt::Principal;
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::SetupAuthority;
use crate::response::{ok, DataResponse};
use crate::state::AppState;

use super::auth::{account_principal, issue_token, TokenResponse};
use super::baby::validate_new_baby;
use super::hash_secret;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetupCaretakerInput {
    pub login_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub caretaker_type: Option<String>,
    pub role: Option<String>,
    pub security_pin: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetupRequest {
    pub name: String,
    /// Derived from `name` when blank.
    #[serde(default)]
    pub slug: String,
    /// Family-wide PIN. Defaults to the first admin caretaker's PIN.
    pub security_pin: Option<String>,
    /// `SYSTEM` or `CARETAKER`; inferred from `caretakers` when omitted.
    pub auth_type: Option<String>,
    #[serde(default)]
    pub caretakers: Vec<SetupCaretakerInput>,
    pub baby: Option<CreateBaby>,
}

#[derive(Debug, Serialize)]
pub struct SetupResponse {
    pub family: FamilyPublic,
    pub settings: Settings,
    pub caretakers: Vec<Caretaker>,
    pub baby: Option<Baby>,
    /// Token scoped to the new family.
    pub auth: TokenResponse,
}

/// POST /api/setup/start
pub async fn start_setup(
    authority: SetupAuthority,
    State(state): State<AppState>,
    Json(input): Json<SetupRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<SetupResponse>>)> {
    let name = input.name.trim().to_string();
    validate_required(&name, "Family name")?;
    let slug = match input.slug.trim() {
        "" => slugify(&name),
        given => given.to_lowercase(),
    };
    validate_slug(&slug)?;

    let auth_type = resolve_auth_type(input.auth_type.as_deref(), &input.caretakers)?;
    validate_caretakers(&input.caretakers, &auth_type)?;
    if let Some(baby) = &input.baby {
        validate_new_baby(baby)?;
    }

    let family_pin = match (&input.security_pin, first_admin(&input.caretakers)) {
        (Some(pin), _) => pin.clone(),
        (None, Some(admin)) => admin.security_pin.clone(),
        (None, None) => {
            return Err(AppError::Core(CoreError::Validation(
                "A security PIN is required".into(),
            )))
        }
    };
    validate_pin(&family_pin)?;

    if FamilyRepo::slug_exists(&state.pool, &slug).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "This slug is already taken".into(),
        )));
    }

    let caretakers = input
        .caretakers
        .iter()
        .map(|c| {
            Ok(SetupCaretaker {
                login_id: c.login_id.clone(),
                name: c.name.trim().to_string(),
                caretaker_type: c.caretaker_type.clone(),
                role: c.role.clone().unwrap_or_else(|| ROLE_USER.to_string()),
                security_pin_hash: hash_secret(&c.security_pin)?,
            })
        })
        .collect::<AppResult<Vec<_>>>()?;

    let origin = match &authority {
        SetupAuthority::Token(id) => SetupOrigin::Token(*id),
        SetupAuthority::Account(account) => SetupOrigin::Account(account.id),
    };
    let setup = FamilySetup {
        slug,
        name,
        security_pin_hash: hash_secret(&family_pin)?,
        auth_type,
        caretakers,
        baby: input.baby,
        origin,
    };

    let created = match SetupRepo::create_family(&state.pool, &setup).await? {
        SetupOutcome::Created(created) => *created,
        SetupOutcome::TokenSpent => {
            return Err(AppError::Core(CoreError::Gone(
                "This setup link has already been used or has expired".into(),
            )))
        }
        SetupOutcome::AccountAlreadyLinked => {
            return Err(AppError::Core(CoreError::Conflict(
                "Account already has a family".into(),
            )))
        }
    };

    let family = &created.family;
    let principal = match &authority {
        SetupAuthority::Account(account) => account_principal(account.id, Some(family)),
        SetupAuthority::Token(_) => Principal::Caretaker {
            family_id: family.id,
            family_slug: family.slug.clone(),
            caretaker_id: created
                .caretakers
                .iter()
                .find(|c| c.role == ROLE_ADMIN)
                .map(|c| c.id),
            role: ROLE_ADMIN.to_string(),
        },
    };
    let auth = issue_token(&state, principal)?;

    tracing::info!(
        family_id = family.id,
        slug = %family.slug,
        caretakers = created.caretakers.len(),
        origin = ?setup.origin,
        "Family created",
    );

    Ok((
        StatusCode::CREATED,
        ok(SetupResponse {
            family: FamilyPublic::from(created.family),
            settings: created.settings,
            caretakers: created.caretakers,
            baby: created.baby,
            auth,
        }),
    ))
}

/// Explicit auth type, or `CARETAKER` when caretakers are supplied and `SYSTEM` otherwise.
fn resolve_auth_type(
    requested: Option<&str>,
    caretakers: &[SetupCaretakerInput],
) -> Result<String, CoreError> {
    match requested {
        Some(t) => {
            validate_one_of(t, AUTH_TYPES, "auth type")?;
            Ok(t.to_string())
        }
        None if caretakers.is_empty() => Ok(AUTH_TYPE_SYSTEM.to_string()),
        None => Ok(AUTH_TYPE_CARETAKER.to_string()),
    }
}

fn first_admin(caretakers: &[SetupCaretakerInput]) -> Option<&SetupCaretakerInput> {
    caretakers
        .iter()
        .find(|c| c.role.as_deref() == Some(ROLE_ADMIN))
}

fn validate_caretakers(caretakers: &[SetupCaretakerInput], auth_type: &str) -> Result<(), CoreError> {
    let mut seen = HashSet::new();
    for c in caretakers {
        validate_login_id(&c.login_id)?;
        validate_required(&c.name, "Caretaker name")?;
        validate_pin(&c.security_pin)?;
        if let Some(role) = &c.role {
            validate_one_of(role, VALID_CARETAKER_ROLES, "role")?;
        }
        if !seen.insert(c.login_id.as_str()) {
            return Err(CoreError::Validation(format!(
                "Login ID '{}' is used more than once",
                c.login_id
            )));
        }
    }
    if auth_type == AUTH_TYPE_CARETAKER && !caretakers.is_empty() && first_admin(caretakers).is_none() {
        return Err(CoreError::Validation(
            "At least one caretaker must have the ADMIN role".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn caretaker(login_id: &str, role: Option<&str>) -> SetupCaretakerInput {
        SetupCaretakerInput {
            login_id: login_id.into(),
            name: "Sam".into(),
            caretaker_type: Some("Parent".into()),
            role: role.map(str::to_string),
            security_pin: "246810".into(),
        }
    }

    #[test]
    fn auth_type_inferred_from_caretakers() {
        assert_eq!(resolve_auth_type(None, &[]).unwrap(), AUTH_TYPE_SYSTEM);
        assert_eq!(
            resolve_auth_type(None, &[caretaker("01", Some("ADMIN"))]).unwrap(),
            AUTH_TYPE_CARETAKER
        );
        assert_matches!(resolve_auth_type(Some("OPEN"), &[]), Err(CoreError::Validation(_)));
    }

    #[test]
    fn duplicate_login_ids_rejected() {
        let list = [caretaker("01", Some("ADMIN")), caretaker("01", None)];
        assert_matches!(
            validate_caretakers(&list, AUTH_TYPE_CARETAKER),
            Err(CoreError::Validation(msg)) if msg.contains("more than once")
        );
    }

    #[test]
    fn caretaker_mode_needs_an_admin() {
        let list = [caretaker("01", None), caretaker("02", Some("USER"))];
        assert_matches!(
            validate_caretakers(&list, AUTH_TYPE_CARETAKER),
            Err(CoreError::Validation(_))
        );
        assert!(validate_caretakers(&list, AUTH_TYPE_SYSTEM).is_ok());
    }

    #[test]
    fn system_login_id_is_reserved() {
        let list = [caretaker("00", Some("ADMIN"))];
        assert!(validate_caretakers(&list, AUTH_TYPE_CARETAKER).is_err());
    }
}
