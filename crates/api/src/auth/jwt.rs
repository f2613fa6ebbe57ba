//! JWT generation and validation.
//!
//! Every bearer token is an HS256-signed JWT whose [`Claims`] describe one
//! [`Principal`]: a caretaker (or the family-wide system login), an
//! account owner, the sysadmin, or the holder of a setup token.

use babycontrol_core::roles::{kinds, ROLE_OWNER, ROLE_SETUP, ROLE_SYSADMIN};
use babycontrol_core::types::DbId;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims embedded in every token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Principal identifier, e.g. `caretaker:12`, `account:3`, `sysadmin`.
    pub sub: String,
    /// One of the [`kinds`] constants.
    pub kind: String,
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family_id: Option<DbId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family_slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caretaker_id: Option<DbId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<DbId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub setup_token_id: Option<DbId>,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Unique token identifier (UUID v4).
    pub jti: String,
}

/// The authenticated party behind a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Principal {
    /// A caretaker, or the family's system login when `caretaker_id` is `None`.
    #[serde(rename_all = "camelCase")]
    Caretaker {
        family_id: DbId,
        family_slug: String,
        caretaker_id: Option<DbId>,
        role: String,
    },
    #[serde(rename_all = "camelCase")]
    Account {
        account_id: DbId,
        family_id: Option<DbId>,
        family_slug: Option<String>,
    },
    #[serde(rename = "sysadmin")]
    SysAdmin,
    #[serde(rename_all = "camelCase")]
    Setup { setup_token_id: DbId },
}

impl Principal {
    pub fn role(&self) -> &str {
        match self {
            Self::Caretaker { role, .. } => role,
            Self::Account { .. } => ROLE_OWNER,
            Self::SysAdmin => ROLE_SYSADMIN,
            Self::Setup { .. } => ROLE_SETUP,
        }
    }

    /// Family the token is scoped to, if any.
    pub fn family_id(&self) -> Option<DbId> {
        match self {
            Self::Caretaker { family_id, .. } => Some(*family_id),
            Self::Account { family_id, .. } => *family_id,
            Self::SysAdmin | Self::Setup { .. } => None,
        }
    }

    fn into_claims(self, iat: i64, exp: i64) -> Claims {
        let mut claims = Claims {
            sub: String::new(),
            kind: String::new(),
            role: self.role().to_string(),
            family_id: None,
            family_slug: None,
            caretaker_id: None,
            account_id: None,
            setup_token_id: None,
            exp,
            iat,
            jti: Uuid::new_v4().to_string(),
        };
        match self {
            Self::Caretaker {
                family_id,
                family_slug,
                caretaker_id,
                ..
            } => {
                claims.kind = kinds::CARETAKER.into();
                claims.sub = match caretaker_id {
                    Some(id) => format!("caretaker:{id}"),
                    None => format!("system:{family_id}"),
                };
                claims.family_id = Some(family_id);
                claims.family_slug = Some(family_slug);
                claims.caretaker_id = caretaker_id;
            }
            Self::Account {
                account_id,
                family_id,
                family_slug,
            } => {
                claims.kind = kinds::ACCOUNT.into();
                claims.sub = format!("account:{account_id}");
                claims.account_id = Some(account_id);
                claims.family_id = family_id;
                claims.family_slug = family_slug;
            }
            Self::SysAdmin => {
                claims.kind = kinds::SYSADMIN.into();
                claims.sub = "sysadmin".into();
            }
            Self::Setup { setup_token_id } => {
                claims.kind = kinds::SETUP.into();
                claims.sub = format!("setup:{setup_token_id}");
                claims.setup_token_id = Some(setup_token_id);
            }
        }
        claims
    }
}

impl Claims {
    /// Rebuild the principal. `None` if the claims are inconsistent.
    pub fn principal(&self) -> Option<Principal> {
        match self.kind.as_str() {
            kinds::CARETAKER => Some(Principal::Caretaker {
                family_id: self.family_id?,
                family_slug: self.family_slug.clone()?,
                caretaker_id: self.caretaker_id,
                role: self.role.clone(),
            }),
            kinds::ACCOUNT => Some(Principal::Account {
                account_id: self.account_id?,
                family_id: self.family_id,
                family_slug: self.family_slug.clone(),
            }),
            kinds::SYSADMIN => Some(Principal::SysAdmin),
            kinds::SETUP => Some(Principal::Setup {
                setup_token_id: self.setup_token_id?,
            }),
            _ => None,
        }
    }
}

/// Configuration for JWT token generation and validation.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret used to sign and verify tokens.
    pub secret: String,
    /// Token lifetime in hours (default: 24).
    pub expiry_hours: i64,
    /// Setup-token session lifetime in minutes (default: 60).
    pub setup_expiry_mins: i64,
}

const DEFAULT_EXPIRY_HOURS: i64 = 24;
const DEFAULT_SETUP_EXPIRY_MINS: i64 = 60;

impl JwtConfig {
    /// Load JWT configuration from environment variables.
    ///
    /// | Env Var                 | Required | Default |
    /// |-------------------------|----------|---------|
    /// | `JWT_SECRET`            | **yes**  | --      |
    /// | `JWT_EXPIRY_HOURS`      | no       | `24`    |
    /// | `JWT_SETUP_EXPIRY_MINS` | no       | `60`    |
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is not set or is empty.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let expiry_hours: i64 = std::env::var("JWT_EXPIRY_HOURS")
            .unwrap_or_else(|_| DEFAULT_EXPIRY_HOURS.to_string())
            .parse()
            .expect("JWT_EXPIRY_HOURS must be a valid i64");

        let setup_expiry_mins: i64 = std::env::var("JWT_SETUP_EXPIRY_MINS")
            .unwrap_or_else(|_| DEFAULT_SETUP_EXPIRY_MINS.to_string())
            .parse()
            .expect("JWT_SETUP_EXPIRY_MINS must be a valid i64");

        Self {
            secret,
            expiry_hours,
            setup_expiry_mins,
        }
    }

    /// Lifetime in seconds of a token for `principal`.
    pub fn lifetime_secs(&self, principal: &Principal) -> i64 {
        match principal {
            Principal::Setup { .. } => self.setup_expiry_mins * 60,
            _ => self.expiry_hours * 3600,
        }
    }
}

/// Generate an HS256 token for `principal`.
pub fn generate_token(
    principal: Principal,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();
    let exp = now + config.lifetime_secs(&principal);
    let claims = principal.into_claims(now, exp);

    encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Validate and decode a token, returning the embedded [`Claims`].
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(), // HS256, validates exp
    )?;
    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            expiry_hours: 24,
            setup_expiry_mins: 60,
        }
    }

    #[test]
    fn caretaker_round_trip() {
        let config = test_config();
        let principal = Principal::Caretaker {
            family_id: 4,
            family_slug: "smith".into(),
            caretaker_id: Some(9),
            role: "USER".into(),
        };
        let token = generate_token(principal.clone(), &config).unwrap();
        let claims = validate_token(&token, &config).unwrap();

        assert_eq!(claims.kind, "caretaker");
        assert_eq!(claims.sub, "caretaker:9");
        assert_eq!(claims.principal(), Some(principal));
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn system_login_has_no_caretaker_id() {
        let config = test_config();
        let principal = Principal::Caretaker {
            family_id: 4,
            family_slug: "smith".into(),
            caretaker_id: None,
            role: "ADMIN".into(),
        };
        let claims = validate_token(&generate_token(principal, &config).unwrap(), &config).unwrap();
        assert_eq!(claims.sub, "system:4");
        assert_eq!(claims.caretaker_id, None);
        assert_eq!(claims.role, "ADMIN");
    }

    #[test]
    fn setup_tokens_are_short_lived() {
        let config = test_config();
        let claims = validate_token(
            &generate_token(Principal::Setup { setup_token_id: 2 }, &config).unwrap(),
            &config,
        )
        .unwrap();
        assert_eq!(claims.exp - claims.iat, 3600);
        assert_eq!(claims.role, "SETUP");
    }

    #[test]
    fn inconsistent_claims_have_no_principal() {
        let claims = Claims {
            sub: "caretaker:1".into(),
            kind: "caretaker".into(),
            role: "USER".into(),
            family_id: None,
            family_slug: None,
            caretaker_id: Some(1),
            account_id: None,
            setup_token_id: None,
            exp: 0,
            iat: 0,
            jti: String::new(),
        };
        assert_eq!(claims.principal(), None);
    }

    #[test]
    fn expired_token_fails() {
        let config = test_config();
        let now = chrono::Utc::now().timestamp();
        let claims = Principal::SysAdmin.into_claims(now - 600, now - 300);
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .unwrap();
        assert!(validate_token(&token, &config).is_err());
    }

    #[test]
    fn different_secrets_fail() {
        let config_a = test_config();
        let config_b = JwtConfig {
            secret: "another-secret".to_string(),
            ..test_config()
        };
        let token = generate_token(Principal::SysAdmin, &config_a).unwrap();
        assert!(validate_token(&token, &config_b).is_err());
    }
}
