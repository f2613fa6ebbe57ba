//! Plan and access rules for account billing.
//!
//! Stripe owns the lifecycle; the account row only mirrors `plan_type`,
//! `plan_expires_at`, and `trial_ends_at`. Everything here is a pure
//! function of those mirrored fields so handlers and tests agree on what
//! "expired" means.

use serde::Serialize;

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

/// Length of the free trial started at registration.
pub const DEFAULT_TRIAL_DAYS: i64 = 14;

pub const PLAN_TYPE_SUB: &str = "sub";
pub const PLAN_TYPE_FULL: &str = "full";

// ---------------------------------------------------------------------------
// Plans
// ---------------------------------------------------------------------------

/// Stored plan type on the account row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanType {
    /// Recurring subscription.
    Sub,
    /// One-time lifetime purchase.
    Full,
}

impl PlanType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sub => PLAN_TYPE_SUB,
            Self::Full => PLAN_TYPE_FULL,
        }
    }

    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            PLAN_TYPE_SUB => Ok(Self::Sub),
            PLAN_TYPE_FULL => Ok(Self::Full),
            other => Err(CoreError::Validation(format!(
                "Unknown plan type: '{other}'"
            ))),
        }
    }
}

/// Plan requested by the client at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BillingPlan {
    Monthly,
    Yearly,
    Lifetime,
}

impl BillingPlan {
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "monthly" => Ok(Self::Monthly),
            "yearly" => Ok(Self::Yearly),
            "lifetime" => Ok(Self::Lifetime),
            other => Err(CoreError::Validation(format!(
                "Unknown plan '{other}'. Must be one of: monthly, yearly, lifetime"
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
            Self::Lifetime => "lifetime",
        }
    }

    /// The plan type mirrored onto the account once checkout completes.
    pub fn plan_type(&self) -> PlanType {
        match self {
            Self::Monthly | Self::Yearly => PlanType::Sub,
            Self::Lifetime => PlanType::Full,
        }
    }

    /// Stripe checkout mode for this plan.
    pub fn checkout_mode(&self) -> &'static str {
        match self {
            Self::Monthly | Self::Yearly => "subscription",
            Self::Lifetime => "payment",
        }
    }
}

// ---------------------------------------------------------------------------
// Access evaluation
// ---------------------------------------------------------------------------

/// Effective access state of an account at a point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccessStatus {
    Lifetime,
    Active { until: Option<Timestamp> },
    Trial { ends_at: Timestamp },
    TrialExpired { ended_at: Timestamp },
    PlanExpired { expired_at: Timestamp },
    NoPlan,
}

impl AccessStatus {
    /// Whether writes are allowed.
    pub fn has_access(&self) -> bool {
        matches!(self, Self::Lifetime | Self::Active { .. } | Self::Trial { .. })
    }
}

/// Decide the access state from mirrored account fields.
///
/// A paid plan wins over a trial; an unknown `plan_type` is treated as no
/// plan.
pub fn evaluate_access(
    plan_type: Option<&str>,
    plan_expires_at: Option<Timestamp>,
    trial_ends_at: Option<Timestamp>,
    now: Timestamp,
) -> AccessStatus {
    match plan_type.map(PlanType::parse) {
        Some(Ok(PlanType::Full)) => return AccessStatus::Lifetime,
        Some(Ok(PlanType::Sub)) => match plan_expires_at {
            None => return AccessStatus::Active { until: None },
            Some(exp) if exp > now => return AccessStatus::Active { until: Some(exp) },
            Some(exp) => {
                if let Some(trial) = trial_ends_at.filter(|t| *t > now) {
                    return AccessStatus::Trial { ends_at: trial };
                }
                return AccessStatus::PlanExpired { expired_at: exp };
            }
        },
        _ => {}
    }

    match trial_ends_at {
        Some(trial) if trial > now => AccessStatus::Trial { ends_at: trial },
        Some(trial) => AccessStatus::TrialExpired { ended_at: trial },
        None => AccessStatus::NoPlan,
    }
}

/// Payload attached to 403 responses when a family's account has lapsed.
///
/// The web client looks for this shape to render its upgrade prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpirationInfo {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub date: Option<Timestamp>,
    pub account_id: DbId,
    pub family_slug: Option<String>,
    /// Whether the caller can fix this themselves (i.e. is the account owner).
    pub can_update: bool,
}

impl ExpirationInfo {
    /// Build the payload for a status without access; `None` when access is fine.
    pub fn from_status(
        status: &AccessStatus,
        account_id: DbId,
        family_slug: Option<String>,
        can_update: bool,
    ) -> Option<Self> {
        let (kind, date) = match status {
            AccessStatus::TrialExpired { ended_at } => ("TRIAL_EXPIRED", Some(*ended_at)),
            AccessStatus::PlanExpired { expired_at } => ("PLAN_EXPIRED", Some(*expired_at)),
            AccessStatus::NoPlan => ("NO_PLAN", None),
            _ => return None,
        };
        Some(Self {
            kind,
            date,
            account_id,
            family_slug,
            can_update,
        })
    }
}

// ---------------------------------------------------------------------------
// Subscription transitions
// ---------------------------------------------------------------------------

/// Check that an account's subscription can be canceled.
pub fn ensure_cancelable(
    plan_type: Option<&str>,
    subscription_id: Option<&str>,
) -> Result<(), CoreError> {
    if plan_type == Some(PLAN_TYPE_FULL) {
        return Err(CoreError::Validation(
            "Lifetime plans cannot be canceled".into(),
        ));
    }
    if subscription_id.is_none() {
        return Err(CoreError::Validation("No active subscription".into()));
    }
    Ok(())
}

/// Check that a new checkout for `plan` is allowed given the current state.
///
/// Lifetime holders cannot buy again; an account with a live
/// subscription cannot open a second one. Buying lifetime over a live
/// subscription is allowed and the subscription is canceled when the
/// purchase is verified.
pub fn ensure_checkout_allowed(
    plan: BillingPlan,
    current_plan_type: Option<&str>,
    subscription_id: Option<&str>,
    status: &AccessStatus,
) -> Result<(), CoreError> {
    if current_plan_type == Some(PLAN_TYPE_FULL) {
        return Err(CoreError::Validation(
            "Account already has a lifetime plan".into(),
        ));
    }
    let live_subscription = subscription_id.is_some() && matches!(status, AccessStatus::Active { .. });
    if live_subscription && plan.plan_type() == PlanType::Sub {
        return Err(CoreError::Conflict(
            "Account already has an active subscription".into(),
        ));
    }
    Ok(())
}

/// Stripe subscription statuses that still grant access.
pub fn subscription_grants_access(stripe_status: &str) -> bool {
    matches!(stripe_status, "active" | "trialing" | "past_due")
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::{Duration, Utc};

    #[test]
    fn lifetime_always_has_access() {
        let now = Utc::now();
        let status = evaluate_access(Some("full"), Some(now - Duration::days(400)), None, now);
        assert_eq!(status, AccessStatus::Lifetime);
        assert!(status.has_access());
    }

    #[test]
    fn subscription_active_until_expiry() {
        let now = Utc::now();
        let until = now + Duration::days(3);
        assert_eq!(
            evaluate_access(Some("sub"), Some(until), None, now),
            AccessStatus::Active { until: Some(until) }
        );
        let expired = now - Duration::days(1);
        assert_eq!(
            evaluate_access(Some("sub"), Some(expired), None, now),
            AccessStatus::PlanExpired { expired_at: expired }
        );
    }

    #[test]
    fn trial_states() {
        let now = Utc::now();
        let ends = now + Duration::days(5);
        assert_eq!(
            evaluate_access(None, None, Some(ends), now),
            AccessStatus::Trial { ends_at: ends }
        );
        let ended = now - Duration::days(5);
        let status = evaluate_access(None, None, Some(ended), now);
        assert_eq!(status, AccessStatus::TrialExpired { ended_at: ended });
        assert!(!status.has_access());
        assert_eq!(evaluate_access(None, None, None, now), AccessStatus::NoPlan);
    }

    #[test]
    fn expiration_info_only_for_lapsed() {
        let now = Utc::now();
        assert!(ExpirationInfo::from_status(&AccessStatus::Lifetime, 1, None, true).is_none());
        let info = ExpirationInfo::from_status(
            &AccessStatus::TrialExpired { ended_at: now },
            7,
            Some("smith".into()),
            false,
        )
        .unwrap();
        assert_eq!(info.kind, "TRIAL_EXPIRED");
        assert_eq!(info.account_id, 7);

        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["type"], "TRIAL_EXPIRED");
        assert_eq!(json["familySlug"], "smith");
        assert_eq!(json["canUpdate"], false);
    }

    #[test]
    fn canceling_lifetime_is_rejected() {
        assert_matches!(
            ensure_cancelable(Some("full"), None),
            Err(CoreError::Validation(msg)) if msg == "Lifetime plans cannot be canceled"
        );
        assert!(ensure_cancelable(Some("sub"), None).is_err());
        assert!(ensure_cancelable(Some("sub"), Some("sub_123")).is_ok());
    }

    #[test]
    fn second_subscription_conflicts() {
        let now = Utc::now();
        let active = AccessStatus::Active {
            until: Some(now + Duration::days(10)),
        };
        assert_matches!(
            ensure_checkout_allowed(BillingPlan::Monthly, Some("sub"), Some("sub_1"), &active),
            Err(CoreError::Conflict(_))
        );
        // Upgrading to lifetime from an active subscription is allowed.
        assert!(
            ensure_checkout_allowed(BillingPlan::Lifetime, Some("sub"), Some("sub_1"), &active)
                .is_ok()
        );
        assert_matches!(
            ensure_checkout_allowed(BillingPlan::Yearly, Some("full"), None, &AccessStatus::Lifetime),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn plan_mapping() {
        assert_eq!(BillingPlan::parse("yearly").unwrap().plan_type(), PlanType::Sub);
        assert_eq!(BillingPlan::Lifetime.checkout_mode(), "payment");
        assert!(BillingPlan::parse("weekly").is_err());
        assert_eq!(PlanType::parse("full").unwrap(), PlanType::Full);
    }
}
