//! Keeps the billing fields mirrored on an account row in step with the
//! payment provider.

use babycontrol_billing::{PaymentProvider, Subscription};
use babycontrol_core::billing::{
    evaluate_access, subscription_grants_access, AccessStatus, PlanType,
};
use babycontrol_core::error::CoreError;
use babycontrol_db::models::account::{Account, BillingMirror};
use babycontrol_db::repositories::AccountRepo;
use chrono::Utc;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Current access state of `account` from its mirrored fields.
pub fn account_access(account: &Account) -> AccessStatus {
    evaluate_access(
        account.plan_type.as_deref(),
        account.plan_expires_at,
        account.trial_ends_at,
        Utc::now(),
    )
}

/// Mirror a subscription, keeping the account's current plan type.
pub fn mirror_subscription(account: &Account, subscription: &Subscription) -> BillingMirror {
    BillingMirror {
        plan_type: account.plan_type.clone(),
        subscription_id: Some(subscription.id.clone()),
        plan_expires_at: subscription.period_end().or(account.plan_expires_at),
        cancel_at_period_end: subscription.cancel_at_period_end,
    }
}

pub async fn apply_mirror(
    state: &AppState,
    account: &Account,
    mirror: &BillingMirror,
) -> AppResult<Account> {
    AccountRepo::apply_billing(&state.pool, account.id, mirror)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Account",
            id: account.id,
        }))
}

/// Re-read the account's subscription from the provider and mirror it.
///
/// A subscription that no longer grants access is detached from the
/// account and its expiry is pinned to no later than now.
pub async fn refresh_subscription(
    state: &AppState,
    payments: &dyn PaymentProvider,
    account: &Account,
) -> AppResult<(Account, Option<Subscription>)> {
    let Some(subscription_id) = account.subscription_id.as_deref() else {
        return Ok((account.clone(), None));
    };

    let subscription = payments.retrieve_subscription(subscription_id).await?;
    let mut mirror = mirror_subscription(account, &subscription);
    if !subscription_grants_access(&subscription.status) {
        mirror.subscription_id = None;
        let now = Utc::now();
        mirror.plan_expires_at = Some(subscription.period_end().map_or(now, |end| end.min(now)));
        tracing::info!(account_id = account.id, status = %subscription.status, "Subscription no longer active");
    }
    let updated = apply_mirror(state, account, &mirror).await?;
    Ok((updated, Some(subscription)))
}

/// Access state of `account`, asking the provider first when a tracked
/// subscription looks lapsed.
///
/// The stored period end only moves forward when the provider is asked, so
/// a renewed subscription looks expired until then. Without a provider, or
/// when the provider call fails, the stored state decides.
pub async fn current_access(state: &AppState, account: Account) -> (Account, AccessStatus) {
    let status = account_access(&account);
    let tracked_subscription = account.plan_type.as_deref() == Some(PlanType::Sub.as_str())
        && account.subscription_id.is_some();
    if status.has_access() || !tracked_subscription {
        return (account, status);
    }
    let Some(payments) = state.payments.as_deref() else {
        return (account, status);
    };

    match refresh_subscription(state, payments, &account).await {
        Ok((refreshed, _)) => {
            let status = account_access(&refreshed);
            tracing::info!(
                account_id = refreshed.id,
                has_access = status.has_access(),
                "Subscription refreshed during access check"
            );
            (refreshed, status)
        }
        Err(e) => {
            tracing::warn!(account_id = account.id, error = %e, "Subscription refresh failed");
            (account, status)
        }
    }
}
