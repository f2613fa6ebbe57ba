//! Repository for the `accounts` table.

use sqlx::PgPool;
use babycontrol_core::types::{DbId, Timestamp};

use crate::models::account::{Account, BillingMirror, CreateAccount, UpdateAccountProfile};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, email, password_hash, first_name, last_name, verified, \
                        verification_token_hash, password_reset_token_hash, password_reset_expires_at, \
                        stripe_customer_id, subscription_id, plan_type, plan_expires_at, trial_ends_at, \
                        subscription_cancel_at_period_end, family_id, is_closed, closed_at, \
                        created_at, updated_at";

/// Provides CRUD and billing-mirror operations for accounts.
pub struct AccountRepo;

impl AccountRepo {
    /// Insert a new account, returning the created row. The email is lower-cased.
    pub async fn create(pool: &PgPool, input: &CreateAccount) -> Result<Account, sqlx::Error> {
        let query = format!(
            "INSERT INTO accounts
                (email, password_hash, first_name, last_name, verification_token_hash, trial_ends_at)
             VALUES (LOWER($1), $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Account>(&query)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.verification_token_hash)
            .bind(input.trial_ends_at)
            .fetch_one(pool)
            .await
    }

    /// Find an account by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Account>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM accounts WHERE id = $1");
        sqlx::query_as::<_, Account>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an account by email (case-insensitive).
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Account>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM accounts WHERE email = LOWER($1)");
        sqlx::query_as::<_, Account>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Find the account that owns a family, if any.
    pub async fn find_by_family(
        pool: &PgPool,
        family_id: DbId,
    ) -> Result<Option<Account>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM accounts WHERE family_id = $1");
        sqlx::query_as::<_, Account>(&query)
            .bind(family_id)
            .fetch_optional(pool)
            .await
    }

    /// Find an account by the hash of its pending verification token.
    pub async fn find_by_verification_hash(
        pool: &PgPool,
        token_hash: &str,
    ) -> Result<Option<Account>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM accounts WHERE verification_token_hash = $1");
        sqlx::query_as::<_, Account>(&query)
            .bind(token_hash)
            .fetch_optional(pool)
            .await
    }

    /// Find an account by the hash of its password-reset token.
    pub async fn find_by_reset_hash(
        pool: &PgPool,
        token_hash: &str,
    ) -> Result<Option<Account>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM accounts WHERE password_reset_token_hash = $1");
        sqlx::query_as::<_, Account>(&query)
            .bind(token_hash)
            .fetch_optional(pool)
            .await
    }

    /// Mark the account verified and clear the verification token.
    pub async fn mark_verified(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE accounts SET verified = true, verification_token_hash = NULL WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Store a password-reset token hash with its expiry.
    pub async fn set_reset_token(
        pool: &PgPool,
        id: DbId,
        token_hash: &str,
        expires_at: Timestamp,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE accounts SET password_reset_token_hash = $2, password_reset_expires_at = $3
             WHERE id = $1",
        )
        .bind(id)
        .bind(token_hash)
        .bind(expires_at)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Replace the password hash and clear any pending reset token.
    pub async fn update_password(
        pool: &PgPool,
        id: DbId,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE accounts SET
                password_hash = $2,
                password_reset_token_hash = NULL,
                password_reset_expires_at = NULL
             WHERE id = $1",
        )
        .bind(id)
        .bind(password_hash)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Update profile fields. Only non-`None` fields in `input` are applied.
    pub async fn update_profile(
        pool: &PgPool,
        id: DbId,
        input: &UpdateAccountProfile,
    ) -> Result<Option<Account>, sqlx::Error> {
        let query = format!(
            "UPDATE accounts SET
                first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Account>(&query)
            .bind(id)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .fetch_optional(pool)
            .await
    }

    /// Record the Stripe customer id created for this account.
    pub async fn set_stripe_customer(
        pool: &PgPool,
        id: DbId,
        customer_id: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE accounts SET stripe_customer_id = $2 WHERE id = $1")
            .bind(id)
            .bind(customer_id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Mirror plan state from Stripe onto the account row.
    pub async fn apply_billing(
        pool: &PgPool,
        id: DbId,
        mirror: &BillingMirror,
    ) -> Result<Option<Account>, sqlx::Error> {
        let query = format!(
            "UPDATE accounts SET
                plan_type = $2,
                subscription_id = $3,
                plan_expires_at = $4,
                subscription_cancel_at_period_end = $5
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Account>(&query)
            .bind(id)
            .bind(&mirror.plan_type)
            .bind(&mirror.subscription_id)
            .bind(mirror.plan_expires_at)
            .bind(mirror.cancel_at_period_end)
            .fetch_optional(pool)
            .await
    }

    /// Close an account. Returns `true` if it was open.
    pub async fn close(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE accounts SET is_closed = true, closed_at = NOW()
             WHERE id = $1 AND is_closed = false",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
