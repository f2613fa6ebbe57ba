//! Transactional family creation.

use sqlx::{PgPool, Postgres, Transaction};
use babycontrol_core::types::DbId;

use crate::models::baby::Baby;
use crate::models::caretaker::Caretaker;
use crate::models::family::Family;
use crate::models::family_setup::{
    CreatedFamily, FamilySetup, SetupCaretaker, SetupOrigin, SetupOutcome,
};
use crate::models::settings::Settings;
use crate::repositories::{baby_repo, caretaker_repo, settings_repo};

pub struct SetupRepo;

impl SetupRepo {
    /// Create a family with its settings, caretakers, and optional first
    /// baby, then consume the setup token or link the account.
    ///
    /// All writes share one transaction. If the token was already consumed
    /// (or expired) or the account already has a family, nothing is
    /// committed and the corresponding [`SetupOutcome`] is returned. A slug
    /// collision surfaces as a unique violation on `uq_families_slug`.
    pub async fn create_family(
        pool: &PgPool,
        input: &FamilySetup,
    ) -> Result<SetupOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let family = sqlx::query_as::<_, Family>(
            "INSERT INTO families (slug, name)
             VALUES ($1, $2)
             RETURNING id, slug, name, is_active, created_at, updated_at",
        )
        .bind(&input.slug)
        .bind(&input.name)
        .fetch_one(&mut *tx)
        .await?;

        let claimed = match input.origin {
            SetupOrigin::Token(token_id) => Self::consume_token(&mut tx, token_id, family.id).await?,
            SetupOrigin::Account(account_id) => {
                Self::link_account(&mut tx, account_id, family.id).await?
            }
        };
        if !claimed {
            tracing::debug!(slug = %input.slug, origin = ?input.origin, "Setup origin already claimed");
            tx.rollback().await?;
            return Ok(match input.origin {
                SetupOrigin::Token(_) => SetupOutcome::TokenSpent,
                SetupOrigin::Account(_) => SetupOutcome::AccountAlreadyLinked,
            });
        }

        let settings_query = format!(
            "INSERT INTO settings (family_id, family_name, security_pin_hash, auth_type)
             VALUES ($1, $2, $3, $4)
             RETURNING {}",
            settings_repo::COLUMNS
        );
        let settings = sqlx::query_as::<_, Settings>(&settings_query)
            .bind(family.id)
            .bind(&input.name)
            .bind(&input.security_pin_hash)
            .bind(&input.auth_type)
            .fetch_one(&mut *tx)
            .await?;

        let mut caretakers = Vec::with_capacity(input.caretakers.len());
        for caretaker in &input.caretakers {
            caretakers.push(Self::insert_caretaker(&mut tx, family.id, caretaker).await?);
        }

        let baby = match &input.baby {
            Some(b) => {
                let baby_query = format!(
                    "INSERT INTO babies
                        (family_id, first_name, last_name, birth_date, gender,
                         feed_warning_time, diaper_warning_time)
                     VALUES ($1, $2, $3, $4, $5, COALESCE($6, '03:00'), COALESCE($7, '02:00'))
                     RETURNING {}",
                    baby_repo::COLUMNS
                );
                Some(
                    sqlx::query_as::<_, Baby>(&baby_query)
                        .bind(family.id)
                        .bind(&b.first_name)
                        .bind(&b.last_name)
                        .bind(b.birth_date)
                        .bind(&b.gender)
                        .bind(&b.feed_warning_time)
                        .bind(&b.diaper_warning_time)
                        .fetch_one(&mut *tx)
                        .await?,
                )
            }
            None => None,
        };

        tx.commit().await?;

        Ok(SetupOutcome::Created(Box::new(CreatedFamily {
            family,
            settings,
            caretakers,
            baby,
        })))
    }

    /// Mark the token used. Returns `false` if it was already used or expired.
    async fn consume_token(
        tx: &mut Transaction<'_, Postgres>,
        token_id: DbId,
        family_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE setup_tokens SET used_at = NOW(), family_id = $2
             WHERE id = $1 AND used_at IS NULL AND expires_at > NOW()",
        )
        .bind(token_id)
        .bind(family_id)
        .execute(&mut **tx)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    /// Link the account to the family. Returns `false` if it already has one.
    async fn link_account(
        tx: &mut Transaction<'_, Postgres>,
        account_id: DbId,
        family_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE accounts SET family_id = $2 WHERE id = $1 AND family_id IS NULL",
        )
        .bind(account_id)
        .bind(family_id)
        .execute(&mut **tx)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn insert_caretaker(
        tx: &mut Transaction<'_, Postgres>,
        family_id: DbId,
        input: &SetupCaretaker,
    ) -> Result<Caretaker, sqlx::Error> {
        let query = format!(
            "INSERT INTO caretakers (family_id, login_id, name, caretaker_type, role, security_pin_hash)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {}",
            caretaker_repo::COLUMNS
        );
        sqlx::query_as::<_, Caretaker>(&query)
            .bind(family_id)
            .bind(&input.login_id)
            .bind(&input.name)
            .bind(&input.caretaker_type)
            .bind(&input.role)
            .bind(&input.security_pin_hash)
            .fetch_one(&mut **tx)
            .await
    }
}
