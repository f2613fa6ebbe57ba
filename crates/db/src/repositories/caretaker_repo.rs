//! Repository for the `caretakers` table.

use sqlx::PgPool;
use babycontrol_core::roles::ROLE_ADMIN;
use babycontrol_core::types::{DbId, Timestamp};

use crate::models::caretaker::{Caretaker, CreateCaretaker, UpdateCaretaker};

/// Column list shared across queries to avoid repetition.
pub(crate) const COLUMNS: &str = "id, family_id, login_id, name, caretaker_type, role, \
                                  security_pin_hash, inactive, failed_login_count, locked_until, \
                                  deleted_at, created_at, updated_at";

/// Provides CRUD and login bookkeeping for caretakers. All lookups are
/// scoped to a family and exclude soft-deleted rows.
pub struct CaretakerRepo;

impl CaretakerRepo {
    /// Insert a new caretaker, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateCaretaker) -> Result<Caretaker, sqlx::Error> {
        let query = format!(
            "INSERT INTO caretakers (family_id, login_id, name, caretaker_type, role, security_pin_hash)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Caretaker>(&query)
            .bind(input.family_id)
            .bind(&input.login_id)
            .bind(&input.name)
            .bind(&input.caretaker_type)
            .bind(&input.role)
            .bind(&input.security_pin_hash)
            .fetch_one(pool)
            .await
    }

    /// Find a caretaker by ID within a family.
    pub async fn find_by_id(
        pool: &PgPool,
        family_id: DbId,
        id: DbId,
    ) -> Result<Option<Caretaker>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM caretakers
             WHERE id = $1 AND family_id = $2 AND deleted_at IS NULL"
        );
        sqlx::query_as::<_, Caretaker>(&query)
            .bind(id)
            .bind(family_id)
            .fetch_optional(pool)
            .await
    }

    /// Find a caretaker by login id within a family.
    pub async fn find_by_login_id(
        pool: &PgPool,
        family_id: DbId,
        login_id: &str,
    ) -> Result<Option<Caretaker>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM caretakers
             WHERE family_id = $1 AND login_id = $2 AND deleted_at IS NULL"
        );
        sqlx::query_as::<_, Caretaker>(&query)
            .bind(family_id)
            .bind(login_id)
            .fetch_optional(pool)
            .await
    }

    /// List a family's caretakers ordered by login id.
    pub async fn list_by_family(
        pool: &PgPool,
        family_id: DbId,
    ) -> Result<Vec<Caretaker>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM caretakers
             WHERE family_id = $1 AND deleted_at IS NULL
             ORDER BY login_id"
        );
        sqlx::query_as::<_, Caretaker>(&query)
            .bind(family_id)
            .fetch_all(pool)
            .await
    }

    /// Count active (not inactive, not deleted) caretakers in a family.
    pub async fn count_active(pool: &PgPool, family_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM caretakers
             WHERE family_id = $1 AND inactive = false AND deleted_at IS NULL",
        )
        .bind(family_id)
        .fetch_one(pool)
        .await
    }

    /// Count active admins in a family, optionally excluding one caretaker.
    pub async fn count_active_admins(
        pool: &PgPool,
        family_id: DbId,
        excluding: Option<DbId>,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM caretakers
             WHERE family_id = $1 AND role = $2 AND inactive = false AND deleted_at IS NULL
               AND ($3::BIGINT IS NULL OR id <> $3)",
        )
        .bind(family_id)
        .bind(ROLE_ADMIN)
        .bind(excluding)
        .fetch_one(pool)
        .await
    }

    /// Update a caretaker. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        family_id: DbId,
        id: DbId,
        input: &UpdateCaretaker,
    ) -> Result<Option<Caretaker>, sqlx::Error> {
        let query = format!(
            "UPDATE caretakers SET
                login_id = COALESCE($3, login_id),
                name = COALESCE($4, name),
                caretaker_type = COALESCE($5, caretaker_type),
                role = COALESCE($6, role),
                security_pin_hash = COALESCE($7, security_pin_hash),
                inactive = COALESCE($8, inactive)
             WHERE id = $1 AND family_id = $2 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Caretaker>(&query)
            .bind(id)
            .bind(family_id)
            .bind(&input.login_id)
            .bind(&input.name)
            .bind(&input.caretaker_type)
            .bind(&input.role)
            .bind(&input.security_pin_hash)
            .bind(input.inactive)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a caretaker. Returns `true` if a row was marked.
    pub async fn soft_delete(pool: &PgPool, family_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE caretakers SET deleted_at = NOW()
             WHERE id = $1 AND family_id = $2 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(family_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Increment the failed login counter by 1.
    pub async fn increment_failed_login(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE caretakers SET failed_login_count = failed_login_count + 1 WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Lock a caretaker until the specified timestamp.
    pub async fn lock(pool: &PgPool, id: DbId, until: Timestamp) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE caretakers SET locked_until = $2 WHERE id = $1")
            .bind(id)
            .bind(until)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Reset `failed_login_count` and clear `locked_until` after a good login.
    pub async fn record_successful_login(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE caretakers SET failed_login_count = 0, locked_until = NULL WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(())
    }
}
