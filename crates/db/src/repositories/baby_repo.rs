//! Repository for the `babies` table.

use sqlx::PgPool;
use babycontrol_core::types::DbId;

use crate::models::baby::{Baby, CreateBaby, UpdateBaby};

/// Column list shared across queries to avoid repetition.
pub(crate) const COLUMNS: &str = "id, family_id, first_name, last_name, birth_date, gender, \
                                  inactive, feed_warning_time, diaper_warning_time, \
                                  created_at, updated_at";

pub struct BabyRepo;

impl BabyRepo {
    /// Insert a new baby into a family.
    pub async fn create(
        pool: &PgPool,
        family_id: DbId,
        input: &CreateBaby,
    ) -> Result<Baby, sqlx::Error> {
        let query = format!(
            "INSERT INTO babies
                (family_id, first_name, last_name, birth_date, gender,
                 feed_warning_time, diaper_warning_time)
             VALUES ($1, $2, $3, $4, $5, COALESCE($6, '03:00'), COALESCE($7, '02:00'))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Baby>(&query)
            .bind(family_id)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(input.birth_date)
            .bind(&input.gender)
            .bind(&input.feed_warning_time)
            .bind(&input.diaper_warning_time)
            .fetch_one(pool)
            .await
    }

    /// Find a baby by ID within a family. Excludes soft-deleted rows.
    pub async fn find_by_id(
        pool: &PgPool,
        family_id: DbId,
        id: DbId,
    ) -> Result<Option<Baby>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM babies
             WHERE id = $1 AND family_id = $2 AND deleted_at IS NULL"
        );
        sqlx::query_as::<_, Baby>(&query)
            .bind(id)
            .bind(family_id)
            .fetch_optional(pool)
            .await
    }

    /// Whether a live baby with this ID belongs to the family.
    pub async fn belongs_to_family(
        pool: &PgPool,
        family_id: DbId,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(
                SELECT 1 FROM babies WHERE id = $1 AND family_id = $2 AND deleted_at IS NULL)",
        )
        .bind(id)
        .bind(family_id)
        .fetch_one(pool)
        .await
    }

    /// List a family's babies, oldest first.
    pub async fn list_by_family(
        pool: &PgPool,
        family_id: DbId,
        include_inactive: bool,
    ) -> Result<Vec<Baby>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM babies
             WHERE family_id = $1 AND deleted_at IS NULL AND ($2 OR inactive = false)
             ORDER BY birth_date, id"
        );
        sqlx::query_as::<_, Baby>(&query)
            .bind(family_id)
            .bind(include_inactive)
            .fetch_all(pool)
            .await
    }

    /// Update a baby. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        family_id: DbId,
        id: DbId,
        input: &UpdateBaby,
    ) -> Result<Option<Baby>, sqlx::Error> {
        let query = format!(
            "UPDATE babies SET
                first_name = COALESCE($3, first_name),
                last_name = COALESCE($4, last_name),
                birth_date = COALESCE($5, birth_date),
                gender = COALESCE($6, gender),
                inactive = COALESCE($7, inactive),
                feed_warning_time = COALESCE($8, feed_warning_time),
                diaper_warning_time = COALESCE($9, diaper_warning_time)
             WHERE id = $1 AND family_id = $2 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Baby>(&query)
            .bind(id)
            .bind(family_id)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(input.birth_date)
            .bind(&input.gender)
            .bind(input.inactive)
            .bind(&input.feed_warning_time)
            .bind(&input.diaper_warning_time)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a baby. Returns `true` if a row was marked.
    pub async fn soft_delete(pool: &PgPool, family_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE babies SET deleted_at = NOW()
             WHERE id = $1 AND family_id = $2 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(family_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
