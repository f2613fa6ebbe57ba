//! Repository for the `settings` table.

use sqlx::PgPool;
use babycontrol_core::types::{DbId, Timestamp};

use crate::models::settings::{Settings, UpdateSettings};

/// Column list shared across queries to avoid repetition.
pub(crate) const COLUMNS: &str = "id, family_id, family_name, security_pin_hash, auth_type, \
                                  default_bottle_unit, default_solid_unit, default_height_unit, \
                                  default_weight_unit, default_temp_unit, failed_login_count, \
                                  locked_until, created_at, updated_at";

pub struct SettingsRepo;

impl SettingsRepo {
    /// Fetch the settings row for a family.
    pub async fn find_by_family(
        pool: &PgPool,
        family_id: DbId,
    ) -> Result<Option<Settings>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM settings WHERE family_id = $1");
        sqlx::query_as::<_, Settings>(&query)
            .bind(family_id)
            .fetch_optional(pool)
            .await
    }

    /// Update a family's settings. Only non-`None` fields in `input` are applied.
    ///
    /// A new `family_name` is written to `families.name` in the same statement.
    pub async fn update(
        pool: &PgPool,
        family_id: DbId,
        input: &UpdateSettings,
    ) -> Result<Option<Settings>, sqlx::Error> {
        let query = format!(
            "WITH updated AS (
                UPDATE settings SET
                    family_name = COALESCE($2, family_name),
                    security_pin_hash = COALESCE($3, security_pin_hash),
                    auth_type = COALESCE($4, auth_type),
                    default_bottle_unit = COALESCE($5, default_bottle_unit),
                    default_solid_unit = COALESCE($6, default_solid_unit),
                    default_height_unit = COALESCE($7, default_height_unit),
                    default_weight_unit = COALESCE($8, default_weight_unit),
                    default_temp_unit = COALESCE($9, default_temp_unit)
                 WHERE family_id = $1
                 RETURNING {COLUMNS}
             ), renamed AS (
                UPDATE families SET name = $2::TEXT
                 WHERE id = $1 AND $2::TEXT IS NOT NULL
             )
             SELECT {COLUMNS} FROM updated"
        );
        sqlx::query_as::<_, Settings>(&query)
            .bind(family_id)
            .bind(&input.family_name)
            .bind(&input.security_pin_hash)
            .bind(&input.auth_type)
            .bind(&input.default_bottle_unit)
            .bind(&input.default_solid_unit)
            .bind(&input.default_height_unit)
            .bind(&input.default_weight_unit)
            .bind(&input.default_temp_unit)
            .fetch_optional(pool)
            .await
    }

    /// Increment the system-PIN failure counter and return the new count.
    pub async fn increment_failed_login(pool: &PgPool, family_id: DbId) -> Result<i32, sqlx::Error> {
        sqlx::query_scalar(
            "UPDATE settings SET failed_login_count = failed_login_count + 1
             WHERE family_id = $1
             RETURNING failed_login_count",
        )
        .bind(family_id)
        .fetch_one(pool)
        .await
    }

    /// Lock system-PIN login for a family until the specified timestamp.
    pub async fn lock(pool: &PgPool, family_id: DbId, until: Timestamp) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE settings SET locked_until = $2 WHERE family_id = $1")
            .bind(family_id)
            .bind(until)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Reset the system-PIN failure counter and clear any lock.
    pub async fn record_successful_login(pool: &PgPool, family_id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE settings SET failed_login_count = 0, locked_until = NULL WHERE family_id = $1",
        )
        .bind(family_id)
        .execute(pool)
        .await?;
        Ok(())
    }
}
