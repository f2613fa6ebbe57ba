//! Repository for the `diaper_logs` table.

use sqlx::PgPool;
use babycontrol_core::types::DbId;

use crate::models::diaper_log::{CreateDiaperLog, DiaperLog, UpdateDiaperLog};
use crate::models::log_filter::LogFilter;

const COLUMNS: &str =
    "id, baby_id, caretaker_id, time, diaper_type, condition, color, blowout, created_at, updated_at";

pub struct DiaperLogRepo;

impl DiaperLogRepo {
    pub async fn create(
        pool: &PgPool,
        family_id: DbId,
        caretaker_id: Option<DbId>,
        input: &CreateDiaperLog,
    ) -> Result<DiaperLog, sqlx::Error> {
        let query = format!(
            "INSERT INTO diaper_logs
                (family_id, baby_id, caretaker_id, time, diaper_type, condition, color, blowout)
             VALUES ($1, $2, $3, $4, $5, $6, $7, COALESCE($8, false))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DiaperLog>(&query)
            .bind(family_id)
            .bind(input.baby_id)
            .bind(caretaker_id)
            .bind(input.time)
            .bind(&input.diaper_type)
            .bind(&input.condition)
            .bind(&input.color)
            .bind(input.blowout)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        family_id: DbId,
        id: DbId,
    ) -> Result<Option<DiaperLog>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM diaper_logs
             WHERE id = $1 AND family_id = $2 AND deleted_at IS NULL"
        );
        sqlx::query_as::<_, DiaperLog>(&query)
            .bind(id)
            .bind(family_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool, filter: &LogFilter) -> Result<Vec<DiaperLog>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM diaper_logs
             WHERE family_id = $1 AND deleted_at IS NULL
               AND ($2::BIGINT IS NULL OR baby_id = $2)
               AND ($3::TIMESTAMPTZ IS NULL OR time >= $3)
               AND ($4::TIMESTAMPTZ IS NULL OR time <= $4)
             ORDER BY time DESC
             LIMIT $5"
        );
        sqlx::query_as::<_, DiaperLog>(&query)
            .bind(filter.family_id)
            .bind(filter.baby_id)
            .bind(filter.start)
            .bind(filter.end)
            .bind(filter.limit)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        family_id: DbId,
        id: DbId,
        input: &UpdateDiaperLog,
    ) -> Result<Option<DiaperLog>, sqlx::Error> {
        let query = format!(
            "UPDATE diaper_logs SET
                time = COALESCE($3, time),
                diaper_type = COALESCE($4, diaper_type),
                condition = COALESCE($5, condition),
                color = COALESCE($6, color),
                blowout = COALESCE($7, blowout)
             WHERE id = $1 AND family_id = $2 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DiaperLog>(&query)
            .bind(id)
            .bind(family_id)
            .bind(input.time)
            .bind(&input.diaper_type)
            .bind(&input.condition)
            .bind(&input.color)
            .bind(input.blowout)
            .fetch_optional(pool)
            .await
    }

    pub async fn soft_delete(pool: &PgPool, family_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE diaper_logs SET deleted_at = NOW()
             WHERE id = $1 AND family_id = $2 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(family_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
