//! Repository for the `sleep_logs` table.

use sqlx::PgPool;
use babycontrol_core::types::DbId;

use crate::models::log_filter::LogFilter;
use crate::models::sleep_log::{CreateSleepLog, SleepLog, UpdateSleepLog};

const COLUMNS: &str = "id, baby_id, caretaker_id, start_time, end_time, duration_minutes, \
                       sleep_type, location, quality, created_at, updated_at";

/// Provides family-scoped CRUD for sleep logs.
pub struct SleepLogRepo;

impl SleepLogRepo {
    /// Insert a sleep log. `duration_minutes` is computed by the caller.
    pub async fn create(
        pool: &PgPool,
        family_id: DbId,
        caretaker_id: Option<DbId>,
        input: &CreateSleepLog,
        duration_minutes: Option<i32>,
    ) -> Result<SleepLog, sqlx::Error> {
        let query = format!(
            "INSERT INTO sleep_logs
                (family_id, baby_id, caretaker_id, start_time, end_time, duration_minutes,
                 sleep_type, location, quality)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SleepLog>(&query)
            .bind(family_id)
            .bind(input.baby_id)
            .bind(caretaker_id)
            .bind(input.start_time)
            .bind(input.end_time)
            .bind(duration_minutes)
            .bind(&input.sleep_type)
            .bind(&input.location)
            .bind(&input.quality)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        family_id: DbId,
        id: DbId,
    ) -> Result<Option<SleepLog>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM sleep_logs
             WHERE id = $1 AND family_id = $2 AND deleted_at IS NULL"
        );
        sqlx::query_as::<_, SleepLog>(&query)
            .bind(id)
            .bind(family_id)
            .fetch_optional(pool)
            .await
    }

    /// List sleep logs newest first, filtered by baby and start-time window.
    pub async fn list(pool: &PgPool, filter: &LogFilter) -> Result<Vec<SleepLog>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM sleep_logs
             WHERE family_id = $1 AND deleted_at IS NULL
               AND ($2::BIGINT IS NULL OR baby_id = $2)
               AND ($3::TIMESTAMPTZ IS NULL OR start_time >= $3)
               AND ($4::TIMESTAMPTZ IS NULL OR start_time <= $4)
             ORDER BY start_time DESC
             LIMIT $5"
        );
        sqlx::query_as::<_, SleepLog>(&query)
            .bind(filter.family_id)
            .bind(filter.baby_id)
            .bind(filter.start)
            .bind(filter.end)
            .bind(filter.limit)
            .fetch_all(pool)
            .await
    }

    /// Update a sleep log. `duration_minutes` is recomputed by the caller
    /// from the merged start/end and written as-is.
    pub async fn update(
        pool: &PgPool,
        family_id: DbId,
        id: DbId,
        input: &UpdateSleepLog,
        duration_minutes: Option<i32>,
    ) -> Result<Option<SleepLog>, sqlx::Error> {
        let query = format!(
            "UPDATE sleep_logs SET
                start_time = COALESCE($3, start_time),
                end_time = COALESCE($4, end_time),
                sleep_type = COALESCE($5, sleep_type),
                location = COALESCE($6, location),
                quality = COALESCE($7, quality),
                duration_minutes = $8
             WHERE id = $1 AND family_id = $2 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SleepLog>(&query)
            .bind(id)
            .bind(family_id)
            .bind(input.start_time)
            .bind(input.end_time)
            .bind(&input.sleep_type)
            .bind(&input.location)
            .bind(&input.quality)
            .bind(duration_minutes)
            .fetch_optional(pool)
            .await
    }

    pub async fn soft_delete(pool: &PgPool, family_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE sleep_logs SET deleted_at = NOW()
             WHERE id = $1 AND family_id = $2 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(family_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
