//! Repository for the `feed_logs` table.

use sqlx::PgPool;
use babycontrol_core::types::DbId;

use crate::models::feed_log::{CreateFeedLog, FeedLog, UpdateFeedLog};
use crate::models::log_filter::LogFilter;

const COLUMNS: &str = "id, baby_id, caretaker_id, time, feed_type, amount, unit_abbr, side, \
                       food, feed_duration_seconds, created_at, updated_at";

/// Provides family-scoped CRUD for feed logs.
pub struct FeedLogRepo;

impl FeedLogRepo {
    pub async fn create(
        pool: &PgPool,
        family_id: DbId,
        caretaker_id: Option<DbId>,
        input: &CreateFeedLog,
    ) -> Result<FeedLog, sqlx::Error> {
        let query = format!(
            "INSERT INTO feed_logs
                (family_id, baby_id, caretaker_id, time, feed_type, amount, unit_abbr, side,
                 food, feed_duration_seconds)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, FeedLog>(&query)
            .bind(family_id)
            .bind(input.baby_id)
            .bind(caretaker_id)
            .bind(input.time)
            .bind(&input.feed_type)
            .bind(input.amount)
            .bind(&input.unit_abbr)
            .bind(&input.side)
            .bind(&input.food)
            .bind(input.feed_duration_seconds)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        family_id: DbId,
        id: DbId,
    ) -> Result<Option<FeedLog>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM feed_logs
             WHERE id = $1 AND family_id = $2 AND deleted_at IS NULL"
        );
        sqlx::query_as::<_, FeedLog>(&query)
            .bind(id)
            .bind(family_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool, filter: &LogFilter) -> Result<Vec<FeedLog>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM feed_logs
             WHERE family_id = $1 AND deleted_at IS NULL
               AND ($2::BIGINT IS NULL OR baby_id = $2)
               AND ($3::TIMESTAMPTZ IS NULL OR time >= $3)
               AND ($4::TIMESTAMPTZ IS NULL OR time <= $4)
             ORDER BY time DESC
             LIMIT $5"
        );
        sqlx::query_as::<_, FeedLog>(&query)
            .bind(filter.family_id)
            .bind(filter.baby_id)
            .bind(filter.start)
            .bind(filter.end)
            .bind(filter.limit)
            .fetch_all(pool)
            .await
    }

    /// Most recent feed for a baby, used for the feed warning indicator.
    pub async fn latest_for_baby(
        pool: &PgPool,
        family_id: DbId,
        baby_id: DbId,
    ) -> Result<Option<FeedLog>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM feed_logs
             WHERE family_id = $1 AND baby_id = $2 AND deleted_at IS NULL
             ORDER BY time DESC
             LIMIT 1"
        );
        sqlx::query_as::<_, FeedLog>(&query)
            .bind(family_id)
            .bind(baby_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        family_id: DbId,
        id: DbId,
        input: &UpdateFeedLog,
    ) -> Result<Option<FeedLog>, sqlx::Error> {
        let query = format!(
            "UPDATE feed_logs SET
                time = COALESCE($3, time),
                feed_type = COALESCE($4, feed_type),
                amount = COALESCE($5, amount),
                unit_abbr = COALESCE($6, unit_abbr),
                side = COALESCE($7, side),
                food = COALESCE($8, food),
                feed_duration_seconds = COALESCE($9, feed_duration_seconds)
             WHERE id = $1 AND family_id = $2 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, FeedLog>(&query)
            .bind(id)
            .bind(family_id)
            .bind(input.time)
            .bind(&input.feed_type)
            .bind(input.amount)
            .bind(&input.unit_abbr)
            .bind(&input.side)
            .bind(&input.food)
            .bind(input.feed_duration_seconds)
            .fetch_optional(pool)
            .await
    }

    pub async fn soft_delete(pool: &PgPool, family_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE feed_logs SET deleted_at = NOW()
             WHERE id = $1 AND family_id = $2 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(family_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
