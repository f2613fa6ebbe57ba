//! Repository for the `bath_logs` table.

use sqlx::PgPool;
use babycontrol_core::types::DbId;

use crate::models::bath_log::{BathLog, CreateBathLog, UpdateBathLog};
use crate::models::log_filter::LogFilter;

const COLUMNS: &str =
    "id, baby_id, caretaker_id, time, soap_used, shampoo_used, notes, created_at, updated_at";

pub struct BathLogRepo;

impl BathLogRepo {
    pub async fn create(
        pool: &PgPool,
        family_id: DbId,
        caretaker_id: Option<DbId>,
        input: &CreateBathLog,
    ) -> Result<BathLog, sqlx::Error> {
        let query = format!(
            "INSERT INTO bath_logs
                (family_id, baby_id, caretaker_id, time, soap_used, shampoo_used, notes)
             VALUES ($1, $2, $3, $4, COALESCE($5, true), COALESCE($6, true), $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BathLog>(&query)
            .bind(family_id)
            .bind(input.baby_id)
            .bind(caretaker_id)
            .bind(input.time)
            .bind(input.soap_used)
            .bind(input.shampoo_used)
            .bind(&input.notes)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        family_id: DbId,
        id: DbId,
    ) -> Result<Option<BathLog>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM bath_logs
             WHERE id = $1 AND family_id = $2 AND deleted_at IS NULL"
        );
        sqlx::query_as::<_, BathLog>(&query)
            .bind(id)
            .bind(family_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool, filter: &LogFilter) -> Result<Vec<BathLog>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM bath_logs
             WHERE family_id = $1 AND deleted_at IS NULL
               AND ($2::BIGINT IS NULL OR baby_id = $2)
               AND ($3::TIMESTAMPTZ IS NULL OR time >= $3)
               AND ($4::TIMESTAMPTZ IS NULL OR time <= $4)
             ORDER BY time DESC
             LIMIT $5"
        );
        sqlx::query_as::<_, BathLog>(&query)
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
        input: &UpdateBathLog,
    ) -> Result<Option<BathLog>, sqlx::Error> {
        let query = format!(
            "UPDATE bath_logs SET
                time = COALESCE($3, time),
                soap_used = COALESCE($4, soap_used),
                shampoo_used = COALESCE($5, shampoo_used),
                notes = COALESCE($6, notes)
             WHERE id = $1 AND family_id = $2 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BathLog>(&query)
            .bind(id)
            .bind(family_id)
            .bind(input.time)
            .bind(input.soap_used)
            .bind(input.shampoo_used)
            .bind(&input.notes)
            .fetch_optional(pool)
            .await
    }

    pub async fn soft_delete(pool: &PgPool, family_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE bath_logs SET deleted_at = NOW()
             WHERE id = $1 AND family_id = $2 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(family_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
