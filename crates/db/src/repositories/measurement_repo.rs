//! Repository for the `measurements` table.

use sqlx::PgPool;
use babycontrol_core::types::DbId;

use crate::models::log_filter::LogFilter;
use crate::models::measurement::{CreateMeasurement, Measurement, UpdateMeasurement};

const COLUMNS: &str = "id, baby_id, caretaker_id, date, measurement_type, value, unit_abbr, \
                       notes, created_at, updated_at";

pub struct MeasurementRepo;

impl MeasurementRepo {
    pub async fn create(
        pool: &PgPool,
        family_id: DbId,
        caretaker_id: Option<DbId>,
        input: &CreateMeasurement,
    ) -> Result<Measurement, sqlx::Error> {
        let query = format!(
            "INSERT INTO measurements
                (family_id, baby_id, caretaker_id, date, measurement_type, value, unit_abbr, notes)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Measurement>(&query)
            .bind(family_id)
            .bind(input.baby_id)
            .bind(caretaker_id)
            .bind(input.date)
            .bind(&input.measurement_type)
            .bind(input.value)
            .bind(&input.unit_abbr)
            .bind(&input.notes)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        family_id: DbId,
        id: DbId,
    ) -> Result<Option<Measurement>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM measurements
             WHERE id = $1 AND family_id = $2 AND deleted_at IS NULL"
        );
        sqlx::query_as::<_, Measurement>(&query)
            .bind(id)
            .bind(family_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool, filter: &LogFilter) -> Result<Vec<Measurement>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM measurements
             WHERE family_id = $1 AND deleted_at IS NULL
               AND ($2::BIGINT IS NULL OR baby_id = $2)
               AND ($3::TIMESTAMPTZ IS NULL OR date >= $3)
               AND ($4::TIMESTAMPTZ IS NULL OR date <= $4)
             ORDER BY date DESC
             LIMIT $5"
        );
        sqlx::query_as::<_, Measurement>(&query)
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
        input: &UpdateMeasurement,
    ) -> Result<Option<Measurement>, sqlx::Error> {
        let query = format!(
            "UPDATE measurements SET
                date = COALESCE($3, date),
                measurement_type = COALESCE($4, measurement_type),
                value = COALESCE($5, value),
                unit_abbr = COALESCE($6, unit_abbr),
                notes = COALESCE($7, notes)
             WHERE id = $1 AND family_id = $2 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Measurement>(&query)
            .bind(id)
            .bind(family_id)
            .bind(input.date)
            .bind(&input.measurement_type)
            .bind(input.value)
            .bind(&input.unit_abbr)
            .bind(&input.notes)
            .fetch_optional(pool)
            .await
    }

    pub async fn soft_delete(pool: &PgPool, family_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE measurements SET deleted_at = NOW()
             WHERE id = $1 AND family_id = $2 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(family_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
