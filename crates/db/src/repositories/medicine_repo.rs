//! Repositories for the `medicines` catalogue and `medicine_logs`.

use sqlx::PgPool;
use babycontrol_core::types::DbId;

use crate::models::log_filter::LogFilter;
use crate::models::medicine::{
    CreateMedicine, CreateMedicineLog, Medicine, MedicineLog, UpdateMedicine, UpdateMedicineLog,
};

const MEDICINE_COLUMNS: &str = "id, family_id, name, typical_dose, unit_abbr, dose_min_time, \
                                notes, active, created_at, updated_at";

const LOG_COLUMNS: &str = "id, baby_id, caretaker_id, medicine_id, time, dose_amount, unit_abbr, \
                           notes, created_at, updated_at";

/// Family medicine catalogue.
pub struct MedicineRepo;

impl MedicineRepo {
    pub async fn create(
        pool: &PgPool,
        family_id: DbId,
        input: &CreateMedicine,
    ) -> Result<Medicine, sqlx::Error> {
        let query = format!(
            "INSERT INTO medicines (family_id, name, typical_dose, unit_abbr, dose_min_time, notes)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {MEDICINE_COLUMNS}"
        );
        sqlx::query_as::<_, Medicine>(&query)
            .bind(family_id)
            .bind(&input.name)
            .bind(input.typical_dose)
            .bind(&input.unit_abbr)
            .bind(&input.dose_min_time)
            .bind(&input.notes)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        family_id: DbId,
        id: DbId,
    ) -> Result<Option<Medicine>, sqlx::Error> {
        let query = format!(
            "SELECT {MEDICINE_COLUMNS} FROM medicines
             WHERE id = $1 AND family_id = $2 AND deleted_at IS NULL"
        );
        sqlx::query_as::<_, Medicine>(&query)
            .bind(id)
            .bind(family_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(
        pool: &PgPool,
        family_id: DbId,
        include_inactive: bool,
    ) -> Result<Vec<Medicine>, sqlx::Error> {
        let query = format!(
            "SELECT {MEDICINE_COLUMNS} FROM medicines
             WHERE family_id = $1 AND deleted_at IS NULL AND ($2 OR active)
             ORDER BY name"
        );
        sqlx::query_as::<_, Medicine>(&query)
            .bind(family_id)
            .bind(include_inactive)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        family_id: DbId,
        id: DbId,
        input: &UpdateMedicine,
    ) -> Result<Option<Medicine>, sqlx::Error> {
        let query = format!(
            "UPDATE medicines SET
                name = COALESCE($3, name),
                typical_dose = COALESCE($4, typical_dose),
                unit_abbr = COALESCE($5, unit_abbr),
                dose_min_time = COALESCE($6, dose_min_time),
                notes = COALESCE($7, notes),
                active = COALESCE($8, active)
             WHERE id = $1 AND family_id = $2 AND deleted_at IS NULL
             RETURNING {MEDICINE_COLUMNS}"
        );
        sqlx::query_as::<_, Medicine>(&query)
            .bind(id)
            .bind(family_id)
            .bind(&input.name)
            .bind(input.typical_dose)
            .bind(&input.unit_abbr)
            .bind(&input.dose_min_time)
            .bind(&input.notes)
            .bind(input.active)
            .fetch_optional(pool)
            .await
    }

    pub async fn soft_delete(pool: &PgPool, family_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE medicines SET deleted_at = NOW()
             WHERE id = $1 AND family_id = $2 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(family_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Administered doses.
pub struct MedicineLogRepo;

impl MedicineLogRepo {
    pub async fn create(
        pool: &PgPool,
        family_id: DbId,
        caretaker_id: Option<DbId>,
        input: &CreateMedicineLog,
    ) -> Result<MedicineLog, sqlx::Error> {
        let query = format!(
            "INSERT INTO medicine_logs
                (family_id, baby_id, caretaker_id, medicine_id, time, dose_amount, unit_abbr, notes)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {LOG_COLUMNS}"
        );
        sqlx::query_as::<_, MedicineLog>(&query)
            .bind(family_id)
            .bind(input.baby_id)
            .bind(caretaker_id)
            .bind(input.medicine_id)
            .bind(input.time)
            .bind(input.dose_amount)
            .bind(&input.unit_abbr)
            .bind(&input.notes)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        family_id: DbId,
        id: DbId,
    ) -> Result<Option<MedicineLog>, sqlx::Error> {
        let query = format!(
            "SELECT {LOG_COLUMNS} FROM medicine_logs
             WHERE id = $1 AND family_id = $2 AND deleted_at IS NULL"
        );
        sqlx::query_as::<_, MedicineLog>(&query)
            .bind(id)
            .bind(family_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool, filter: &LogFilter) -> Result<Vec<MedicineLog>, sqlx::Error> {
        let query = format!(
            "SELECT {LOG_COLUMNS} FROM medicine_logs
             WHERE family_id = $1 AND deleted_at IS NULL
               AND ($2::BIGINT IS NULL OR baby_id = $2)
               AND ($3::TIMESTAMPTZ IS NULL OR time >= $3)
               AND ($4::TIMESTAMPTZ IS NULL OR time <= $4)
             ORDER BY time DESC
             LIMIT $5"
        );
        sqlx::query_as::<_, MedicineLog>(&query)
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
        input: &UpdateMedicineLog,
    ) -> Result<Option<MedicineLog>, sqlx::Error> {
        let query = format!(
            "UPDATE medicine_logs SET
                time = COALESCE($3, time),
                dose_amount = COALESCE($4, dose_amount),
                unit_abbr = COALESCE($5, unit_abbr),
                notes = COALESCE($6, notes)
             WHERE id = $1 AND family_id = $2 AND deleted_at IS NULL
             RETURNING {LOG_COLUMNS}"
        );
        sqlx::query_as::<_, MedicineLog>(&query)
            .bind(id)
            .bind(family_id)
            .bind(input.time)
            .bind(input.dose_amount)
            .bind(&input.unit_abbr)
            .bind(&input.notes)
            .fetch_optional(pool)
            .await
    }

    pub async fn soft_delete(pool: &PgPool, family_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE medicine_logs SET deleted_at = NOW()
             WHERE id = $1 AND family_id = $2 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(family_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
