//! Repository for the seeded `units` table.

use sqlx::PgPool;

use crate::models::unit::Unit;

pub struct UnitRepo;

impl UnitRepo {
    /// List all units ordered by abbreviation.
    pub async fn list(pool: &PgPool) -> Result<Vec<Unit>, sqlx::Error> {
        sqlx::query_as::<_, Unit>(
            "SELECT id, unit_abbr, unit_name, activity_types FROM units ORDER BY unit_abbr",
        )
        .fetch_all(pool)
        .await
    }

    /// Find a unit by abbreviation.
    pub async fn find_by_abbr(pool: &PgPool, abbr: &str) -> Result<Option<Unit>, sqlx::Error> {
        sqlx::query_as::<_, Unit>(
            "SELECT id, unit_abbr, unit_name, activity_types FROM units WHERE unit_abbr = $1",
        )
        .bind(abbr)
        .fetch_optional(pool)
        .await
    }
}
