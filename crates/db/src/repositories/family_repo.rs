//! Repository for the `families` table.

use sqlx::PgPool;
use babycontrol_core::types::DbId;

use crate::models::family::{Family, FamilyOverview, UpdateFamily};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, slug, name, is_active, created_at, updated_at";

/// Provides lookup and update operations for families.
///
/// Families are created only through [`crate::repositories::SetupRepo`],
/// which writes the family, its settings, and its caretakers together.
pub struct FamilyRepo;

impl FamilyRepo {
    /// Find a family by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Family>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM families WHERE id = $1");
        sqlx::query_as::<_, Family>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a family by slug.
    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Family>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM families WHERE slug = $1");
        sqlx::query_as::<_, Family>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// Whether any family already uses `slug`.
    pub async fn slug_exists(pool: &PgPool, slug: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM families WHERE slug = $1)")
            .bind(slug)
            .fetch_one(pool)
            .await
    }

    /// List all families with baby/caretaker counts and owner email.
    pub async fn list_overview(pool: &PgPool) -> Result<Vec<FamilyOverview>, sqlx::Error> {
        sqlx::query_as::<_, FamilyOverview>(
            "SELECT f.id, f.slug, f.name, f.is_active, f.created_at,
                    (SELECT COUNT(*) FROM babies b
                      WHERE b.family_id = f.id AND b.deleted_at IS NULL) AS baby_count,
                    (SELECT COUNT(*) FROM caretakers c
                      WHERE c.family_id = f.id AND c.deleted_at IS NULL) AS caretaker_count,
                    a.email AS account_email
             FROM families f
             LEFT JOIN accounts a ON a.family_id = f.id
             ORDER BY f.created_at DESC",
        )
        .fetch_all(pool)
        .await
    }

    /// Update a family. Only non-`None` fields in `input` are applied.
    /// A new name is also written to `settings.family_name`.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateFamily,
    ) -> Result<Option<Family>, sqlx::Error> {
        let query = format!(
            "WITH updated AS (
                UPDATE families SET
                    slug = COALESCE($2, slug),
                    name = COALESCE($3, name),
                    is_active = COALESCE($4, is_active)
                 WHERE id = $1
                 RETURNING {COLUMNS}
             ), renamed AS (
                UPDATE settings SET family_name = $3::TEXT
                 WHERE family_id = $1 AND $3::TEXT IS NOT NULL
             )
             SELECT {COLUMNS} FROM updated"
        );
        sqlx::query_as::<_, Family>(&query)
            .bind(id)
            .bind(&input.slug)
            .bind(&input.name)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }
}
