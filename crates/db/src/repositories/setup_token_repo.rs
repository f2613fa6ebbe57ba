//! Repository for the `setup_tokens` table.

use sqlx::PgPool;
use babycontrol_core::types::DbId;

use crate::models::setup_token::{CreateSetupToken, SetupToken};

const COLUMNS: &str =
    "id, token_hash, password_hash, expires_at, used_at, created_by, family_id, created_at";

pub struct SetupTokenRepo;

impl SetupTokenRepo {
    /// Insert a new setup token.
    pub async fn create(
        pool: &PgPool,
        input: &CreateSetupToken,
    ) -> Result<SetupToken, sqlx::Error> {
        let query = format!(
            "INSERT INTO setup_tokens (token_hash, password_hash, expires_at, created_by)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SetupToken>(&query)
            .bind(&input.token_hash)
            .bind(&input.password_hash)
            .bind(input.expires_at)
            .bind(&input.created_by)
            .fetch_one(pool)
            .await
    }

    /// Find a setup token by the hash of its plaintext.
    pub async fn find_by_hash(
        pool: &PgPool,
        token_hash: &str,
    ) -> Result<Option<SetupToken>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM setup_tokens WHERE token_hash = $1");
        sqlx::query_as::<_, SetupToken>(&query)
            .bind(token_hash)
            .fetch_optional(pool)
            .await
    }

    /// Find a setup token by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<SetupToken>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM setup_tokens WHERE id = $1");
        sqlx::query_as::<_, SetupToken>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
