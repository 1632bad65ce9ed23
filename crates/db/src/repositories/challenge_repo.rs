//! Repository for the `challenge_definitions` table.
//!
//! Read-only: the catalog is maintained via migrations, never mutated by
//! the engine at runtime.

use sqlx::PgPool;
use stride_core::types::DbId;

use crate::models::challenge::ChallengeDefinition;

/// Column list for `challenge_definitions` queries.
const COLUMNS: &str = "\
    id, slug, title, description, duration_days, difficulty, category, \
    discount_percent, product_ids, is_active, created_at, updated_at";

/// Read access to the challenge catalog.
pub struct ChallengeRepo;

impl ChallengeRepo {
    /// List all active challenges in catalog order.
    pub async fn list_active(pool: &PgPool) -> Result<Vec<ChallengeDefinition>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM challenge_definitions \
             WHERE is_active = TRUE \
             ORDER BY category, slug"
        );
        sqlx::query_as::<_, ChallengeDefinition>(&query)
            .fetch_all(pool)
            .await
    }

    /// Look up a challenge by its slug.
    pub async fn find_by_slug(
        pool: &PgPool,
        slug: &str,
    ) -> Result<Option<ChallengeDefinition>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM challenge_definitions WHERE slug = $1");
        sqlx::query_as::<_, ChallengeDefinition>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// Look up a challenge by id.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ChallengeDefinition>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM challenge_definitions WHERE id = $1");
        sqlx::query_as::<_, ChallengeDefinition>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
