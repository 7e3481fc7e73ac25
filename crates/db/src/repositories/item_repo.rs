//! Repository for the `items` table.

use ecoleta_core::types::DbId;
use sqlx::PgPool;

use crate::models::item::{Item, ItemTitle};

/// Column list for `items` queries.
const COLUMNS: &str = "id, image, title";

/// Read access to the item catalog. Items are seeded by migrations only.
pub struct ItemRepo;

impl ItemRepo {
    /// List all items ordered by id.
    pub async fn list(pool: &PgPool) -> Result<Vec<Item>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM items ORDER BY id");
        sqlx::query_as::<_, Item>(&query).fetch_all(pool).await
    }

    /// Titles of the items accepted by a point, ordered by item id.
    pub async fn titles_for_point(
        pool: &PgPool,
        point_id: DbId,
    ) -> Result<Vec<ItemTitle>, sqlx::Error> {
        sqlx::query_as::<_, ItemTitle>(
            "SELECT i.title \
             FROM items i \
             JOIN point_items pi ON pi.item_id = i.id \
             WHERE pi.point_id = $1 \
             ORDER BY i.id",
        )
        .bind(point_id)
        .fetch_all(pool)
        .await
    }
}
