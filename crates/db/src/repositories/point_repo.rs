//! Repository for the `points` and `point_items` tables.

use ecoleta_core::point::{dedup_item_ids, DEFAULT_POINT_IMAGE};
use ecoleta_core::types::DbId;
use sqlx::PgPool;

use crate::models::point::{CreatePoint, Point, PointDetail, PointFilter};
use crate::repositories::ItemRepo;

/// Column list for `points` queries.
const COLUMNS: &str = "id, image, name, email, whatsapp, latitude, longitude, city, uf";

/// Column list for `points` aliased as `p` (used in JOIN queries).
const P_COLUMNS: &str = "p.id, p.image, p.name, p.email, p.whatsapp, \
    p.latitude, p.longitude, p.city, p.uf";

/// Provides creation and lookup of collection points and their item associations.
pub struct PointRepo;

impl PointRepo {
    /// Insert a new point with the default image, then its item associations.
    ///
    /// `city` and `uf` are stored trimmed, matching how filters are parsed.
    ///
    /// Both inserts run in one transaction. If the association insert fails
    /// (e.g. an unknown item id), the point row is rolled back as well.
    pub async fn create(pool: &PgPool, input: &CreatePoint) -> Result<Point, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let insert_query = format!(
            "INSERT INTO points \
                (image, name, email, whatsapp, latitude, longitude, city, uf) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {COLUMNS}"
        );
        let point = sqlx::query_as::<_, Point>(&insert_query)
            .bind(DEFAULT_POINT_IMAGE)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.whatsapp)
            .bind(input.latitude)
            .bind(input.longitude)
            .bind(input.city.trim())
            .bind(input.uf.trim())
            .fetch_one(&mut *tx)
            .await?;

        let item_ids = dedup_item_ids(&input.items);
        if let Err(err) = Self::insert_items_inner(&mut tx, point.id, &item_ids).await {
            tracing::warn!(
                point_id = point.id,
                error = %err,
                "Point item insert failed, rolling back point",
            );
            tx.rollback().await?;
            return Err(err);
        }

        tx.commit().await?;
        Ok(point)
    }

    /// Find a point by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Point>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM points WHERE id = $1");
        sqlx::query_as::<_, Point>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a point by ID, enriched with the titles of its items.
    pub async fn find_with_items(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<PointDetail>, sqlx::Error> {
        match Self::find_by_id(pool, id).await? {
            Some(point) => {
                let items = ItemRepo::titles_for_point(pool, point.id).await?;
                Ok(Some(PointDetail { point, items }))
            }
            None => Ok(None),
        }
    }

    /// Points in the given city/uf accepting at least one of the given items.
    ///
    /// A point matching several of the requested items is returned once.
    pub async fn filter(pool: &PgPool, filter: &PointFilter) -> Result<Vec<Point>, sqlx::Error> {
        let query = format!(
            "SELECT DISTINCT {P_COLUMNS} \
             FROM points p \
             JOIN point_items pi ON pi.point_id = p.id \
             WHERE pi.item_id = ANY($1) \
               AND p.city = $2 \
               AND p.uf = $3 \
             ORDER BY p.id"
        );
        sqlx::query_as::<_, Point>(&query)
            .bind(&filter.item_ids)
            .bind(&filter.city)
            .bind(&filter.uf)
            .fetch_all(pool)
            .await
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    /// Insert all `(point_id, item_id)` rows in a single statement.
    async fn insert_items_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        point_id: DbId,
        item_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO point_items (point_id, item_id) \
             SELECT $1::BIGINT, UNNEST($2::BIGINT[])",
        )
        .bind(point_id)
        .bind(item_ids)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }
}
