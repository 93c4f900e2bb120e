//! Repository for collection product links.

use maison_core::types::DbId;
use sqlx::PgPool;

use crate::models::product_link::CollectionProduct;

/// Column list for `collection_products` queries.
const COLUMNS: &str = "id, collection_id, product_id, sort_order, highlighted";

/// Provides data access for collection product links.
pub struct ProductLinkRepo;

impl ProductLinkRepo {
    /// Link a product to a collection, appended at the end of the
    /// order. Idempotent: an existing (collection, product) pair is
    /// returned unchanged, sort order included.
    pub async fn add(
        pool: &PgPool,
        collection_id: DbId,
        product_id: DbId,
    ) -> Result<CollectionProduct, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO collection_products (collection_id, product_id, sort_order)
             VALUES ($1, $2,
                     (SELECT COALESCE(MAX(sort_order), 0) + 1
                      FROM collection_products WHERE collection_id = $1))
             ON CONFLICT (collection_id, product_id) DO NOTHING
             RETURNING {COLUMNS}"
        );
        let inserted = sqlx::query_as::<_, CollectionProduct>(&query)
            .bind(collection_id)
            .bind(product_id)
            .fetch_optional(&mut *tx)
            .await?;

        let link = match inserted {
            Some(link) => link,
            None => {
                // Pair already exists; no-op.
                let query = format!(
                    "SELECT {COLUMNS} FROM collection_products
                     WHERE collection_id = $1 AND product_id = $2"
                );
                sqlx::query_as::<_, CollectionProduct>(&query)
                    .bind(collection_id)
                    .bind(product_id)
                    .fetch_one(&mut *tx)
                    .await?
            }
        };

        tx.commit().await?;
        Ok(link)
    }

    /// Unlink a product from a collection.
    pub async fn remove(
        pool: &PgPool,
        collection_id: DbId,
        product_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM collection_products
             WHERE collection_id = $1 AND product_id = $2",
        )
        .bind(collection_id)
        .bind(product_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Flip a link's highlight flag. Returns the updated row, or `None`
    /// if the link does not exist.
    pub async fn toggle_highlight(
        pool: &PgPool,
        link_id: DbId,
    ) -> Result<Option<CollectionProduct>, sqlx::Error> {
        let query = format!(
            "UPDATE collection_products SET highlighted = NOT highlighted
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CollectionProduct>(&query)
            .bind(link_id)
            .fetch_optional(pool)
            .await
    }

    /// Directly set a link's sort order. Last write wins.
    pub async fn reorder(
        pool: &PgPool,
        link_id: DbId,
        sort_order: i32,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE collection_products SET sort_order = $2 WHERE id = $1")
            .bind(link_id)
            .bind(sort_order)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List a collection's product links in order.
    pub async fn list_for_collection(
        pool: &PgPool,
        collection_id: DbId,
    ) -> Result<Vec<CollectionProduct>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM collection_products
             WHERE collection_id = $1
             ORDER BY sort_order"
        );
        sqlx::query_as::<_, CollectionProduct>(&query)
            .bind(collection_id)
            .fetch_all(pool)
            .await
    }
}
