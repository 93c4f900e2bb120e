//! Repository for collections and their translation pair.

use maison_core::locale::Locale;
use maison_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::collection::{
    Collection, CollectionTranslation, CollectionTranslationFields, CollectionWithTranslation,
    CreateCollection, UpdateCollection,
};
use crate::repositories::MediaAssetRepo;

/// Column list for `collections` queries.
const COLUMNS: &str = "id, slug, status, release_date, created_at, updated_at";

/// Column list for `collection_translations` queries.
const TRANSLATION_COLUMNS: &str = "id, collection_id, locale, name, tagline, description";

/// Provides data access for collections.
pub struct CollectionRepo;

impl CollectionRepo {
    /// Create a collection together with both locale translation rows,
    /// atomically.
    pub async fn create(
        pool: &PgPool,
        input: &CreateCollection,
    ) -> Result<Collection, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO collections (slug, status, release_date)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        let collection = sqlx::query_as::<_, Collection>(&query)
            .bind(&input.slug)
            .bind(&input.status)
            .bind(input.release_date)
            .fetch_one(&mut *tx)
            .await?;

        for (locale, fields) in input.translations.iter() {
            Self::upsert_translation(&mut tx, collection.id, locale, fields).await?;
        }

        tx.commit().await?;
        Ok(collection)
    }

    /// Update a collection and any supplied translation fields in one
    /// transaction. Returns `None` if the collection does not exist.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCollection,
    ) -> Result<Option<Collection>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE collections SET
                slug = COALESCE($2, slug),
                status = COALESCE($3, status),
                release_date = COALESCE($4, release_date),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let Some(collection) = sqlx::query_as::<_, Collection>(&query)
            .bind(id)
            .bind(input.slug.as_deref())
            .bind(input.status.as_deref())
            .bind(input.release_date)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        if let Some(fields) = &input.fr {
            Self::upsert_translation(&mut tx, id, Locale::Fr, fields).await?;
        }
        if let Some(fields) = &input.en {
            Self::upsert_translation(&mut tx, id, Locale::En, fields).await?;
        }

        tx.commit().await?;
        Ok(Some(collection))
    }

    /// Delete a collection and cascade its children, then garbage-collect
    /// the media assets those children referenced. One transaction.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let asset_ids: Vec<(DbId,)> = sqlx::query_as(
            "SELECT asset_id FROM sections
             WHERE collection_id = $1 AND asset_id IS NOT NULL
             UNION
             SELECT asset_id FROM lookbook_slides WHERE collection_id = $1",
        )
        .bind(id)
        .fetch_all(&mut *tx)
        .await?;

        let result = sqlx::query("DELETE FROM collections WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Ok(false);
        }

        for (asset_id,) in asset_ids {
            MediaAssetRepo::delete_if_unreferenced(&mut tx, asset_id).await?;
        }

        tx.commit().await?;
        Ok(true)
    }

    /// Find a collection by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Collection>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM collections WHERE id = $1");
        sqlx::query_as::<_, Collection>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a collection by its normalized slug.
    pub async fn find_by_slug(
        pool: &PgPool,
        slug: &str,
    ) -> Result<Option<Collection>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM collections WHERE slug = $1");
        sqlx::query_as::<_, Collection>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// List all collections with their translation resolved for the
    /// preferred locale (falling back to the other), newest first.
    pub async fn list(
        pool: &PgPool,
        locale: Locale,
    ) -> Result<Vec<CollectionWithTranslation>, sqlx::Error> {
        sqlx::query_as::<_, CollectionWithTranslation>(
            "SELECT c.id, c.slug, c.status, c.release_date,
                    t.name, t.tagline, t.description
             FROM collections c
             JOIN LATERAL (
                 SELECT name, tagline, description
                 FROM collection_translations
                 WHERE collection_id = c.id
                 ORDER BY (locale = $1) DESC
                 LIMIT 1
             ) t ON TRUE
             ORDER BY c.created_at DESC",
        )
        .bind(locale.as_str())
        .fetch_all(pool)
        .await
    }

    /// Create or partially overwrite one locale's translation row.
    /// Only supplied fields change on an existing row.
    pub async fn upsert_translation(
        conn: &mut PgConnection,
        collection_id: DbId,
        locale: Locale,
        fields: &CollectionTranslationFields,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO collection_translations
                (collection_id, locale, name, tagline, description)
             VALUES ($1, $2, COALESCE($3, ''), $4, $5)
             ON CONFLICT (collection_id, locale) DO UPDATE SET
                name = COALESCE($3, collection_translations.name),
                tagline = COALESCE($4, collection_translations.tagline),
                description = COALESCE($5, collection_translations.description)",
        )
        .bind(collection_id)
        .bind(locale.as_str())
        .bind(fields.name.as_deref())
        .bind(fields.tagline.as_deref())
        .bind(fields.description.as_deref())
        .execute(conn)
        .await?;
        Ok(())
    }

    /// Read one locale's translation row, falling back to the other
    /// locale when the preferred row is absent.
    pub async fn read_translation(
        pool: &PgPool,
        collection_id: DbId,
        preferred: Locale,
    ) -> Result<Option<CollectionTranslation>, sqlx::Error> {
        let query = format!(
            "SELECT {TRANSLATION_COLUMNS} FROM collection_translations
             WHERE collection_id = $1
             ORDER BY (locale = $2) DESC
             LIMIT 1"
        );
        sqlx::query_as::<_, CollectionTranslation>(&query)
            .bind(collection_id)
            .bind(preferred.as_str())
            .fetch_optional(pool)
            .await
    }
}
