//! Repository for lookbook slides.
//!
//! Slides always carry an asset; creation resolves the asset before
//! the slide row is written so `asset_id` is valid post-commit.

use maison_core::locale::Locale;
use maison_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::slide::{
    CreateSlide, LookbookSlide, SlideTranslationFields, SlideView, UpdateSlide,
};
use crate::repositories::MediaAssetRepo;

/// Column list for `lookbook_slides` queries.
const COLUMNS: &str = "id, collection_id, asset_id, sort_order, hotspot_product_id, created_at";

/// Provides data access for lookbook slides.
pub struct SlideRepo;

impl SlideRepo {
    /// Create a slide at the end of its collection's order, with its
    /// required asset and both translation rows.
    pub async fn create(
        pool: &PgPool,
        collection_id: DbId,
        input: &CreateSlide,
    ) -> Result<LookbookSlide, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let asset = MediaAssetRepo::create(&mut tx, &input.asset).await?;

        let query = format!(
            "INSERT INTO lookbook_slides
                (collection_id, asset_id, sort_order, hotspot_product_id)
             VALUES ($1, $2,
                     (SELECT COALESCE(MAX(sort_order), 0) + 1
                      FROM lookbook_slides WHERE collection_id = $1),
                     $3)
             RETURNING {COLUMNS}"
        );
        let slide = sqlx::query_as::<_, LookbookSlide>(&query)
            .bind(collection_id)
            .bind(asset.id)
            .bind(input.hotspot_product_id)
            .fetch_one(&mut *tx)
            .await?;

        for (locale, fields) in input.translations.iter() {
            Self::upsert_translation(&mut tx, slide.id, locale, fields).await?;
        }

        tx.commit().await?;
        Ok(slide)
    }

    /// Update a slide. A supplied asset replaces the existing asset's
    /// content in place.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateSlide,
    ) -> Result<Option<LookbookSlide>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!("SELECT {COLUMNS} FROM lookbook_slides WHERE id = $1");
        let Some(existing) = sqlx::query_as::<_, LookbookSlide>(&query)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        if let Some(asset) = &input.asset {
            MediaAssetRepo::update_in_place(&mut tx, existing.asset_id, asset).await?;
        }

        // COALESCE cannot express clearing the hotspot, so a separate
        // flag tells SQL whether the value column applies at all.
        let query = format!(
            "UPDATE lookbook_slides SET
                hotspot_product_id = CASE WHEN $2 THEN $3 ELSE hotspot_product_id END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let slide = sqlx::query_as::<_, LookbookSlide>(&query)
            .bind(id)
            .bind(input.hotspot_product_id.is_some())
            .bind(input.hotspot_product_id.flatten())
            .fetch_one(&mut *tx)
            .await?;

        if let Some(fields) = &input.fr {
            Self::upsert_translation(&mut tx, id, Locale::Fr, fields).await?;
        }
        if let Some(fields) = &input.en {
            Self::upsert_translation(&mut tx, id, Locale::En, fields).await?;
        }

        tx.commit().await?;
        Ok(Some(slide))
    }

    /// Delete a slide, then garbage-collect its asset if this was the
    /// last referencer. One transaction.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let prior: Option<(DbId,)> =
            sqlx::query_as("SELECT asset_id FROM lookbook_slides WHERE id = $1")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some((asset_id,)) = prior else {
            return Ok(false);
        };

        sqlx::query("DELETE FROM lookbook_slides WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        MediaAssetRepo::delete_if_unreferenced(&mut tx, asset_id).await?;

        tx.commit().await?;
        Ok(true)
    }

    /// Directly set a slide's sort order. Last write wins.
    pub async fn reorder(pool: &PgPool, id: DbId, sort_order: i32) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE lookbook_slides SET sort_order = $2 WHERE id = $1")
            .bind(id)
            .bind(sort_order)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Find a slide by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<LookbookSlide>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM lookbook_slides WHERE id = $1");
        sqlx::query_as::<_, LookbookSlide>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a collection's slides in order, with translations resolved
    /// for the preferred locale and asset fields joined in.
    pub async fn list_for_collection(
        pool: &PgPool,
        collection_id: DbId,
        locale: Locale,
    ) -> Result<Vec<SlideView>, sqlx::Error> {
        sqlx::query_as::<_, SlideView>(
            "SELECT s.id, s.sort_order, s.hotspot_product_id,
                    t.title, t.body, t.caption,
                    a.url AS asset_url, a.kind AS asset_kind, a.alt AS asset_alt
             FROM lookbook_slides s
             JOIN LATERAL (
                 SELECT title, body, caption
                 FROM lookbook_slide_translations
                 WHERE slide_id = s.id
                 ORDER BY (locale = $2) DESC
                 LIMIT 1
             ) t ON TRUE
             JOIN media_assets a ON a.id = s.asset_id
             WHERE s.collection_id = $1
             ORDER BY s.sort_order",
        )
        .bind(collection_id)
        .bind(locale.as_str())
        .fetch_all(pool)
        .await
    }

    /// Create or partially overwrite one locale's translation row.
    pub async fn upsert_translation(
        conn: &mut PgConnection,
        slide_id: DbId,
        locale: Locale,
        fields: &SlideTranslationFields,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO lookbook_slide_translations
                (slide_id, locale, title, body, caption)
             VALUES ($1, $2, COALESCE($3, ''), $4, $5)
             ON CONFLICT (slide_id, locale) DO UPDATE SET
                title = COALESCE($3, lookbook_slide_translations.title),
                body = COALESCE($4, lookbook_slide_translations.body),
                caption = COALESCE($5, lookbook_slide_translations.caption)",
        )
        .bind(slide_id)
        .bind(locale.as_str())
        .bind(fields.title.as_deref())
        .bind(fields.body.as_deref())
        .bind(fields.caption.as_deref())
        .execute(conn)
        .await?;
        Ok(())
    }
}
