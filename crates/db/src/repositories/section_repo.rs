//! Repository for narrative sections.
//!
//! Every mutation that touches a section's asset runs asset resolution
//! and cleanup inside the section's own transaction, so `asset_id` is
//! valid the moment the transaction commits.

use maison_core::locale::Locale;
use maison_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::section::{
    CreateSection, Section, SectionTranslationFields, SectionView, UpdateSection,
};
use crate::repositories::MediaAssetRepo;

/// Column list for `sections` queries.
const COLUMNS: &str = "id, collection_id, layout, sort_order, asset_id, created_at";

/// Provides data access for sections.
pub struct SectionRepo;

impl SectionRepo {
    /// Create a section at the end of its collection's order, with both
    /// translation rows and an optional freshly-created asset.
    pub async fn create(
        pool: &PgPool,
        collection_id: DbId,
        input: &CreateSection,
    ) -> Result<Section, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let asset_id = match &input.asset {
            Some(asset) => Some(MediaAssetRepo::create(&mut tx, asset).await?.id),
            None => None,
        };

        let query = format!(
            "INSERT INTO sections (collection_id, layout, sort_order, asset_id)
             VALUES ($1, $2,
                     (SELECT COALESCE(MAX(sort_order), 0) + 1
                      FROM sections WHERE collection_id = $1),
                     $3)
             RETURNING {COLUMNS}"
        );
        let section = sqlx::query_as::<_, Section>(&query)
            .bind(collection_id)
            .bind(&input.layout)
            .bind(asset_id)
            .fetch_one(&mut *tx)
            .await?;

        for (locale, fields) in input.translations.iter() {
            Self::upsert_translation(&mut tx, section.id, locale, fields).await?;
        }

        tx.commit().await?;
        Ok(section)
    }

    /// Update a section. A supplied asset replaces the existing asset's
    /// content in place (keeping its id), or creates and attaches one.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateSection,
    ) -> Result<Option<Section>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!("SELECT {COLUMNS} FROM sections WHERE id = $1");
        let Some(existing) = sqlx::query_as::<_, Section>(&query)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        let asset_id = match (&input.asset, existing.asset_id) {
            (Some(asset), Some(asset_id)) => {
                MediaAssetRepo::update_in_place(&mut tx, asset_id, asset).await?;
                Some(asset_id)
            }
            (Some(asset), None) => Some(MediaAssetRepo::create(&mut tx, asset).await?.id),
            (None, current) => current,
        };

        let query = format!(
            "UPDATE sections SET
                layout = COALESCE($2, layout),
                asset_id = $3
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let section = sqlx::query_as::<_, Section>(&query)
            .bind(id)
            .bind(input.layout.as_deref())
            .bind(asset_id)
            .fetch_one(&mut *tx)
            .await?;

        if let Some(fields) = &input.fr {
            Self::upsert_translation(&mut tx, id, Locale::Fr, fields).await?;
        }
        if let Some(fields) = &input.en {
            Self::upsert_translation(&mut tx, id, Locale::En, fields).await?;
        }

        tx.commit().await?;
        Ok(Some(section))
    }

    /// Delete a section, then garbage-collect its asset if this was the
    /// last referencer. One transaction.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let prior_asset: Option<(Option<DbId>,)> =
            sqlx::query_as("SELECT asset_id FROM sections WHERE id = $1")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some((asset_id,)) = prior_asset else {
            return Ok(false);
        };

        sqlx::query("DELETE FROM sections WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if let Some(asset_id) = asset_id {
            MediaAssetRepo::delete_if_unreferenced(&mut tx, asset_id).await?;
        }

        tx.commit().await?;
        Ok(true)
    }

    /// Directly set a section's sort order. No gap or uniqueness
    /// validation; last write wins.
    pub async fn reorder(pool: &PgPool, id: DbId, sort_order: i32) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE sections SET sort_order = $2 WHERE id = $1")
            .bind(id)
            .bind(sort_order)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Find a section by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Section>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM sections WHERE id = $1");
        sqlx::query_as::<_, Section>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a collection's sections in order, with translations resolved
    /// for the preferred locale and asset fields joined in.
    pub async fn list_for_collection(
        pool: &PgPool,
        collection_id: DbId,
        locale: Locale,
    ) -> Result<Vec<SectionView>, sqlx::Error> {
        sqlx::query_as::<_, SectionView>(
            "SELECT s.id, s.layout, s.sort_order,
                    t.heading, t.body, t.caption,
                    a.url AS asset_url, a.kind AS asset_kind, a.alt AS asset_alt
             FROM sections s
             JOIN LATERAL (
                 SELECT heading, body, caption
                 FROM section_translations
                 WHERE section_id = s.id
                 ORDER BY (locale = $2) DESC
                 LIMIT 1
             ) t ON TRUE
             LEFT JOIN media_assets a ON a.id = s.asset_id
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
        section_id: DbId,
        locale: Locale,
        fields: &SectionTranslationFields,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO section_translations
                (section_id, locale, heading, body, caption)
             VALUES ($1, $2, COALESCE($3, ''), $4, $5)
             ON CONFLICT (section_id, locale) DO UPDATE SET
                heading = COALESCE($3, section_translations.heading),
                body = COALESCE($4, section_translations.body),
                caption = COALESCE($5, section_translations.caption)",
        )
        .bind(section_id)
        .bind(locale.as_str())
        .bind(fields.heading.as_deref())
        .bind(fields.body.as_deref())
        .bind(fields.caption.as_deref())
        .execute(conn)
        .await?;
        Ok(())
    }
}
