//! Repository for editorial posts, their blocks and feature links.
//!
//! Posts are edited as one form by a single author, so `update`
//! replaces blocks and features wholesale instead of diffing. Media
//! assets orphaned by a replace or delete are garbage-collected in the
//! same transaction.

use chrono::Utc;
use maison_core::locale::Locale;
use maison_core::publishing::resolve_published_at;
use maison_core::types::DbId;
use sqlx::{PgConnection, PgPool, Postgres, Transaction};

use crate::models::post::{
    BlockTranslationFields, BlockView, CreateBlock, CreateFeature, CreatePost, EditorialFeature,
    EditorialPost, PostTranslation, PostTranslationFields, PostWithTranslation, UpdatePost,
};
use crate::repositories::MediaAssetRepo;

/// Column list for `editorial_posts` queries.
const COLUMNS: &str =
    "id, slug, category, status, published_at, hero_asset_id, created_at, updated_at";

/// Column list for `editorial_post_translations` queries.
const TRANSLATION_COLUMNS: &str = "id, post_id, locale, title, standfirst, body_doc";

/// Column list for `editorial_features` queries.
const FEATURE_COLUMNS: &str = "id, post_id, product_id, sort_order, note";

/// Provides data access for editorial posts.
pub struct PostRepo;

impl PostRepo {
    /// Create a post with both translation rows, its blocks and its
    /// feature links, atomically.
    pub async fn create(pool: &PgPool, input: &CreatePost) -> Result<EditorialPost, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let hero_asset_id = match &input.hero_asset {
            Some(asset) => Some(MediaAssetRepo::create(&mut tx, asset).await?.id),
            None => None,
        };

        // A post created directly as active gets stamped unless an
        // explicit timestamp was supplied.
        let published_at =
            resolve_published_at(input.published_at, &input.status, "draft", None, Utc::now());

        let query = format!(
            "INSERT INTO editorial_posts
                (slug, category, status, published_at, hero_asset_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        let post = sqlx::query_as::<_, EditorialPost>(&query)
            .bind(&input.slug)
            .bind(&input.category)
            .bind(&input.status)
            .bind(published_at)
            .bind(hero_asset_id)
            .fetch_one(&mut *tx)
            .await?;

        for (locale, fields) in input.translations.iter() {
            Self::upsert_translation(&mut tx, post.id, locale, fields).await?;
        }
        Self::insert_blocks(&mut tx, post.id, &input.blocks).await?;
        Self::insert_features(&mut tx, post.id, &input.features).await?;

        tx.commit().await?;
        Ok(post)
    }

    /// Update a post, replacing its blocks and features wholesale.
    /// Returns `None` if the post does not exist.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdatePost,
    ) -> Result<Option<EditorialPost>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!("SELECT {COLUMNS} FROM editorial_posts WHERE id = $1");
        let Some(existing) = sqlx::query_as::<_, EditorialPost>(&query)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        let hero_asset_id = match (&input.hero_asset, existing.hero_asset_id) {
            (Some(asset), Some(asset_id)) => {
                MediaAssetRepo::update_in_place(&mut tx, asset_id, asset).await?;
                Some(asset_id)
            }
            (Some(asset), None) => Some(MediaAssetRepo::create(&mut tx, asset).await?.id),
            (None, current) => current,
        };

        let new_status = input.status.as_deref().unwrap_or(&existing.status);
        let published_at = resolve_published_at(
            input.published_at,
            new_status,
            &existing.status,
            existing.published_at,
            Utc::now(),
        );

        let query = format!(
            "UPDATE editorial_posts SET
                slug = COALESCE($2, slug),
                category = COALESCE($3, category),
                status = COALESCE($4, status),
                published_at = $5,
                hero_asset_id = $6,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let post = sqlx::query_as::<_, EditorialPost>(&query)
            .bind(id)
            .bind(input.slug.as_deref())
            .bind(input.category.as_deref())
            .bind(input.status.as_deref())
            .bind(published_at)
            .bind(hero_asset_id)
            .fetch_one(&mut *tx)
            .await?;

        if let Some(fields) = &input.fr {
            Self::upsert_translation(&mut tx, id, Locale::Fr, fields).await?;
        }
        if let Some(fields) = &input.en {
            Self::upsert_translation(&mut tx, id, Locale::En, fields).await?;
        }

        // Replace children wholesale, then garbage-collect the assets
        // the old blocks referenced.
        let old_asset_ids: Vec<(DbId,)> = sqlx::query_as(
            "SELECT asset_id FROM editorial_blocks
             WHERE post_id = $1 AND asset_id IS NOT NULL",
        )
        .bind(id)
        .fetch_all(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM editorial_blocks WHERE post_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM editorial_features WHERE post_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        Self::insert_blocks(&mut tx, id, &input.blocks).await?;
        Self::insert_features(&mut tx, id, &input.features).await?;

        for (asset_id,) in old_asset_ids {
            MediaAssetRepo::delete_if_unreferenced(&mut tx, asset_id).await?;
        }

        tx.commit().await?;
        Ok(Some(post))
    }

    /// Delete a post and cascade its children, then garbage-collect the
    /// hero and block assets. One transaction.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let mut asset_ids: Vec<DbId> = sqlx::query_as(
            "SELECT asset_id FROM editorial_blocks
             WHERE post_id = $1 AND asset_id IS NOT NULL",
        )
        .bind(id)
        .fetch_all(&mut *tx)
        .await?
        .into_iter()
        .map(|(asset_id,): (DbId,)| asset_id)
        .collect();

        let hero: Option<(Option<DbId>,)> =
            sqlx::query_as("SELECT hero_asset_id FROM editorial_posts WHERE id = $1")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some((hero_asset_id,)) = hero else {
            return Ok(false);
        };
        asset_ids.extend(hero_asset_id);

        sqlx::query("DELETE FROM editorial_posts WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        for asset_id in asset_ids {
            MediaAssetRepo::delete_if_unreferenced(&mut tx, asset_id).await?;
        }

        tx.commit().await?;
        Ok(true)
    }

    /// Find a post by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<EditorialPost>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM editorial_posts WHERE id = $1");
        sqlx::query_as::<_, EditorialPost>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a post by its normalized slug.
    pub async fn find_by_slug(
        pool: &PgPool,
        slug: &str,
    ) -> Result<Option<EditorialPost>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM editorial_posts WHERE slug = $1");
        sqlx::query_as::<_, EditorialPost>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// Read one locale's translation row, falling back to the other.
    pub async fn read_translation(
        pool: &PgPool,
        post_id: DbId,
        preferred: Locale,
    ) -> Result<Option<PostTranslation>, sqlx::Error> {
        let query = format!(
            "SELECT {TRANSLATION_COLUMNS} FROM editorial_post_translations
             WHERE post_id = $1
             ORDER BY (locale = $2) DESC
             LIMIT 1"
        );
        sqlx::query_as::<_, PostTranslation>(&query)
            .bind(post_id)
            .bind(preferred.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Load a post with its locale-resolved translation and hero asset.
    pub async fn find_with_translation(
        pool: &PgPool,
        id: DbId,
        locale: Locale,
    ) -> Result<Option<PostWithTranslation>, sqlx::Error> {
        sqlx::query_as::<_, PostWithTranslation>(
            "SELECT p.id, p.slug, p.category, p.status, p.published_at,
                    t.title, t.standfirst, t.body_doc,
                    a.url AS hero_url, a.alt AS hero_alt
             FROM editorial_posts p
             JOIN LATERAL (
                 SELECT title, standfirst, body_doc
                 FROM editorial_post_translations
                 WHERE post_id = p.id
                 ORDER BY (locale = $2) DESC
                 LIMIT 1
             ) t ON TRUE
             LEFT JOIN media_assets a ON a.id = p.hero_asset_id
             WHERE p.id = $1",
        )
        .bind(id)
        .bind(locale.as_str())
        .fetch_optional(pool)
        .await
    }

    /// List posts for a status with locale-resolved translations,
    /// newest publish first.
    pub async fn list_by_status(
        pool: &PgPool,
        status: &str,
        locale: Locale,
    ) -> Result<Vec<PostWithTranslation>, sqlx::Error> {
        sqlx::query_as::<_, PostWithTranslation>(
            "SELECT p.id, p.slug, p.category, p.status, p.published_at,
                    t.title, t.standfirst, t.body_doc,
                    a.url AS hero_url, a.alt AS hero_alt
             FROM editorial_posts p
             JOIN LATERAL (
                 SELECT title, standfirst, body_doc
                 FROM editorial_post_translations
                 WHERE post_id = p.id
                 ORDER BY (locale = $2) DESC
                 LIMIT 1
             ) t ON TRUE
             LEFT JOIN media_assets a ON a.id = p.hero_asset_id
             WHERE p.status = $1
             ORDER BY p.published_at DESC NULLS LAST, p.created_at DESC",
        )
        .bind(status)
        .bind(locale.as_str())
        .fetch_all(pool)
        .await
    }

    /// List a post's blocks in order, with locale-resolved translations
    /// and asset fields joined in.
    pub async fn blocks_for_post(
        pool: &PgPool,
        post_id: DbId,
        locale: Locale,
    ) -> Result<Vec<BlockView>, sqlx::Error> {
        sqlx::query_as::<_, BlockView>(
            "SELECT b.id, b.kind, b.sort_order, b.data,
                    t.headline, t.body, t.caption,
                    a.url AS asset_url, a.kind AS asset_kind, a.alt AS asset_alt
             FROM editorial_blocks b
             JOIN LATERAL (
                 SELECT headline, body, caption
                 FROM editorial_block_translations
                 WHERE block_id = b.id
                 ORDER BY (locale = $2) DESC
                 LIMIT 1
             ) t ON TRUE
             LEFT JOIN media_assets a ON a.id = b.asset_id
             WHERE b.post_id = $1
             ORDER BY b.sort_order",
        )
        .bind(post_id)
        .bind(locale.as_str())
        .fetch_all(pool)
        .await
    }

    /// List a post's feature links in order.
    pub async fn features_for_post(
        pool: &PgPool,
        post_id: DbId,
    ) -> Result<Vec<EditorialFeature>, sqlx::Error> {
        let query = format!(
            "SELECT {FEATURE_COLUMNS} FROM editorial_features
             WHERE post_id = $1
             ORDER BY sort_order"
        );
        sqlx::query_as::<_, EditorialFeature>(&query)
            .bind(post_id)
            .fetch_all(pool)
            .await
    }

    /// Create or partially overwrite one locale's translation row.
    pub async fn upsert_translation(
        conn: &mut PgConnection,
        post_id: DbId,
        locale: Locale,
        fields: &PostTranslationFields,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO editorial_post_translations
                (post_id, locale, title, standfirst, body_doc)
             VALUES ($1, $2, COALESCE($3, ''), $4, COALESCE($5, '[]'::jsonb))
             ON CONFLICT (post_id, locale) DO UPDATE SET
                title = COALESCE($3, editorial_post_translations.title),
                standfirst = COALESCE($4, editorial_post_translations.standfirst),
                body_doc = COALESCE($5, editorial_post_translations.body_doc)",
        )
        .bind(post_id)
        .bind(locale.as_str())
        .bind(fields.title.as_deref())
        .bind(fields.standfirst.as_deref())
        .bind(fields.body_doc.as_ref())
        .execute(conn)
        .await?;
        Ok(())
    }

    /// Insert a post's blocks in positional order, creating each
    /// block's asset first.
    async fn insert_blocks(
        tx: &mut Transaction<'_, Postgres>,
        post_id: DbId,
        blocks: &[CreateBlock],
    ) -> Result<(), sqlx::Error> {
        for (index, block) in blocks.iter().enumerate() {
            let asset_id = match &block.asset {
                Some(asset) => Some(MediaAssetRepo::create(tx, asset).await?.id),
                None => None,
            };

            let (block_id,): (DbId,) = sqlx::query_as(
                "INSERT INTO editorial_blocks (post_id, kind, sort_order, asset_id, data)
                 VALUES ($1, $2, $3, $4, $5)
                 RETURNING id",
            )
            .bind(post_id)
            .bind(&block.kind)
            .bind(index as i32 + 1)
            .bind(asset_id)
            .bind(block.data.as_ref())
            .fetch_one(&mut **tx)
            .await?;

            for (locale, fields) in block.translations.iter() {
                Self::upsert_block_translation(tx, block_id, locale, fields).await?;
            }
        }
        Ok(())
    }

    async fn upsert_block_translation(
        tx: &mut Transaction<'_, Postgres>,
        block_id: DbId,
        locale: Locale,
        fields: &BlockTranslationFields,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO editorial_block_translations
                (block_id, locale, headline, body, caption)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (block_id, locale) DO UPDATE SET
                headline = COALESCE($3, editorial_block_translations.headline),
                body = COALESCE($4, editorial_block_translations.body),
                caption = COALESCE($5, editorial_block_translations.caption)",
        )
        .bind(block_id)
        .bind(locale.as_str())
        .bind(fields.headline.as_deref())
        .bind(fields.body.as_deref())
        .bind(fields.caption.as_deref())
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    /// Insert a post's feature links in positional order.
    async fn insert_features(
        tx: &mut Transaction<'_, Postgres>,
        post_id: DbId,
        features: &[CreateFeature],
    ) -> Result<(), sqlx::Error> {
        for (index, feature) in features.iter().enumerate() {
            sqlx::query(
                "INSERT INTO editorial_features (post_id, product_id, sort_order, note)
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(post_id)
            .bind(feature.product_id)
            .bind(index as i32 + 1)
            .bind(feature.note.as_deref())
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }
}
