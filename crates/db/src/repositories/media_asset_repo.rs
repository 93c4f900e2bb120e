//! Repository for the shared `media_assets` pool.
//!
//! Reference counts are computed on demand by scanning every owner
//! table, never stored. Cleanup runs inside the same transaction as
//! the owner-row change that detached the asset, so no concurrent
//! writer can attach a new reference mid-deletion.

use maison_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::media_asset::{CreateMediaAsset, MediaAsset};

/// Column list for `media_assets` queries.
const COLUMNS: &str = "id, kind, url, alt, created_at";

/// Provides data access for the media asset pool.
pub struct MediaAssetRepo;

impl MediaAssetRepo {
    /// Insert a new asset within the caller's transaction.
    pub async fn create(
        conn: &mut PgConnection,
        input: &CreateMediaAsset,
    ) -> Result<MediaAsset, sqlx::Error> {
        let query = format!(
            "INSERT INTO media_assets (kind, url, alt)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MediaAsset>(&query)
            .bind(&input.kind)
            .bind(&input.url)
            .bind(input.alt.as_deref())
            .fetch_one(conn)
            .await
    }

    /// Replace an existing asset's content in place, keeping its id so
    /// every referencer picks up the new media. Returns `None` if the
    /// asset does not exist.
    pub async fn update_in_place(
        conn: &mut PgConnection,
        id: DbId,
        input: &CreateMediaAsset,
    ) -> Result<Option<MediaAsset>, sqlx::Error> {
        let query = format!(
            "UPDATE media_assets SET kind = $2, url = $3, alt = $4
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MediaAsset>(&query)
            .bind(id)
            .bind(&input.kind)
            .bind(&input.url)
            .bind(input.alt.as_deref())
            .fetch_optional(conn)
            .await
    }

    /// Find an asset by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<MediaAsset>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM media_assets WHERE id = $1");
        sqlx::query_as::<_, MediaAsset>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Count remaining referencers of an asset across all owner tables.
    pub async fn reference_count(conn: &mut PgConnection, id: DbId) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT
                (SELECT COUNT(*) FROM sections WHERE asset_id = $1)
              + (SELECT COUNT(*) FROM lookbook_slides WHERE asset_id = $1)
              + (SELECT COUNT(*) FROM editorial_blocks WHERE asset_id = $1)
              + (SELECT COUNT(*) FROM editorial_posts WHERE hero_asset_id = $1)",
        )
        .bind(id)
        .fetch_one(conn)
        .await?;
        Ok(count)
    }

    /// Delete the asset iff nothing references it any more.
    ///
    /// Must run after the owner row's delete/repoint, inside the same
    /// transaction. Returns `true` if the asset was deleted.
    pub async fn delete_if_unreferenced(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        if Self::reference_count(conn, id).await? > 0 {
            return Ok(false);
        }
        let result = sqlx::query("DELETE FROM media_assets WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
