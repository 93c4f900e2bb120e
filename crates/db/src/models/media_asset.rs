//! Media asset models.

use maison_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `media_assets` table.
///
/// Assets are shared: sections, lookbook slides, editorial blocks and
/// post heroes reference them. An asset with no remaining referencer
/// is deleted by the same transaction that removed the last one.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MediaAsset {
    pub id: DbId,
    pub kind: String,
    pub url: String,
    pub alt: Option<String>,
    pub created_at: Timestamp,
}

/// Input for creating (or replacing the content of) a media asset.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMediaAsset {
    /// `image` or `video`.
    pub kind: String,
    pub url: String,
    pub alt: Option<String>,
}
