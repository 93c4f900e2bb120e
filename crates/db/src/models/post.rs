//! Editorial post models and DTOs.

use maison_core::locale::LocalePair;
use maison_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

use crate::models::media_asset::CreateMediaAsset;

/// A row from the `editorial_posts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct EditorialPost {
    pub id: DbId,
    pub slug: String,
    pub category: String,
    /// `draft`, `active` or `archived`.
    pub status: String,
    pub published_at: Option<Timestamp>,
    pub hero_asset_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `editorial_post_translations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PostTranslation {
    pub id: DbId,
    pub post_id: DbId,
    pub locale: String,
    pub title: String,
    pub standfirst: Option<String>,
    /// Structured rich-text document (array of block nodes).
    pub body_doc: Value,
}

/// Translated fields for one locale. `body_doc` is the already-parsed
/// document value; rich-text degradation happens in the pipeline.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostTranslationFields {
    pub title: Option<String>,
    pub standfirst: Option<String>,
    pub body_doc: Option<Value>,
}

/// A row from the `editorial_blocks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct EditorialBlock {
    pub id: DbId,
    pub post_id: DbId,
    pub kind: String,
    pub sort_order: i32,
    pub asset_id: Option<DbId>,
    pub data: Option<Value>,
    pub created_at: Timestamp,
}

/// Translated fields of a block. All optional: a pull-quote block may
/// carry only a body, an image block only a caption.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BlockTranslationFields {
    pub headline: Option<String>,
    pub body: Option<String>,
    pub caption: Option<String>,
}

/// Input for one block of a post. Blocks are recreated wholesale on
/// every post save; `sort_order` is positional.
#[derive(Debug, Clone)]
pub struct CreateBlock {
    pub kind: String,
    pub asset: Option<CreateMediaAsset>,
    pub data: Option<Value>,
    pub translations: LocalePair<BlockTranslationFields>,
}

/// A row from the `editorial_features` table: a product featured by a
/// post. Not translatable.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct EditorialFeature {
    pub id: DbId,
    pub post_id: DbId,
    pub product_id: DbId,
    pub sort_order: i32,
    pub note: Option<String>,
}

/// Input for one feature link.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateFeature {
    pub product_id: DbId,
    pub note: Option<String>,
}

/// Input for creating a post.
#[derive(Debug, Clone)]
pub struct CreatePost {
    pub slug: String,
    pub category: String,
    pub status: String,
    /// Explicit publish timestamp; wins over stamping.
    pub published_at: Option<Timestamp>,
    pub hero_asset: Option<CreateMediaAsset>,
    pub translations: LocalePair<PostTranslationFields>,
    pub blocks: Vec<CreateBlock>,
    pub features: Vec<CreateFeature>,
}

/// Full-form update for a post. Blocks and features replace the
/// existing sets entirely; scalar fields update when supplied.
#[derive(Debug, Clone)]
pub struct UpdatePost {
    pub slug: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
    pub published_at: Option<Timestamp>,
    pub hero_asset: Option<CreateMediaAsset>,
    pub fr: Option<PostTranslationFields>,
    pub en: Option<PostTranslationFields>,
    pub blocks: Vec<CreateBlock>,
    pub features: Vec<CreateFeature>,
}

/// A post joined with its locale-resolved translation, for listings
/// and the resolver.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PostWithTranslation {
    pub id: DbId,
    pub slug: String,
    pub category: String,
    pub status: String,
    pub published_at: Option<Timestamp>,
    pub title: String,
    pub standfirst: Option<String>,
    pub body_doc: Value,
    pub hero_url: Option<String>,
    pub hero_alt: Option<String>,
}

/// A block joined with its locale-resolved translation and asset.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BlockView {
    pub id: DbId,
    pub kind: String,
    pub sort_order: i32,
    pub data: Option<Value>,
    pub headline: Option<String>,
    pub body: Option<String>,
    pub caption: Option<String>,
    pub asset_url: Option<String>,
    pub asset_kind: Option<String>,
    pub asset_alt: Option<String>,
}
