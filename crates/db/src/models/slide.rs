//! Lookbook slide models and DTOs.

use maison_core::locale::LocalePair;
use maison_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::media_asset::CreateMediaAsset;

/// A row from the `lookbook_slides` table. Unlike sections, a slide's
/// asset is required.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LookbookSlide {
    pub id: DbId,
    pub collection_id: DbId,
    pub asset_id: DbId,
    pub sort_order: i32,
    pub hotspot_product_id: Option<DbId>,
    pub created_at: Timestamp,
}

/// Translated fields for one locale.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SlideTranslationFields {
    pub title: Option<String>,
    pub body: Option<String>,
    pub caption: Option<String>,
}

/// Input for creating a slide. The asset is mandatory.
#[derive(Debug, Clone)]
pub struct CreateSlide {
    pub asset: CreateMediaAsset,
    pub hotspot_product_id: Option<DbId>,
    pub translations: LocalePair<SlideTranslationFields>,
}

/// Partial update for a slide. The hotspot is doubly optional: the
/// outer `None` leaves it untouched, `Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct UpdateSlide {
    pub asset: Option<CreateMediaAsset>,
    pub hotspot_product_id: Option<Option<DbId>>,
    pub fr: Option<SlideTranslationFields>,
    pub en: Option<SlideTranslationFields>,
}

/// A slide joined with its locale-resolved translation and asset.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SlideView {
    pub id: DbId,
    pub sort_order: i32,
    pub hotspot_product_id: Option<DbId>,
    pub title: String,
    pub body: Option<String>,
    pub caption: Option<String>,
    pub asset_url: String,
    pub asset_kind: String,
    pub asset_alt: Option<String>,
}
