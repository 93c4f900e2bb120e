//! Narrative section models and DTOs.

use maison_core::locale::LocalePair;
use maison_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::media_asset::CreateMediaAsset;

/// A row from the `sections` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Section {
    pub id: DbId,
    pub collection_id: DbId,
    pub layout: String,
    pub sort_order: i32,
    pub asset_id: Option<DbId>,
    pub created_at: Timestamp,
}

/// Translated fields for one locale.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SectionTranslationFields {
    pub heading: Option<String>,
    pub body: Option<String>,
    pub caption: Option<String>,
}

/// Input for creating a section. `sort_order` is assigned by the
/// repository (current max + 1).
#[derive(Debug, Clone)]
pub struct CreateSection {
    pub layout: String,
    pub asset: Option<CreateMediaAsset>,
    pub translations: LocalePair<SectionTranslationFields>,
}

/// Partial update for a section. A supplied `asset` replaces the
/// existing asset's content in place, or attaches a new one.
#[derive(Debug, Clone, Default)]
pub struct UpdateSection {
    pub layout: Option<String>,
    pub asset: Option<CreateMediaAsset>,
    pub fr: Option<SectionTranslationFields>,
    pub en: Option<SectionTranslationFields>,
}

/// A section joined with its locale-resolved translation and asset,
/// as consumed by the resolver and admin read screens.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SectionView {
    pub id: DbId,
    pub layout: String,
    pub sort_order: i32,
    pub heading: String,
    pub body: Option<String>,
    pub caption: Option<String>,
    pub asset_url: Option<String>,
    pub asset_kind: Option<String>,
    pub asset_alt: Option<String>,
}
