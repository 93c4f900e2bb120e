//! Collection models and DTOs.

use maison_core::locale::LocalePair;
use maison_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `collections` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Collection {
    pub id: DbId,
    pub slug: String,
    /// `draft`, `active` or `archived`.
    pub status: String,
    /// Set when the collection is a drop with a scheduled release.
    pub release_date: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `collection_translations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CollectionTranslation {
    pub id: DbId,
    pub collection_id: DbId,
    pub locale: String,
    pub name: String,
    pub tagline: Option<String>,
    pub description: Option<String>,
}

/// Translated fields for one locale. Absent fields are left untouched
/// on update and backfilled from the other locale on create.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CollectionTranslationFields {
    pub name: Option<String>,
    pub tagline: Option<String>,
    pub description: Option<String>,
}

/// Input for creating a collection. The slug is already normalized and
/// both locales are present (backfilled) by the time this reaches the
/// repository.
#[derive(Debug, Clone)]
pub struct CreateCollection {
    pub slug: String,
    pub status: String,
    pub release_date: Option<Timestamp>,
    pub translations: LocalePair<CollectionTranslationFields>,
}

/// Partial update for a collection. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateCollection {
    pub slug: Option<String>,
    pub status: Option<String>,
    pub release_date: Option<Timestamp>,
    pub fr: Option<CollectionTranslationFields>,
    pub en: Option<CollectionTranslationFields>,
}

/// A collection joined with its translation for one preferred locale
/// (falling back to the other), for admin listings and the resolver.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CollectionWithTranslation {
    pub id: DbId,
    pub slug: String,
    pub status: String,
    pub release_date: Option<Timestamp>,
    pub name: String,
    pub tagline: Option<String>,
    pub description: Option<String>,
}
