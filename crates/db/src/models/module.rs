//! Homepage module models.

use maison_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

/// A row from the `homepage_modules` table: one admin-edited config
/// slot for one (kind, locale).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct HomepageModule {
    pub id: DbId,
    pub slug: String,
    pub kind: String,
    pub locale: String,
    pub sort_order: i32,
    pub config: Value,
    pub active_from: Option<Timestamp>,
    pub active_to: Option<Timestamp>,
    pub updated_at: Timestamp,
}

/// Upsert input for one module slot. The kind string is validated
/// against the closed registry before it reaches the repository.
#[derive(Debug, Clone, Deserialize)]
pub struct UpsertModule {
    pub slug: String,
    pub sort_order: i32,
    pub config: Value,
    pub active_from: Option<Timestamp>,
    pub active_to: Option<Timestamp>,
}
