//! Collection product link models.

use maison_core::types::DbId;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `collection_products` table: one product linked to a
/// collection. At most one row exists per (collection, product).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CollectionProduct {
    pub id: DbId,
    pub collection_id: DbId,
    pub product_id: DbId,
    pub sort_order: i32,
    pub highlighted: bool,
}
