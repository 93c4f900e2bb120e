//! Shared builders for engine integration tests.
//!
//! Each test binary includes this module, so not every helper is used
//! by every binary.
#![allow(dead_code)]

use maison_core::locale::Locale;
use maison_core::modules::ModuleKind;
use maison_db::models::collection::CollectionTranslationFields;
use maison_db::models::media_asset::CreateMediaAsset;
use maison_db::models::module::UpsertModule;
use maison_db::models::section::SectionTranslationFields;
use maison_db::models::slide::SlideTranslationFields;
use maison_engine::pipeline::{
    CollectionInput, PostInput, PostTranslationInput, SectionInput, SlideInput,
};
use maison_engine::{ContentEngine, EngineConfig};
use serde_json::{json, Value};
use sqlx::PgPool;

/// Build an engine with the default 60s cache TTL.
pub fn build_engine(pool: PgPool) -> ContentEngine {
    ContentEngine::new(pool, EngineConfig::default())
}

pub fn image(url: &str) -> CreateMediaAsset {
    CreateMediaAsset {
        kind: "image".to_string(),
        url: url.to_string(),
        alt: None,
    }
}

/// A collection input with only the French translation supplied; the
/// English side is backfilled by the pipeline.
pub fn collection_input(slug: &str, name: &str) -> CollectionInput {
    CollectionInput {
        slug: slug.to_string(),
        fr: Some(CollectionTranslationFields {
            name: Some(name.to_string()),
            ..Default::default()
        }),
        ..Default::default()
    }
}

pub fn section_input(heading: &str, asset: Option<CreateMediaAsset>) -> SectionInput {
    SectionInput {
        asset,
        fr: Some(SectionTranslationFields {
            heading: Some(heading.to_string()),
            ..Default::default()
        }),
        ..Default::default()
    }
}

pub fn slide_input(title: &str, url: &str) -> SlideInput {
    SlideInput {
        asset: image(url),
        hotspot_product_id: None,
        fr: Some(SlideTranslationFields {
            title: Some(title.to_string()),
            ..Default::default()
        }),
        en: None,
    }
}

pub fn post_input(slug: &str, title: &str) -> PostInput {
    PostInput {
        slug: slug.to_string(),
        fr: Some(PostTranslationInput {
            title: Some(title.to_string()),
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// A minimal valid config payload for each module kind.
pub fn module_config(kind: ModuleKind) -> Value {
    match kind {
        ModuleKind::Hero => json!({"headline": "Automne-Hiver"}),
        ModuleKind::Manifesto => json!({"heading": "La Maison", "body": "Sobriété."}),
        ModuleKind::FeaturedCollection => json!({}),
        ModuleKind::Lookbook => json!({}),
        ModuleKind::DropCountdown => json!({}),
        ModuleKind::EditorialSpotlight => json!({}),
        ModuleKind::ProductRail => json!({"heading": "Essentiels"}),
        ModuleKind::Craftsmanship => json!({"heading": "Atelier", "body": "Fait main."}),
        ModuleKind::Testimonials => json!({"entries": []}),
        ModuleKind::Newsletter => json!({"heading": "Restez informés"}),
    }
}

pub fn upsert_input(kind: ModuleKind, sort_order: i32, config: Value) -> UpsertModule {
    UpsertModule {
        slug: kind.as_str().replace('_', "-"),
        sort_order,
        config,
        active_from: None,
        active_to: None,
    }
}

/// Register a complete module set for one locale, with minimal valid
/// configs and open activity windows.
pub async fn register_all_modules(engine: &ContentEngine, locale: Locale) {
    for (position, kind) in ModuleKind::ALL.into_iter().enumerate() {
        engine
            .upsert_module(
                kind.as_str(),
                locale,
                upsert_input(kind, position as i32, module_config(kind)),
            )
            .await
            .unwrap();
    }
}
