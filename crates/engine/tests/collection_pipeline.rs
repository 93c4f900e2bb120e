//! Integration tests for collection mutations: translation pairs,
//! narrative sections, lookbook slides, product links and media-asset
//! garbage collection.

mod common;

use assert_matches::assert_matches;
use common::{build_engine, collection_input, image, section_input, slide_input};
use maison_core::error::CoreError;
use maison_core::locale::Locale;
use maison_db::models::collection::CollectionTranslationFields;
use maison_db::models::section::SectionTranslationFields;
use maison_db::repositories::{CollectionRepo, MediaAssetRepo, SectionRepo, SlideRepo};
use maison_engine::pipeline::{CollectionInput, UpdateCollectionInput, UpdateSlideInput};
use maison_engine::EngineError;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Collections
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn create_backfills_missing_locale(pool: PgPool) {
    let engine = build_engine(pool.clone());
    let collection = engine
        .create_collection(collection_input("Été 2026", "Été"))
        .await
        .unwrap();
    assert_eq!(collection.slug, "t-2026");
    assert_eq!(collection.status, "draft");

    // Only French was supplied; the English row is backfilled with the
    // same content so both locales always resolve.
    let en = CollectionRepo::read_translation(&pool, collection.id, Locale::En)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(en.locale, "en");
    assert_eq!(en.name, "Été");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn required_field_backfills_across_supplied_locales(pool: PgPool) {
    let engine = build_engine(pool.clone());

    // Both locales supplied, but only French carries the name. The
    // English row must fall back to the French name, never store "".
    let mut input = collection_input("soie", "Soie");
    input.en = Some(CollectionTranslationFields {
        tagline: Some("Silk line".to_string()),
        ..Default::default()
    });
    let collection = engine.create_collection(input).await.unwrap();

    let en = CollectionRepo::read_translation(&pool, collection.id, Locale::En)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(en.name, "Soie");
    assert_eq!(en.tagline.as_deref(), Some("Silk line"));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn create_requires_a_translation(pool: PgPool) {
    let engine = build_engine(pool);
    let err = engine
        .create_collection(CollectionInput {
            slug: "capsule".to_string(),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert_matches!(err, EngineError::Core(CoreError::Validation(_)));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn slug_that_normalizes_to_nothing_is_rejected(pool: PgPool) {
    let engine = build_engine(pool);
    let err = engine
        .create_collection(collection_input("!!!", "Capsule"))
        .await
        .unwrap_err();
    assert_matches!(err, EngineError::Core(CoreError::Validation(_)));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn duplicate_slug_is_a_conflict(pool: PgPool) {
    let engine = build_engine(pool);
    engine
        .create_collection(collection_input("capsule", "Capsule"))
        .await
        .unwrap();
    let err = engine
        .create_collection(collection_input("Capsule!", "Capsule bis"))
        .await
        .unwrap_err();
    assert_matches!(err, EngineError::Core(CoreError::Conflict(_)));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn partial_update_leaves_other_fields_untouched(pool: PgPool) {
    let engine = build_engine(pool.clone());
    let collection = engine
        .create_collection(collection_input("capsule", "Capsule"))
        .await
        .unwrap();

    engine
        .update_collection(
            collection.id,
            UpdateCollectionInput {
                status: Some("active".to_string()),
                fr: Some(CollectionTranslationFields {
                    tagline: Some("Ligne pure".to_string()),
                    ..Default::default()
                }),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let updated = CollectionRepo::find_by_id(&pool, collection.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.slug, "capsule");
    assert_eq!(updated.status, "active");

    let fr = CollectionRepo::read_translation(&pool, collection.id, Locale::Fr)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fr.name, "Capsule");
    assert_eq!(fr.tagline.as_deref(), Some("Ligne pure"));

    // The English row was not part of the update.
    let en = CollectionRepo::read_translation(&pool, collection.id, Locale::En)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(en.tagline, None);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn update_unknown_collection_is_not_found(pool: PgPool) {
    let engine = build_engine(pool);
    let err = engine
        .update_collection(424242, UpdateCollectionInput::default())
        .await
        .unwrap_err();
    assert_matches!(
        err,
        EngineError::Core(CoreError::NotFound {
            entity: "Collection",
            ..
        })
    );
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn sections_are_appended_in_order(pool: PgPool) {
    let engine = build_engine(pool.clone());
    let collection = engine
        .create_collection(collection_input("capsule", "Capsule"))
        .await
        .unwrap();

    for heading in ["Ouverture", "Matières", "Silhouettes"] {
        engine
            .create_section(collection.id, section_input(heading, None))
            .await
            .unwrap();
    }

    let sections = SectionRepo::list_for_collection(&pool, collection.id, Locale::Fr)
        .await
        .unwrap();
    let orders: Vec<i32> = sections.iter().map(|s| s.sort_order).collect();
    assert_eq!(orders, vec![1, 2, 3]);
    assert_eq!(sections[0].heading, "Ouverture");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn section_heading_backfills_across_supplied_locales(pool: PgPool) {
    let engine = build_engine(pool.clone());
    let collection = engine
        .create_collection(collection_input("capsule", "Capsule"))
        .await
        .unwrap();

    let mut input = section_input("Ouverture", None);
    input.en = Some(SectionTranslationFields {
        caption: Some("Opening".to_string()),
        ..Default::default()
    });
    let section = engine.create_section(collection.id, input).await.unwrap();

    let views = SectionRepo::list_for_collection(&pool, collection.id, Locale::En)
        .await
        .unwrap();
    assert_eq!(views[0].id, section.id);
    assert_eq!(views[0].heading, "Ouverture");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn reorder_moves_only_the_target(pool: PgPool) {
    let engine = build_engine(pool.clone());
    let collection = engine
        .create_collection(collection_input("capsule", "Capsule"))
        .await
        .unwrap();
    let first = engine
        .create_section(collection.id, section_input("Un", None))
        .await
        .unwrap();
    let second = engine
        .create_section(collection.id, section_input("Deux", None))
        .await
        .unwrap();

    engine.reorder_section(first.id, 9).await.unwrap();

    let first = SectionRepo::find_by_id(&pool, first.id).await.unwrap().unwrap();
    let second = SectionRepo::find_by_id(&pool, second.id).await.unwrap().unwrap();
    assert_eq!(first.sort_order, 9);
    assert_eq!(second.sort_order, 2, "sibling order must not shift");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn section_for_unknown_collection_is_not_found(pool: PgPool) {
    let engine = build_engine(pool);
    let err = engine
        .create_section(424242, section_input("Ouverture", None))
        .await
        .unwrap_err();
    assert_matches!(
        err,
        EngineError::Core(CoreError::NotFound {
            entity: "Collection",
            ..
        })
    );
}

#[sqlx::test(migrations = "../db/migrations")]
async fn section_rejects_unknown_asset_kind(pool: PgPool) {
    let engine = build_engine(pool);
    let collection = engine
        .create_collection(collection_input("capsule", "Capsule"))
        .await
        .unwrap();

    let mut input = section_input("Ouverture", Some(image("https://cdn.test/a.jpg")));
    if let Some(asset) = input.asset.as_mut() {
        asset.kind = "gif".to_string();
    }
    let err = engine.create_section(collection.id, input).await.unwrap_err();
    assert_matches!(err, EngineError::Core(CoreError::Validation(_)));
}

// ---------------------------------------------------------------------------
// Media-asset garbage collection
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn deleting_a_section_collects_its_orphaned_asset(pool: PgPool) {
    let engine = build_engine(pool.clone());
    let collection = engine
        .create_collection(collection_input("capsule", "Capsule"))
        .await
        .unwrap();
    let section = engine
        .create_section(
            collection.id,
            section_input("Ouverture", Some(image("https://cdn.test/a.jpg"))),
        )
        .await
        .unwrap();
    let asset_id = section.asset_id.unwrap();

    engine.delete_section(section.id).await.unwrap();

    assert!(
        MediaAssetRepo::find_by_id(&pool, asset_id).await.unwrap().is_none(),
        "asset with no remaining referencer must be deleted"
    );
}

#[sqlx::test(migrations = "../db/migrations")]
async fn shared_asset_survives_one_referencer_leaving(pool: PgPool) {
    let engine = build_engine(pool.clone());
    let collection = engine
        .create_collection(collection_input("capsule", "Capsule"))
        .await
        .unwrap();
    let first = engine
        .create_section(
            collection.id,
            section_input("Un", Some(image("https://cdn.test/a.jpg"))),
        )
        .await
        .unwrap();
    let second = engine
        .create_section(
            collection.id,
            section_input("Deux", Some(image("https://cdn.test/b.jpg"))),
        )
        .await
        .unwrap();
    let shared = first.asset_id.unwrap();

    // Point the second section at the first's asset, making it shared.
    sqlx::query("UPDATE sections SET asset_id = $1 WHERE id = $2")
        .bind(shared)
        .bind(second.id)
        .execute(&pool)
        .await
        .unwrap();

    engine.delete_section(first.id).await.unwrap();
    assert!(
        MediaAssetRepo::find_by_id(&pool, shared).await.unwrap().is_some(),
        "asset still referenced by another section must survive"
    );

    engine.delete_section(second.id).await.unwrap();
    assert!(
        MediaAssetRepo::find_by_id(&pool, shared).await.unwrap().is_none(),
        "last referencer leaving must collect the asset"
    );
}

#[sqlx::test(migrations = "../db/migrations")]
async fn deleting_a_collection_cascades_and_collects_assets(pool: PgPool) {
    let engine = build_engine(pool.clone());
    let collection = engine
        .create_collection(collection_input("capsule", "Capsule"))
        .await
        .unwrap();
    let section = engine
        .create_section(
            collection.id,
            section_input("Ouverture", Some(image("https://cdn.test/a.jpg"))),
        )
        .await
        .unwrap();
    let slide = engine
        .create_slide(collection.id, slide_input("Look 1", "https://cdn.test/look1.jpg"))
        .await
        .unwrap();

    engine.delete_collection(collection.id).await.unwrap();

    assert!(CollectionRepo::find_by_id(&pool, collection.id)
        .await
        .unwrap()
        .is_none());
    assert!(SectionRepo::find_by_id(&pool, section.id).await.unwrap().is_none());
    assert!(SlideRepo::find_by_id(&pool, slide.id).await.unwrap().is_none());
    assert!(MediaAssetRepo::find_by_id(&pool, section.asset_id.unwrap())
        .await
        .unwrap()
        .is_none());
    assert!(MediaAssetRepo::find_by_id(&pool, slide.asset_id)
        .await
        .unwrap()
        .is_none());
}

// ---------------------------------------------------------------------------
// Lookbook slides
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn slide_translation_falls_back_to_other_locale(pool: PgPool) {
    let engine = build_engine(pool.clone());
    let collection = engine
        .create_collection(collection_input("capsule", "Capsule"))
        .await
        .unwrap();
    engine
        .create_slide(collection.id, slide_input("Regard", "https://cdn.test/look.jpg"))
        .await
        .unwrap();

    let slides = SlideRepo::list_for_collection(&pool, collection.id, Locale::En)
        .await
        .unwrap();
    assert_eq!(slides.len(), 1);
    assert_eq!(slides[0].title, "Regard");
    assert_eq!(slides[0].asset_url, "https://cdn.test/look.jpg");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn slide_hotspot_can_be_set_cleared_and_left_alone(pool: PgPool) {
    let engine = build_engine(pool);
    let collection = engine
        .create_collection(collection_input("capsule", "Capsule"))
        .await
        .unwrap();
    let slide = engine
        .create_slide(collection.id, slide_input("Regard", "https://cdn.test/look.jpg"))
        .await
        .unwrap();
    assert_eq!(slide.hotspot_product_id, None);

    let slide = engine
        .update_slide(
            slide.id,
            UpdateSlideInput {
                hotspot_product_id: Some(Some(42)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(slide.hotspot_product_id, Some(42));

    // An absent field leaves the hotspot as it is.
    let slide = engine
        .update_slide(slide.id, UpdateSlideInput::default())
        .await
        .unwrap();
    assert_eq!(slide.hotspot_product_id, Some(42));

    // An explicit null removes it.
    let slide = engine
        .update_slide(
            slide.id,
            UpdateSlideInput {
                hotspot_product_id: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(slide.hotspot_product_id, None);
}

// ---------------------------------------------------------------------------
// Product links
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn product_link_is_idempotent(pool: PgPool) {
    let engine = build_engine(pool);
    let collection = engine
        .create_collection(collection_input("capsule", "Capsule"))
        .await
        .unwrap();

    let first = engine
        .add_product_to_collection(collection.id, 7001)
        .await
        .unwrap();
    let second = engine
        .add_product_to_collection(collection.id, 7001)
        .await
        .unwrap();
    assert_eq!(first.id, second.id, "re-linking must return the existing row");
    assert_eq!(second.sort_order, first.sort_order);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn highlight_toggles_and_removal_is_checked(pool: PgPool) {
    let engine = build_engine(pool);
    let collection = engine
        .create_collection(collection_input("capsule", "Capsule"))
        .await
        .unwrap();
    let link = engine
        .add_product_to_collection(collection.id, 7001)
        .await
        .unwrap();
    assert!(!link.highlighted);

    let link = engine.toggle_product_highlight(link.id).await.unwrap();
    assert!(link.highlighted);
    let link = engine.toggle_product_highlight(link.id).await.unwrap();
    assert!(!link.highlighted);

    engine
        .remove_product_from_collection(collection.id, 7001)
        .await
        .unwrap();
    let err = engine
        .remove_product_from_collection(collection.id, 7001)
        .await
        .unwrap_err();
    assert_matches!(err, EngineError::Core(CoreError::NotFound { .. }));
}
