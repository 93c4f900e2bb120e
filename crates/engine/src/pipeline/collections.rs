//! Collection mutations: collections, sections, lookbook slides and
//! product links.

use maison_core::error::CoreError;
use maison_core::forms::{FieldBag, LocaleFields};
use maison_core::locale::{Locale, LocalePair};
use maison_core::slug;
use maison_core::types::{DbId, Timestamp};
use maison_db::models::collection::{
    Collection, CollectionTranslationFields, CreateCollection, UpdateCollection,
};
use maison_db::models::media_asset::CreateMediaAsset;
use maison_db::models::product_link::CollectionProduct;
use maison_db::models::section::{CreateSection, Section, SectionTranslationFields, UpdateSection};
use maison_db::models::slide::{CreateSlide, LookbookSlide, SlideTranslationFields, UpdateSlide};
use maison_db::repositories::{CollectionRepo, ProductLinkRepo, SectionRepo, SlideRepo};

use crate::cache::CacheTag;
use crate::{ContentEngine, EngineResult};

use super::{validate_asset_kind, validate_status};

/// Tags invalidated by any write reachable through a collection: the
/// collections listing, and the homepage (a module may narrate the
/// collection).
const COLLECTION_TAGS: [CacheTag; 2] = [CacheTag::Collections, CacheTag::Homepage];

/// Admin input for creating a collection. At least one locale's fields
/// must be supplied; the other is backfilled.
#[derive(Debug, Clone, Default)]
pub struct CollectionInput {
    /// Raw slug input; normalized before the write.
    pub slug: String,
    pub status: Option<String>,
    pub release_date: Option<Timestamp>,
    pub fr: Option<CollectionTranslationFields>,
    pub en: Option<CollectionTranslationFields>,
}

impl CollectionInput {
    /// Build from a flat admin form bag (`frName`, `enTagline`, ...).
    /// Unlocalized fields are read from their plain keys; a locale with
    /// no supplied field at all is left for backfill.
    pub fn from_form(bag: &FieldBag) -> CollectionInput {
        let fields = LocaleFields::parse(bag);
        let translation = |locale: Locale| {
            fields.has_locale(locale).then(|| CollectionTranslationFields {
                name: fields.get(locale, "name").map(str::to_string),
                tagline: fields.get(locale, "tagline").map(str::to_string),
                description: fields.get(locale, "description").map(str::to_string),
            })
        };
        CollectionInput {
            slug: bag.get("slug").cloned().unwrap_or_default(),
            status: plain(bag, "status"),
            release_date: plain(bag, "releaseDate").and_then(|raw| raw.parse().ok()),
            fr: translation(Locale::Fr),
            en: translation(Locale::En),
        }
    }
}

/// Read an unlocalized form field, treating empty values as absent.
fn plain(bag: &FieldBag, key: &str) -> Option<String> {
    bag.get(key)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Admin input for updating a collection. `None` leaves the field
/// unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateCollectionInput {
    pub slug: Option<String>,
    pub status: Option<String>,
    pub release_date: Option<Timestamp>,
    pub fr: Option<CollectionTranslationFields>,
    pub en: Option<CollectionTranslationFields>,
}

/// Admin input for creating a section.
#[derive(Debug, Clone, Default)]
pub struct SectionInput {
    pub layout: Option<String>,
    pub asset: Option<CreateMediaAsset>,
    pub fr: Option<SectionTranslationFields>,
    pub en: Option<SectionTranslationFields>,
}

impl SectionInput {
    /// Build from a flat admin form bag (`frHeading`, `enCaption`, ...).
    /// The asset, if any, is attached by the caller.
    pub fn from_form(bag: &FieldBag) -> SectionInput {
        let fields = LocaleFields::parse(bag);
        let translation = |locale: Locale| {
            fields.has_locale(locale).then(|| SectionTranslationFields {
                heading: fields.get(locale, "heading").map(str::to_string),
                body: fields.get(locale, "body").map(str::to_string),
                caption: fields.get(locale, "caption").map(str::to_string),
            })
        };
        SectionInput {
            layout: plain(bag, "layout"),
            asset: None,
            fr: translation(Locale::Fr),
            en: translation(Locale::En),
        }
    }
}

/// Admin input for updating a section.
#[derive(Debug, Clone, Default)]
pub struct UpdateSectionInput {
    pub layout: Option<String>,
    pub asset: Option<CreateMediaAsset>,
    pub fr: Option<SectionTranslationFields>,
    pub en: Option<SectionTranslationFields>,
}

/// Admin input for creating a lookbook slide. The asset is required.
#[derive(Debug, Clone)]
pub struct SlideInput {
    pub asset: CreateMediaAsset,
    pub hotspot_product_id: Option<DbId>,
    pub fr: Option<SlideTranslationFields>,
    pub en: Option<SlideTranslationFields>,
}

/// Admin input for updating a lookbook slide. `hotspot_product_id` is
/// doubly optional: `None` keeps the current hotspot, `Some(None)`
/// removes it.
#[derive(Debug, Clone, Default)]
pub struct UpdateSlideInput {
    pub asset: Option<CreateMediaAsset>,
    pub hotspot_product_id: Option<Option<DbId>>,
    pub fr: Option<SlideTranslationFields>,
    pub en: Option<SlideTranslationFields>,
}

impl ContentEngine {
    // -----------------------------------------------------------------------
    // Collections
    // -----------------------------------------------------------------------

    pub async fn create_collection(&self, input: CollectionInput) -> EngineResult<Collection> {
        let slug = slug::normalize(&input.slug)?;
        let status = input.status.unwrap_or_else(|| "draft".to_string());
        validate_status(&status)?;

        let mut translations = LocalePair::from_input(input.fr, input.en)?;
        if !translations.backfill_field(|fields| &mut fields.name) {
            return Err(CoreError::Validation("Collection name is required".to_string()).into());
        }

        let collection = CollectionRepo::create(
            self.pool(),
            &CreateCollection {
                slug,
                status,
                release_date: input.release_date,
                translations,
            },
        )
        .await?;

        tracing::info!(
            collection_id = collection.id,
            slug = %collection.slug,
            "Collection created"
        );
        self.invalidate(&COLLECTION_TAGS);
        Ok(collection)
    }

    pub async fn update_collection(
        &self,
        id: DbId,
        input: UpdateCollectionInput,
    ) -> EngineResult<Collection> {
        let slug = input.slug.as_deref().map(slug::normalize).transpose()?;
        if let Some(status) = &input.status {
            validate_status(status)?;
        }

        let collection = CollectionRepo::update(
            self.pool(),
            id,
            &UpdateCollection {
                slug,
                status: input.status,
                release_date: input.release_date,
                fr: input.fr,
                en: input.en,
            },
        )
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Collection",
            id,
        })?;

        tracing::info!(collection_id = id, "Collection updated");
        self.invalidate(&COLLECTION_TAGS);
        Ok(collection)
    }

    pub async fn delete_collection(&self, id: DbId) -> EngineResult<()> {
        if !CollectionRepo::delete(self.pool(), id).await? {
            return Err(CoreError::NotFound {
                entity: "Collection",
                id,
            }
            .into());
        }
        tracing::info!(collection_id = id, "Collection deleted");
        self.invalidate(&COLLECTION_TAGS);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Sections
    // -----------------------------------------------------------------------

    pub async fn create_section(
        &self,
        collection_id: DbId,
        input: SectionInput,
    ) -> EngineResult<Section> {
        self.require_collection(collection_id).await?;
        if let Some(asset) = &input.asset {
            validate_asset_kind(&asset.kind)?;
        }

        let mut translations = LocalePair::from_input(input.fr, input.en)?;
        if !translations.backfill_field(|fields| &mut fields.heading) {
            return Err(CoreError::Validation("Section heading is required".to_string()).into());
        }

        let section = SectionRepo::create(
            self.pool(),
            collection_id,
            &CreateSection {
                layout: input.layout.unwrap_or_else(|| "standard".to_string()),
                asset: input.asset,
                translations,
            },
        )
        .await?;

        tracing::info!(section_id = section.id, collection_id, "Section created");
        self.invalidate(&COLLECTION_TAGS);
        Ok(section)
    }

    pub async fn update_section(
        &self,
        id: DbId,
        input: UpdateSectionInput,
    ) -> EngineResult<Section> {
        if let Some(asset) = &input.asset {
            validate_asset_kind(&asset.kind)?;
        }

        let section = SectionRepo::update(
            self.pool(),
            id,
            &UpdateSection {
                layout: input.layout,
                asset: input.asset,
                fr: input.fr,
                en: input.en,
            },
        )
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Section",
            id,
        })?;

        self.invalidate(&COLLECTION_TAGS);
        Ok(section)
    }

    pub async fn delete_section(&self, id: DbId) -> EngineResult<()> {
        if !SectionRepo::delete(self.pool(), id).await? {
            return Err(CoreError::NotFound {
                entity: "Section",
                id,
            }
            .into());
        }
        self.invalidate(&COLLECTION_TAGS);
        Ok(())
    }

    /// Direct sort-order write; no gap or uniqueness validation.
    pub async fn reorder_section(&self, id: DbId, sort_order: i32) -> EngineResult<()> {
        if !SectionRepo::reorder(self.pool(), id, sort_order).await? {
            return Err(CoreError::NotFound {
                entity: "Section",
                id,
            }
            .into());
        }
        self.invalidate(&COLLECTION_TAGS);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Lookbook slides
    // -----------------------------------------------------------------------

    pub async fn create_slide(
        &self,
        collection_id: DbId,
        input: SlideInput,
    ) -> EngineResult<LookbookSlide> {
        self.require_collection(collection_id).await?;
        validate_asset_kind(&input.asset.kind)?;

        let mut translations = LocalePair::from_input(input.fr, input.en)?;
        if !translations.backfill_field(|fields| &mut fields.title) {
            return Err(CoreError::Validation("Slide title is required".to_string()).into());
        }

        let slide = SlideRepo::create(
            self.pool(),
            collection_id,
            &CreateSlide {
                asset: input.asset,
                hotspot_product_id: input.hotspot_product_id,
                translations,
            },
        )
        .await?;

        tracing::info!(slide_id = slide.id, collection_id, "Lookbook slide created");
        self.invalidate(&COLLECTION_TAGS);
        Ok(slide)
    }

    pub async fn update_slide(
        &self,
        id: DbId,
        input: UpdateSlideInput,
    ) -> EngineResult<LookbookSlide> {
        if let Some(asset) = &input.asset {
            validate_asset_kind(&asset.kind)?;
        }

        let slide = SlideRepo::update(
            self.pool(),
            id,
            &UpdateSlide {
                asset: input.asset,
                hotspot_product_id: input.hotspot_product_id,
                fr: input.fr,
                en: input.en,
            },
        )
        .await?
        .ok_or(CoreError::NotFound {
            entity: "LookbookSlide",
            id,
        })?;

        self.invalidate(&COLLECTION_TAGS);
        Ok(slide)
    }

    pub async fn delete_slide(&self, id: DbId) -> EngineResult<()> {
        if !SlideRepo::delete(self.pool(), id).await? {
            return Err(CoreError::NotFound {
                entity: "LookbookSlide",
                id,
            }
            .into());
        }
        self.invalidate(&COLLECTION_TAGS);
        Ok(())
    }

    pub async fn reorder_slide(&self, id: DbId, sort_order: i32) -> EngineResult<()> {
        if !SlideRepo::reorder(self.pool(), id, sort_order).await? {
            return Err(CoreError::NotFound {
                entity: "LookbookSlide",
                id,
            }
            .into());
        }
        self.invalidate(&COLLECTION_TAGS);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Product links
    // -----------------------------------------------------------------------

    /// Link a product to a collection. Idempotent: linking an existing
    /// pair returns the existing row unchanged.
    pub async fn add_product_to_collection(
        &self,
        collection_id: DbId,
        product_id: DbId,
    ) -> EngineResult<CollectionProduct> {
        self.require_collection(collection_id).await?;
        let link = ProductLinkRepo::add(self.pool(), collection_id, product_id).await?;
        self.invalidate(&COLLECTION_TAGS);
        Ok(link)
    }

    pub async fn remove_product_from_collection(
        &self,
        collection_id: DbId,
        product_id: DbId,
    ) -> EngineResult<()> {
        if !ProductLinkRepo::remove(self.pool(), collection_id, product_id).await? {
            return Err(CoreError::NotFound {
                entity: "CollectionProduct",
                id: product_id,
            }
            .into());
        }
        self.invalidate(&COLLECTION_TAGS);
        Ok(())
    }

    pub async fn toggle_product_highlight(&self, link_id: DbId) -> EngineResult<CollectionProduct> {
        let link = ProductLinkRepo::toggle_highlight(self.pool(), link_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "CollectionProduct",
                id: link_id,
            })?;
        self.invalidate(&COLLECTION_TAGS);
        Ok(link)
    }

    pub async fn reorder_product_link(&self, link_id: DbId, sort_order: i32) -> EngineResult<()> {
        if !ProductLinkRepo::reorder(self.pool(), link_id, sort_order).await? {
            return Err(CoreError::NotFound {
                entity: "CollectionProduct",
                id: link_id,
            }
            .into());
        }
        self.invalidate(&COLLECTION_TAGS);
        Ok(())
    }

    async fn require_collection(&self, id: DbId) -> EngineResult<()> {
        CollectionRepo::find_by_id(self.pool(), id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Collection",
                id,
            })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bag(entries: &[(&str, &str)]) -> FieldBag {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn collection_form_splits_locales() {
        let input = CollectionInput::from_form(&bag(&[
            ("slug", "capsule"),
            ("status", "active"),
            ("frName", "Capsule"),
            ("frTagline", "Ligne pure"),
            ("enName", "Capsule EN"),
        ]));
        assert_eq!(input.slug, "capsule");
        assert_eq!(input.status.as_deref(), Some("active"));
        assert_eq!(input.fr.as_ref().unwrap().name.as_deref(), Some("Capsule"));
        assert_eq!(input.en.as_ref().unwrap().name.as_deref(), Some("Capsule EN"));
        assert_eq!(input.en.as_ref().unwrap().tagline, None);
    }

    #[test]
    fn form_with_one_locale_leaves_other_for_backfill() {
        let input = CollectionInput::from_form(&bag(&[("slug", "capsule"), ("frName", "Capsule")]));
        assert!(input.fr.is_some());
        assert!(input.en.is_none());
    }

    #[test]
    fn empty_plain_fields_are_absent() {
        let input = CollectionInput::from_form(&bag(&[("slug", "capsule"), ("status", "  ")]));
        assert_eq!(input.status, None);
        assert_eq!(input.release_date, None);
    }

    #[test]
    fn release_date_parses_rfc3339() {
        let input = CollectionInput::from_form(&bag(&[
            ("slug", "capsule"),
            ("releaseDate", "2026-09-01T10:00:00Z"),
        ]));
        assert!(input.release_date.is_some());
        let input = CollectionInput::from_form(&bag(&[("releaseDate", "next friday")]));
        assert_eq!(input.release_date, None);
    }

    #[test]
    fn section_form_reads_layout_and_translations() {
        let input = SectionInput::from_form(&bag(&[
            ("layout", "full-bleed"),
            ("frHeading", "Ouverture"),
            ("frBody", "Texte."),
        ]));
        assert_eq!(input.layout.as_deref(), Some("full-bleed"));
        assert_eq!(
            input.fr.as_ref().unwrap().heading.as_deref(),
            Some("Ouverture")
        );
        assert!(input.en.is_none());
    }
}
