//! The content resolver: assembles the full homepage for one locale.
//!
//! Resolution is cache-first. A miss loads every module row for the
//! locale, validates each config against its kind, derives scheduling
//! status once against a single clock reading, then loads the narrated
//! content (collections, the spotlight post) the modules point at.
//! Narrated content referenced by more than one module is loaded once
//! and shared.
//!
//! A locale missing any of the ten registered kinds is a configuration
//! error naming the kind, not a partially rendered page. A module
//! whose reference dangles (deleted collection or post) degrades to
//! its raw config instead of failing the whole resolution.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use maison_core::error::CoreError;
use maison_core::locale::Locale;
use maison_core::modules::{
    derive_status, parse_config, CraftsmanshipConfig, DropCountdownConfig,
    EditorialSpotlightConfig, FeaturedCollectionConfig, HeroConfig, LookbookConfig,
    ManifestoConfig, ModuleKind, ModuleStatus, NewsletterConfig, ProductRailConfig,
    TestimonialsConfig,
};
use maison_core::types::{DbId, Timestamp};
use maison_db::models::module::HomepageModule;
use maison_db::models::post::{BlockView, EditorialFeature, PostWithTranslation};
use maison_db::models::product_link::CollectionProduct;
use maison_db::models::section::SectionView;
use maison_db::models::slide::SlideView;
use maison_db::repositories::{
    CollectionRepo, ModuleRepo, PostRepo, ProductLinkRepo, SectionRepo, SlideRepo,
};
use serde::Serialize;

use crate::cache::CacheTag;
use crate::{ContentEngine, EngineResult};

/// Every tag a resolved homepage depends on. Mutating any of the
/// content families must evict it.
const HOMEPAGE_TAGS: [CacheTag; 3] =
    [CacheTag::Homepage, CacheTag::Collections, CacheTag::Editorial];

/// A collection with its locale-resolved narrative: translation,
/// ordered sections, ordered lookbook slides and product links.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedCollection {
    pub id: DbId,
    pub slug: String,
    pub status: String,
    pub release_date: Option<Timestamp>,
    pub name: String,
    pub tagline: Option<String>,
    pub description: Option<String>,
    pub sections: Vec<SectionView>,
    pub slides: Vec<SlideView>,
    pub products: Vec<CollectionProduct>,
}

/// An editorial post with its locale-resolved body, blocks and
/// featured products.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedPost {
    pub post: PostWithTranslation,
    pub blocks: Vec<BlockView>,
    pub features: Vec<EditorialFeature>,
}

/// A self-contained module slot: validated config plus derived status.
#[derive(Debug, Clone, Serialize)]
pub struct ModuleSlot<C> {
    pub config: C,
    pub status: ModuleStatus,
}

/// A module slot that narrates other content. `narrated` is `None`
/// when the config carries no reference or the reference dangles.
#[derive(Debug, Clone, Serialize)]
pub struct NarratedSlot<C, E> {
    pub config: C,
    pub status: ModuleStatus,
    pub narrated: Option<Arc<E>>,
}

/// The fully resolved homepage for one locale: all ten slots, each
/// validated and narrated.
#[derive(Debug, Clone, Serialize)]
pub struct HomepageContent {
    pub locale: Locale,
    pub hero: ModuleSlot<HeroConfig>,
    pub manifesto: ModuleSlot<ManifestoConfig>,
    pub featured_collection: NarratedSlot<FeaturedCollectionConfig, ResolvedCollection>,
    pub lookbook: NarratedSlot<LookbookConfig, ResolvedCollection>,
    pub drop_countdown: NarratedSlot<DropCountdownConfig, ResolvedCollection>,
    pub editorial_spotlight: NarratedSlot<EditorialSpotlightConfig, ResolvedPost>,
    pub product_rail: ModuleSlot<ProductRailConfig>,
    pub craftsmanship: ModuleSlot<CraftsmanshipConfig>,
    pub testimonials: ModuleSlot<TestimonialsConfig>,
    pub newsletter: ModuleSlot<NewsletterConfig>,
}

impl ContentEngine {
    /// Resolve the homepage for `locale`, serving from cache when a
    /// fresh entry exists.
    pub async fn resolve(&self, locale: Locale) -> EngineResult<Arc<HomepageContent>> {
        if let Some(content) = self.cache().get(locale) {
            tracing::debug!(locale = %locale, "homepage served from cache");
            return Ok(content);
        }

        let content = Arc::new(self.resolve_uncached(locale).await?);
        self.cache()
            .insert(locale, Arc::clone(&content), HOMEPAGE_TAGS.to_vec());
        tracing::info!(locale = %locale, "homepage resolved");
        Ok(content)
    }

    async fn resolve_uncached(&self, locale: Locale) -> EngineResult<HomepageContent> {
        let rows = ModuleRepo::list_for_locale(self.pool(), locale).await?;
        let mut by_kind: HashMap<ModuleKind, HomepageModule> = HashMap::with_capacity(rows.len());
        for row in rows {
            by_kind.insert(ModuleKind::parse(&row.kind)?, row);
        }

        let now = Utc::now();
        let mut take = |kind: ModuleKind| {
            by_kind.remove(&kind).ok_or_else(|| {
                CoreError::Configuration(format!(
                    "Homepage module {kind} is not registered for locale {locale}"
                ))
            })
        };

        let hero = slot::<HeroConfig>(&take(ModuleKind::Hero)?, now)?;
        let manifesto = slot::<ManifestoConfig>(&take(ModuleKind::Manifesto)?, now)?;
        let featured =
            slot::<FeaturedCollectionConfig>(&take(ModuleKind::FeaturedCollection)?, now)?;
        let lookbook = slot::<LookbookConfig>(&take(ModuleKind::Lookbook)?, now)?;
        let countdown = slot::<DropCountdownConfig>(&take(ModuleKind::DropCountdown)?, now)?;
        let spotlight =
            slot::<EditorialSpotlightConfig>(&take(ModuleKind::EditorialSpotlight)?, now)?;
        let product_rail = slot::<ProductRailConfig>(&take(ModuleKind::ProductRail)?, now)?;
        let craftsmanship = slot::<CraftsmanshipConfig>(&take(ModuleKind::Craftsmanship)?, now)?;
        let testimonials = slot::<TestimonialsConfig>(&take(ModuleKind::Testimonials)?, now)?;
        let newsletter = slot::<NewsletterConfig>(&take(ModuleKind::Newsletter)?, now)?;

        // Load each referenced collection once, even when several
        // modules point at the same one.
        let mut wanted: Vec<DbId> = [
            featured.config.collection_id,
            lookbook.config.collection_id,
            countdown.config.collection_id,
        ]
        .into_iter()
        .flatten()
        .collect();
        wanted.sort_unstable();
        wanted.dedup();

        let mut collections: HashMap<DbId, Arc<ResolvedCollection>> = HashMap::new();
        for id in wanted {
            if let Some(resolved) = self.load_collection(id, locale).await? {
                collections.insert(id, Arc::new(resolved));
            } else {
                tracing::warn!(collection_id = id, "module references a missing collection");
            }
        }
        let narrated =
            |id: Option<DbId>| id.and_then(|id| collections.get(&id).map(Arc::clone));

        let spotlight_post = match spotlight.config.post_id {
            Some(id) => {
                let post = self.load_post(id, locale).await?;
                if post.is_none() {
                    tracing::warn!(post_id = id, "spotlight references a missing post");
                }
                post.map(Arc::new)
            }
            None => None,
        };

        Ok(HomepageContent {
            locale,
            featured_collection: NarratedSlot {
                narrated: narrated(featured.config.collection_id),
                config: featured.config,
                status: featured.status,
            },
            lookbook: NarratedSlot {
                narrated: narrated(lookbook.config.collection_id),
                config: lookbook.config,
                status: lookbook.status,
            },
            drop_countdown: NarratedSlot {
                narrated: narrated(countdown.config.collection_id),
                config: countdown.config,
                status: countdown.status,
            },
            editorial_spotlight: NarratedSlot {
                narrated: spotlight_post,
                config: spotlight.config,
                status: spotlight.status,
            },
            hero,
            manifesto,
            product_rail,
            craftsmanship,
            testimonials,
            newsletter,
        })
    }

    /// Load a collection and its full narrative for one locale.
    /// Returns `None` when the collection (or its translation pair)
    /// is gone, so the caller degrades instead of failing.
    async fn load_collection(
        &self,
        id: DbId,
        locale: Locale,
    ) -> EngineResult<Option<ResolvedCollection>> {
        let Some(collection) = CollectionRepo::find_by_id(self.pool(), id).await? else {
            return Ok(None);
        };
        let Some(translation) = CollectionRepo::read_translation(self.pool(), id, locale).await?
        else {
            return Ok(None);
        };

        let sections = SectionRepo::list_for_collection(self.pool(), id, locale).await?;
        let slides = SlideRepo::list_for_collection(self.pool(), id, locale).await?;
        let products = ProductLinkRepo::list_for_collection(self.pool(), id).await?;

        Ok(Some(ResolvedCollection {
            id: collection.id,
            slug: collection.slug,
            status: collection.status,
            release_date: collection.release_date,
            name: translation.name,
            tagline: translation.tagline,
            description: translation.description,
            sections,
            slides,
            products,
        }))
    }

    /// Load an editorial post with blocks and features for one locale.
    async fn load_post(&self, id: DbId, locale: Locale) -> EngineResult<Option<ResolvedPost>> {
        let Some(post) = PostRepo::find_with_translation(self.pool(), id, locale).await? else {
            return Ok(None);
        };
        let blocks = PostRepo::blocks_for_post(self.pool(), id, locale).await?;
        let features = PostRepo::features_for_post(self.pool(), id).await?;
        Ok(Some(ResolvedPost {
            post,
            blocks,
            features,
        }))
    }
}

/// Validate one row's stored config against its kind and derive its
/// scheduling status.
fn slot<C: serde::de::DeserializeOwned>(
    row: &HomepageModule,
    now: Timestamp,
) -> Result<ModuleSlot<C>, CoreError> {
    Ok(ModuleSlot {
        config: parse_config(ModuleKind::parse(&row.kind)?, &row.config)?,
        status: derive_status(now, row.active_from, row.active_to),
    })
}
