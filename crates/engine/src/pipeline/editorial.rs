//! Editorial mutations: posts, their blocks and feature links.
//!
//! Blocks and features are edited as one form by a single author, so
//! updates replace them wholesale. Rich-text bodies are parsed here:
//! plain text wraps into paragraph nodes and malformed structured
//! input degrades to the empty document rather than failing the save.

use maison_core::error::CoreError;
use maison_core::locale::LocalePair;
use maison_core::richtext::Document;
use maison_core::slug;
use maison_core::types::{DbId, Timestamp};
use maison_db::models::media_asset::CreateMediaAsset;
use maison_db::models::post::{
    BlockTranslationFields, CreateBlock, CreateFeature, CreatePost, EditorialPost,
    PostTranslationFields, UpdatePost,
};
use maison_db::repositories::PostRepo;
use serde_json::Value;

use crate::cache::CacheTag;
use crate::{ContentEngine, EngineResult};

use super::{validate_asset_kind, validate_status};

/// Tags invalidated by editorial writes: the editorial listings, and
/// the homepage (the spotlight module may narrate the post).
const EDITORIAL_TAGS: [CacheTag; 2] = [CacheTag::Editorial, CacheTag::Homepage];

/// Admin input for one locale's post translation. `body` is raw form
/// input, structured or plain.
#[derive(Debug, Clone, Default)]
pub struct PostTranslationInput {
    pub title: Option<String>,
    pub standfirst: Option<String>,
    pub body: Option<Value>,
}

impl PostTranslationInput {
    fn into_fields(self) -> PostTranslationFields {
        PostTranslationFields {
            title: self.title,
            standfirst: self.standfirst,
            body_doc: self.body.map(|raw| Document::from_input(&raw).to_value()),
        }
    }
}

/// Admin input for one block of a post.
#[derive(Debug, Clone, Default)]
pub struct BlockInput {
    pub kind: Option<String>,
    pub asset: Option<CreateMediaAsset>,
    pub data: Option<Value>,
    pub fr: Option<BlockTranslationFields>,
    pub en: Option<BlockTranslationFields>,
}

impl BlockInput {
    fn into_create(self) -> Result<CreateBlock, CoreError> {
        if let Some(asset) = &self.asset {
            validate_asset_kind(&asset.kind)?;
        }
        Ok(CreateBlock {
            kind: self.kind.unwrap_or_else(|| "text".to_string()),
            asset: self.asset,
            data: self.data,
            // Block fields are all optional; an untranslated block is
            // stored with empty rows on both sides.
            translations: LocalePair::from_input_or_default(self.fr, self.en),
        })
    }
}

/// Admin input for creating a post.
#[derive(Debug, Clone, Default)]
pub struct PostInput {
    pub slug: String,
    pub category: Option<String>,
    pub status: Option<String>,
    /// Explicit publish timestamp; wins over automatic stamping.
    pub published_at: Option<Timestamp>,
    pub hero_asset: Option<CreateMediaAsset>,
    pub fr: Option<PostTranslationInput>,
    pub en: Option<PostTranslationInput>,
    pub blocks: Vec<BlockInput>,
    pub features: Vec<CreateFeature>,
}

/// Admin input for updating a post. Scalar `None`s leave the field
/// unchanged; blocks and features always replace the existing sets.
#[derive(Debug, Clone, Default)]
pub struct UpdatePostInput {
    pub slug: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
    pub published_at: Option<Timestamp>,
    pub hero_asset: Option<CreateMediaAsset>,
    pub fr: Option<PostTranslationInput>,
    pub en: Option<PostTranslationInput>,
    pub blocks: Vec<BlockInput>,
    pub features: Vec<CreateFeature>,
}

impl ContentEngine {
    pub async fn create_post(&self, input: PostInput) -> EngineResult<EditorialPost> {
        let slug = slug::normalize(&input.slug)?;
        let status = input.status.unwrap_or_else(|| "draft".to_string());
        validate_status(&status)?;
        if let Some(asset) = &input.hero_asset {
            validate_asset_kind(&asset.kind)?;
        }

        let mut translations = LocalePair::from_input(
            input.fr.map(PostTranslationInput::into_fields),
            input.en.map(PostTranslationInput::into_fields),
        )?;
        if !translations.backfill_field(|fields| &mut fields.title) {
            return Err(CoreError::Validation("Post title is required".to_string()).into());
        }

        let blocks = input
            .blocks
            .into_iter()
            .map(BlockInput::into_create)
            .collect::<Result<Vec<_>, _>>()?;

        let post = PostRepo::create(
            self.pool(),
            &CreatePost {
                slug,
                category: input.category.unwrap_or_else(|| "journal".to_string()),
                status,
                published_at: input.published_at,
                hero_asset: input.hero_asset,
                translations,
                blocks,
                features: input.features,
            },
        )
        .await?;

        tracing::info!(post_id = post.id, slug = %post.slug, "Editorial post created");
        self.invalidate(&EDITORIAL_TAGS);
        Ok(post)
    }

    pub async fn update_post(
        &self,
        id: DbId,
        input: UpdatePostInput,
    ) -> EngineResult<EditorialPost> {
        let slug = input.slug.as_deref().map(slug::normalize).transpose()?;
        if let Some(status) = &input.status {
            validate_status(status)?;
        }
        if let Some(asset) = &input.hero_asset {
            validate_asset_kind(&asset.kind)?;
        }

        let blocks = input
            .blocks
            .into_iter()
            .map(BlockInput::into_create)
            .collect::<Result<Vec<_>, _>>()?;

        let post = PostRepo::update(
            self.pool(),
            id,
            &UpdatePost {
                slug,
                category: input.category,
                status: input.status,
                published_at: input.published_at,
                hero_asset: input.hero_asset,
                fr: input.fr.map(PostTranslationInput::into_fields),
                en: input.en.map(PostTranslationInput::into_fields),
                blocks,
                features: input.features,
            },
        )
        .await?
        .ok_or(CoreError::NotFound {
            entity: "EditorialPost",
            id,
        })?;

        tracing::info!(post_id = id, "Editorial post updated");
        self.invalidate(&EDITORIAL_TAGS);
        Ok(post)
    }

    pub async fn delete_post(&self, id: DbId) -> EngineResult<()> {
        if !PostRepo::delete(self.pool(), id).await? {
            return Err(CoreError::NotFound {
                entity: "EditorialPost",
                id,
            }
            .into());
        }
        tracing::info!(post_id = id, "Editorial post deleted");
        self.invalidate(&EDITORIAL_TAGS);
        Ok(())
    }
}
