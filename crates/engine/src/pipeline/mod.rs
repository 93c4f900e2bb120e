//! The mutation pipeline.
//!
//! Every operation validates pre-write, performs one atomic multi-row
//! write through the repositories, and invalidates the matching cache
//! tags after the transaction has committed.

mod collections;
mod editorial;
mod modules;

pub use collections::{
    CollectionInput, SectionInput, SlideInput, UpdateCollectionInput, UpdateSectionInput,
    UpdateSlideInput,
};
pub use editorial::{BlockInput, PostInput, PostTranslationInput, UpdatePostInput};

use maison_core::error::CoreError;

use crate::cache::CacheTag;
use crate::ContentEngine;

/// Entity statuses accepted on collections and posts.
const STATUSES: [&str; 3] = ["draft", "active", "archived"];

/// Media asset kinds accepted on upload references.
const ASSET_KINDS: [&str; 2] = ["image", "video"];

fn validate_status(status: &str) -> Result<(), CoreError> {
    if STATUSES.contains(&status) {
        return Ok(());
    }
    Err(CoreError::Validation(format!(
        "Invalid status {status:?} (expected one of draft, active, archived)"
    )))
}

fn validate_asset_kind(kind: &str) -> Result<(), CoreError> {
    if ASSET_KINDS.contains(&kind) {
        return Ok(());
    }
    Err(CoreError::Validation(format!(
        "Invalid asset kind {kind:?} (expected image or video)"
    )))
}

impl ContentEngine {
    /// Fire-and-forget tag invalidation, called after a write commits.
    pub(crate) fn invalidate(&self, tags: &[CacheTag]) {
        for tag in tags {
            self.cache().invalidate(*tag);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_statuses_pass() {
        for status in STATUSES {
            assert!(validate_status(status).is_ok());
        }
        assert!(validate_status("published").is_err());
    }

    #[test]
    fn known_asset_kinds_pass() {
        assert!(validate_asset_kind("image").is_ok());
        assert!(validate_asset_kind("video").is_ok());
        assert!(validate_asset_kind("gif").is_err());
    }
}
