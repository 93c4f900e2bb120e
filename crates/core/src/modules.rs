//! The homepage module registry.
//!
//! The homepage is assembled from ten fixed, admin-configured slots.
//! Each slot exists once per (kind, locale); its payload is stored as
//! JSONB and deserialized here into a tagged [`ModuleConfig`] so that
//! a malformed payload fails at resolution time instead of surfacing
//! as a missing field in the rendered page.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CoreError;
use crate::types::DbId;

/// The ten fixed homepage module kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleKind {
    Hero,
    Manifesto,
    FeaturedCollection,
    Lookbook,
    DropCountdown,
    EditorialSpotlight,
    ProductRail,
    Craftsmanship,
    Testimonials,
    Newsletter,
}

impl ModuleKind {
    /// Every kind, in homepage display order. A locale whose module set
    /// is missing any of these cannot be resolved.
    pub const ALL: [ModuleKind; 10] = [
        ModuleKind::Hero,
        ModuleKind::Manifesto,
        ModuleKind::FeaturedCollection,
        ModuleKind::Lookbook,
        ModuleKind::DropCountdown,
        ModuleKind::EditorialSpotlight,
        ModuleKind::ProductRail,
        ModuleKind::Craftsmanship,
        ModuleKind::Testimonials,
        ModuleKind::Newsletter,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleKind::Hero => "hero",
            ModuleKind::Manifesto => "manifesto",
            ModuleKind::FeaturedCollection => "featured_collection",
            ModuleKind::Lookbook => "lookbook",
            ModuleKind::DropCountdown => "drop_countdown",
            ModuleKind::EditorialSpotlight => "editorial_spotlight",
            ModuleKind::ProductRail => "product_rail",
            ModuleKind::Craftsmanship => "craftsmanship",
            ModuleKind::Testimonials => "testimonials",
            ModuleKind::Newsletter => "newsletter",
        }
    }

    pub fn parse(key: &str) -> Result<ModuleKind, CoreError> {
        ModuleKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == key)
            .ok_or_else(|| CoreError::Validation(format!("Unknown module kind: {key:?}")))
    }
}

impl std::fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derived scheduling state of a module. Never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleStatus {
    Scheduled,
    Active,
    Ended,
}

/// Derive a module's status from its activity window.
///
/// Scheduled if `active_from` is in the future, Ended if `active_to`
/// is in the past, otherwise Active. Open-ended windows (either bound
/// absent) are Active on that side.
pub fn derive_status(
    now: DateTime<Utc>,
    active_from: Option<DateTime<Utc>>,
    active_to: Option<DateTime<Utc>>,
) -> ModuleStatus {
    if let Some(from) = active_from {
        if from > now {
            return ModuleStatus::Scheduled;
        }
    }
    if let Some(to) = active_to {
        if to < now {
            return ModuleStatus::Ended;
        }
    }
    ModuleStatus::Active
}

// ---------------------------------------------------------------------------
// Per-kind configuration payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeroConfig {
    pub headline: String,
    #[serde(default)]
    pub subheadline: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub cta_label: Option<String>,
    #[serde(default)]
    pub cta_href: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestoConfig {
    pub heading: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeaturedCollectionConfig {
    /// The narrated collection. Absent or dangling degrades the module
    /// to this raw config.
    #[serde(default)]
    pub collection_id: Option<DbId>,
    #[serde(default)]
    pub heading: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookbookConfig {
    #[serde(default)]
    pub collection_id: Option<DbId>,
    #[serde(default)]
    pub autoplay: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropCountdownConfig {
    /// A drop is a collection carrying a release date.
    #[serde(default)]
    pub collection_id: Option<DbId>,
    #[serde(default)]
    pub heading: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorialSpotlightConfig {
    #[serde(default)]
    pub post_id: Option<DbId>,
    #[serde(default)]
    pub heading: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRailConfig {
    pub heading: String,
    #[serde(default)]
    pub product_ids: Vec<DbId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CraftsmanshipConfig {
    pub heading: String,
    pub body: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Testimonial {
    pub quote: String,
    #[serde(default)]
    pub author: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestimonialsConfig {
    pub entries: Vec<Testimonial>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsletterConfig {
    pub heading: String,
    #[serde(default)]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub success_message: Option<String>,
}

/// A validated module payload, tagged by kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "config")]
pub enum ModuleConfig {
    Hero(HeroConfig),
    Manifesto(ManifestoConfig),
    FeaturedCollection(FeaturedCollectionConfig),
    Lookbook(LookbookConfig),
    DropCountdown(DropCountdownConfig),
    EditorialSpotlight(EditorialSpotlightConfig),
    ProductRail(ProductRailConfig),
    Craftsmanship(CraftsmanshipConfig),
    Testimonials(TestimonialsConfig),
    Newsletter(NewsletterConfig),
}

/// Deserialize a stored JSONB payload into one kind's config type.
///
/// A payload that does not match the kind's schema is a configuration
/// error: the homepage must never render with a half-readable module.
pub fn parse_config<T: serde::de::DeserializeOwned>(
    kind: ModuleKind,
    config: &Value,
) -> Result<T, CoreError> {
    serde_json::from_value(config.clone())
        .map_err(|err| CoreError::Configuration(format!("Invalid config for module {kind}: {err}")))
}

impl ModuleConfig {
    /// Deserialize a stored JSONB payload against its row's kind.
    pub fn from_stored(kind: ModuleKind, config: &Value) -> Result<ModuleConfig, CoreError> {
        Ok(match kind {
            ModuleKind::Hero => ModuleConfig::Hero(parse_config(kind, config)?),
            ModuleKind::Manifesto => ModuleConfig::Manifesto(parse_config(kind, config)?),
            ModuleKind::FeaturedCollection => {
                ModuleConfig::FeaturedCollection(parse_config(kind, config)?)
            }
            ModuleKind::Lookbook => ModuleConfig::Lookbook(parse_config(kind, config)?),
            ModuleKind::DropCountdown => ModuleConfig::DropCountdown(parse_config(kind, config)?),
            ModuleKind::EditorialSpotlight => {
                ModuleConfig::EditorialSpotlight(parse_config(kind, config)?)
            }
            ModuleKind::ProductRail => ModuleConfig::ProductRail(parse_config(kind, config)?),
            ModuleKind::Craftsmanship => ModuleConfig::Craftsmanship(parse_config(kind, config)?),
            ModuleKind::Testimonials => ModuleConfig::Testimonials(parse_config(kind, config)?),
            ModuleKind::Newsletter => ModuleConfig::Newsletter(parse_config(kind, config)?),
        })
    }

    pub fn kind(&self) -> ModuleKind {
        match self {
            ModuleConfig::Hero(_) => ModuleKind::Hero,
            ModuleConfig::Manifesto(_) => ModuleKind::Manifesto,
            ModuleConfig::FeaturedCollection(_) => ModuleKind::FeaturedCollection,
            ModuleConfig::Lookbook(_) => ModuleKind::Lookbook,
            ModuleConfig::DropCountdown(_) => ModuleKind::DropCountdown,
            ModuleConfig::EditorialSpotlight(_) => ModuleKind::EditorialSpotlight,
            ModuleConfig::ProductRail(_) => ModuleKind::ProductRail,
            ModuleConfig::Craftsmanship(_) => ModuleKind::Craftsmanship,
            ModuleConfig::Testimonials(_) => ModuleKind::Testimonials,
            ModuleConfig::Newsletter(_) => ModuleKind::Newsletter,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use serde_json::json;

    #[test]
    fn all_kinds_have_distinct_keys() {
        let mut keys: Vec<&str> = ModuleKind::ALL.iter().map(|k| k.as_str()).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), 10);
    }

    #[test]
    fn kind_round_trips_through_key() {
        for kind in ModuleKind::ALL {
            assert_eq!(ModuleKind::parse(kind.as_str()).unwrap(), kind);
        }
        assert!(ModuleKind::parse("carousel").is_err());
    }

    #[test]
    fn status_scheduled_when_from_future() {
        let now = Utc::now();
        let status = derive_status(now, Some(now + Duration::hours(1)), None);
        assert_eq!(status, ModuleStatus::Scheduled);
    }

    #[test]
    fn status_ended_when_to_past() {
        let now = Utc::now();
        let status = derive_status(now, None, Some(now - Duration::hours(1)));
        assert_eq!(status, ModuleStatus::Ended);
    }

    #[test]
    fn status_active_inside_window() {
        let now = Utc::now();
        let status = derive_status(
            now,
            Some(now - Duration::hours(1)),
            Some(now + Duration::hours(1)),
        );
        assert_eq!(status, ModuleStatus::Active);
    }

    #[test]
    fn status_active_with_open_window() {
        assert_eq!(derive_status(Utc::now(), None, None), ModuleStatus::Active);
    }

    #[test]
    fn stored_config_parses_against_kind() {
        let config = ModuleConfig::from_stored(
            ModuleKind::Hero,
            &json!({"headline": "Automne-Hiver", "cta_label": "Découvrir"}),
        )
        .unwrap();
        assert_eq!(config.kind(), ModuleKind::Hero);
    }

    #[test]
    fn mismatched_config_is_configuration_error() {
        let err = ModuleConfig::from_stored(ModuleKind::Manifesto, &json!({"headline": "x"}))
            .unwrap_err();
        assert!(matches!(err, CoreError::Configuration(_)));
        assert!(err.to_string().contains("manifesto"));
    }

    #[test]
    fn narrating_config_tolerates_absent_reference() {
        let config = ModuleConfig::from_stored(
            ModuleKind::FeaturedCollection,
            &json!({"heading": "La Maison"}),
        )
        .unwrap();
        match config {
            ModuleConfig::FeaturedCollection(cfg) => assert!(cfg.collection_id.is_none()),
            other => panic!("unexpected config: {other:?}"),
        }
    }
}
