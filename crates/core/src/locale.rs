//! Supported site locales and per-locale value pairs.
//!
//! The site ships in exactly two languages. Every translatable entity
//! carries one translation row per locale, written together at
//! creation time so neither side is ever unset.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A supported site locale.
///
/// French is the house language and the fallback target when an
/// English value is missing, and vice versa. Fallback always resolves
/// to the other locale, never to an empty value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    Fr,
    En,
}

impl Locale {
    pub const ALL: [Locale; 2] = [Locale::Fr, Locale::En];

    /// The internal locale key used in database rows and cache keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::Fr => "fr",
            Locale::En => "en",
        }
    }

    /// The locale consulted when this one has no value.
    pub fn fallback(&self) -> Locale {
        match self {
            Locale::Fr => Locale::En,
            Locale::En => Locale::Fr,
        }
    }

    pub fn parse(key: &str) -> Result<Locale, CoreError> {
        match key {
            "fr" => Ok(Locale::Fr),
            "en" => Ok(Locale::En),
            other => Err(CoreError::Validation(format!(
                "Unknown locale: {other:?} (expected \"fr\" or \"en\")"
            ))),
        }
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value carried in both locales.
///
/// Both sides are always present by construction: [`LocalePair::from_input`]
/// backfills a missing locale from the supplied one, so entity creation
/// can write both translation rows unconditionally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalePair<T> {
    pub fr: T,
    pub en: T,
}

impl<T> LocalePair<T> {
    pub fn get(&self, locale: Locale) -> &T {
        match locale {
            Locale::Fr => &self.fr,
            Locale::En => &self.en,
        }
    }

    /// Iterate both sides in a stable order.
    pub fn iter(&self) -> impl Iterator<Item = (Locale, &T)> {
        [(Locale::Fr, &self.fr), (Locale::En, &self.en)].into_iter()
    }
}

impl<T: Clone> LocalePair<T> {
    /// Build a pair from admin input, backfilling a missing locale from
    /// the other. Rejects input with neither side supplied: an entity
    /// cannot be created with no translatable content at all.
    pub fn from_input(fr: Option<T>, en: Option<T>) -> Result<LocalePair<T>, CoreError> {
        match (fr, en) {
            (Some(fr), Some(en)) => Ok(LocalePair { fr, en }),
            (Some(fr), None) => Ok(LocalePair {
                en: fr.clone(),
                fr,
            }),
            (None, Some(en)) => Ok(LocalePair {
                fr: en.clone(),
                en,
            }),
            (None, None) => Err(CoreError::Validation(
                "At least one locale's fields must be supplied".to_string(),
            )),
        }
    }
}

impl<T> LocalePair<T> {
    /// Fill one field from the other locale wherever it is absent, in
    /// both directions. The whole-side backfill in
    /// [`LocalePair::from_input`] only covers a locale with no fields
    /// at all; this covers a supplied locale that omits one field.
    ///
    /// Returns whether the field is present on both sides afterwards,
    /// so callers can reject a field required in at least one locale.
    pub fn backfill_field<V: Clone>(
        &mut self,
        field: impl Fn(&mut T) -> &mut Option<V>,
    ) -> bool {
        if field(&mut self.fr).is_none() {
            let fallback = field(&mut self.en).clone();
            *field(&mut self.fr) = fallback;
        }
        if field(&mut self.en).is_none() {
            let fallback = field(&mut self.fr).clone();
            *field(&mut self.en) = fallback;
        }
        field(&mut self.fr).is_some()
    }
}

impl<T: Clone + Default> LocalePair<T> {
    /// Like [`LocalePair::from_input`], but an all-absent input yields
    /// defaults on both sides instead of failing. Used for children
    /// whose translated fields are all optional.
    pub fn from_input_or_default(fr: Option<T>, en: Option<T>) -> LocalePair<T> {
        match (fr, en) {
            (None, None) => LocalePair {
                fr: T::default(),
                en: T::default(),
            },
            (Some(fr), Some(en)) => LocalePair { fr, en },
            (Some(fr), None) => LocalePair {
                en: fr.clone(),
                fr,
            },
            (None, Some(en)) => LocalePair {
                fr: en.clone(),
                en,
            },
        }
    }
}
