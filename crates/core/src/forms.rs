//! Admin form field-bag parsing.
//!
//! Admin forms submit flat field bags using a per-locale prefix
//! convention: `frTitle` / `enTitle`, `frBody` / `enBody`, and so on.
//! This module splits such a bag into per-locale field maps so the
//! mutation pipeline can build its translation inputs.

use std::collections::HashMap;

use crate::locale::Locale;

/// A flat admin form submission: field name → raw string value.
pub type FieldBag = HashMap<String, String>;

/// Split a prefixed field name into its locale and base field.
///
/// `"frTitle"` → `(Fr, "title")`. The base field is lower-camel
/// decapitalized. Names without a locale prefix (or with nothing after
/// it) are not localized fields and return `None`.
pub fn split_locale_key(name: &str) -> Option<(Locale, String)> {
    let (locale, rest) = if let Some(rest) = name.strip_prefix("fr") {
        (Locale::Fr, rest)
    } else if let Some(rest) = name.strip_prefix("en") {
        (Locale::En, rest)
    } else {
        return None;
    };

    let mut chars = rest.chars();
    let first = chars.next()?;
    // The convention capitalizes the base field ("frTitle", never
    // "frtitle"); a lowercase continuation means the prefix was part
    // of an ordinary word ("enabled").
    if !first.is_ascii_uppercase() {
        return None;
    }
    Some((locale, first.to_ascii_lowercase().to_string() + chars.as_str()))
}

/// Per-locale view over one form submission.
///
/// Empty-string values are treated as unsupplied: admin forms post
/// every input, filled or not.
#[derive(Debug, Default)]
pub struct LocaleFields {
    fields: HashMap<(Locale, String), String>,
}

impl LocaleFields {
    pub fn parse(bag: &FieldBag) -> LocaleFields {
        let mut fields = HashMap::new();
        for (name, value) in bag {
            if value.trim().is_empty() {
                continue;
            }
            if let Some((locale, base)) = split_locale_key(name) {
                fields.insert((locale, base), value.clone());
            }
        }
        LocaleFields { fields }
    }

    pub fn get(&self, locale: Locale, base: &str) -> Option<&str> {
        self.fields
            .get(&(locale, base.to_string()))
            .map(String::as_str)
    }

    /// Whether the submission carries any field for this locale.
    pub fn has_locale(&self, locale: Locale) -> bool {
        self.fields.keys().any(|(l, _)| *l == locale)
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
    fn splits_prefixed_names() {
        assert_eq!(
            split_locale_key("frTitle"),
            Some((Locale::Fr, "title".to_string()))
        );
        assert_eq!(
            split_locale_key("enBodyRichText"),
            Some((Locale::En, "bodyRichText".to_string()))
        );
    }

    #[test]
    fn ignores_unprefixed_names() {
        assert_eq!(split_locale_key("slug"), None);
        assert_eq!(split_locale_key("enabled"), None);
        assert_eq!(split_locale_key("fr"), None);
    }

    #[test]
    fn parses_both_locales_from_one_bag() {
        let fields = LocaleFields::parse(&bag(&[
            ("frTitle", "Soie"),
            ("enTitle", "Silk"),
            ("frCaption", "Atelier"),
            ("slug", "soie"),
        ]));
        assert_eq!(fields.get(Locale::Fr, "title"), Some("Soie"));
        assert_eq!(fields.get(Locale::En, "title"), Some("Silk"));
        assert_eq!(fields.get(Locale::En, "caption"), None);
    }

    #[test]
    fn empty_values_are_unsupplied() {
        let fields = LocaleFields::parse(&bag(&[("frTitle", "Soie"), ("enTitle", "  ")]));
        assert!(fields.has_locale(Locale::Fr));
        assert!(!fields.has_locale(Locale::En));
    }
}
