//! Slug normalization for collections and editorial posts.

use crate::error::CoreError;

/// Normalize raw admin input into a URL slug.
///
/// Lowercases, maps every character outside `[a-z0-9-]` to `-`,
/// collapses runs of `-`, and trims leading/trailing `-`. Input that
/// normalizes to nothing is a validation failure: a slug is the
/// entity's canonical URL and may not be empty.
///
/// ```
/// use maison_core::slug::normalize;
///
/// assert_eq!(normalize("  Café Paris!! ").unwrap(), "caf-paris");
/// assert_eq!(normalize("Automne-Hiver 2026").unwrap(), "automne-hiver-2026");
/// assert!(normalize("!!!").is_err());
/// ```
pub fn normalize(raw: &str) -> Result<String, CoreError> {
    let mut slug = String::with_capacity(raw.len());
    let mut last_dash = true; // suppress leading dashes

    for ch in raw.to_lowercase().chars() {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            slug.push(ch);
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }

    while slug.ends_with('-') {
        slug.pop();
    }

    if slug.is_empty() {
        return Err(CoreError::Validation(format!(
            "Slug input {raw:?} normalizes to an empty string"
        )));
    }
    Ok(slug)
}
