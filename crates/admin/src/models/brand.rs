//! Brand (tenant) domain type.

use chrono::{DateTime, Utc};
use serde::Serialize;

use maison_core::BrandId;

/// A brand selling on the platform.
///
/// The auth gateway authenticates dashboard users and forwards the acting
/// brand's id; this row is what that id resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Brand {
    pub id: BrandId,
    /// Display name; unique across the platform.
    pub name: String,
    /// URL-safe identifier; unique across the platform.
    pub slug: String,
    pub created_at: DateTime<Utc>,
}

/// Derive a URL-safe slug from a brand name.
///
/// Lowercases, drops non-ASCII letters, maps runs of punctuation and
/// whitespace to single hyphens, and trims leading/trailing hyphens.
#[must_use]
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut previous_hyphen = true;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            previous_hyphen = false;
        } else if c.is_alphanumeric() {
            // Accented and other non-ASCII letters are dropped, not
            // hyphenated, so they never split a word.
        } else if !previous_hyphen {
            slug.push('-');
            previous_hyphen = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Atelier Nord"), "atelier-nord");
        assert_eq!(slugify("  Maison & Co.  "), "maison-co");
        assert_eq!(slugify("ÉLÉGANCE paris"), "lgance-paris");
        assert_eq!(slugify("Crème Brûlée & Co"), "crme-brle-co");
    }
}
