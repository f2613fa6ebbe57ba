//! Family slug rules: format, length, and the reserved-word blocklist.
//!
//! Slugs appear as the first path segment of the web app
//! (`/{slug}/log-entry`), so anything colliding with an app route is
//! rejected here before it reaches the unique index.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;

/// Minimum slug length.
pub const MIN_SLUG_LENGTH: usize = 3;
/// Maximum slug length.
pub const MAX_SLUG_LENGTH: usize = 50;

/// Lowercase alphanumeric words joined by single hyphens.
const SLUG_PATTERN: &str = r"^[a-z0-9]+(-[a-z0-9]+)*$";

static SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(SLUG_PATTERN).expect("valid regex"));

/// Words that may never be used as a family slug.
pub const RESERVED_SLUGS: &[&str] = &[
    "account",
    "accounts",
    "admin",
    "api",
    "app",
    "assets",
    "auth",
    "billing",
    "coparent",
    "families",
    "family",
    "family-manager",
    "family-select",
    "health",
    "home",
    "images",
    "login",
    "logout",
    "new",
    "payments",
    "public",
    "settings",
    "setup",
    "static",
    "sysadmin",
    "www",
];

/// Returns the reason a slug is unusable, or `None` when it is acceptable.
pub fn slug_rejection(slug: &str) -> Option<&'static str> {
    if slug.len() < MIN_SLUG_LENGTH {
        return Some("Slug must be at least 3 characters long");
    }
    if slug.len() > MAX_SLUG_LENGTH {
        return Some("Slug must be at most 50 characters long");
    }
    if !SLUG_RE.is_match(slug) {
        return Some("Slug may only contain lowercase letters, numbers, and single hyphens");
    }
    if RESERVED_SLUGS.contains(&slug) {
        return Some("This slug is reserved");
    }
    None
}

/// Validate a slug, mapping any rejection to [`CoreError::Validation`].
pub fn validate_slug(slug: &str) -> Result<(), CoreError> {
    match slug_rejection(slug) {
        Some(reason) => Err(CoreError::Validation(reason.to_string())),
        None => Ok(()),
    }
}

/// Derive a candidate slug from a family name.
///
/// Non-alphanumerics collapse into single hyphens; the result is trimmed
/// to [`MAX_SLUG_LENGTH`]. The caller still has to check availability.
pub fn slugify(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_hyphen = false;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !out.is_empty() {
                out.push('-');
            }
            pending_hyphen = false;
            out.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }
    out.truncate(MAX_SLUG_LENGTH);
    out.trim_end_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn accepts_simple_slugs() {
        assert!(validate_slug("smith-family").is_ok());
        assert!(validate_slug("abc").is_ok());
        assert!(validate_slug("family2024").is_ok());
    }

    #[test]
    fn rejects_reserved_words() {
        for word in ["admin", "api", "setup", "family-select"] {
            assert_matches!(validate_slug(word), Err(CoreError::Validation(_)));
        }
        assert_eq!(slug_rejection("login"), Some("This slug is reserved"));
    }

    #[test]
    fn rejects_bad_format() {
        assert!(slug_rejection("Smith").is_some());
        assert!(slug_rejection("smith--family").is_some());
        assert!(slug_rejection("-smith").is_some());
        assert!(slug_rejection("smith_family").is_some());
        assert!(slug_rejection("ab").is_some());
        assert!(slug_rejection(&"a".repeat(51)).is_some());
    }

    #[test]
    fn slugify_collapses_separators() {
        assert_eq!(slugify("The Smith  Family!"), "the-smith-family");
        assert_eq!(slugify("  O'Brien & Co "), "o-brien-co");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn slugify_truncates() {
        let long = "a ".repeat(60);
        let slug = slugify(&long);
        assert!(slug.len() <= MAX_SLUG_LENGTH);
        assert!(!slug.ends_with('-'));
    }
}
