//! URL slug generation for blog posts and other addressable content.

use regex::Regex;

lazy_static::lazy_static! {
    static ref NON_ALPHANUMERIC_RUN: Regex = Regex::new(r"[^a-z0-9]+").unwrap();
    static ref SLUG_REGEX: Regex = Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap();
}

/// Derives a URL slug from a title.
///
/// Lowercases the input, collapses every run of characters outside `[a-z0-9]`
/// into a single hyphen and trims hyphens from both ends.
/// `"My Post!! 2024"` becomes `"my-post-2024"`.
pub fn slugify(title: &str) -> String {
    let lowered = title.to_lowercase();
    NON_ALPHANUMERIC_RUN
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string()
}

/// Returns true if the value is already a well-formed slug.
pub fn is_valid_slug(value: &str) -> bool {
    SLUG_REGEX.is_match(value)
}
