//! Common validation utilities.

use regex::Regex;
use validator::ValidationError;

use crate::slug::is_valid_slug;

lazy_static::lazy_static! {
    static ref HEX_COLOR_REGEX: Regex =
        Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").unwrap();
    static ref CSS_LENGTH_REGEX: Regex =
        Regex::new(r"^(?:0|\d+(?:\.\d+)?(?:px|rem|em|%))$").unwrap();
}

fn error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

/// Validates a CSS hex color (`#rgb` or `#rrggbb`).
pub fn validate_hex_color(value: &str) -> Result<(), ValidationError> {
    if HEX_COLOR_REGEX.is_match(value) {
        Ok(())
    } else {
        Err(error("hex_color", "Color must be a hex value like #1a2b3c"))
    }
}

/// Validates a CSS length used for corner radius (`0`, `8px`, `0.5rem`, `50%`).
pub fn validate_css_length(value: &str) -> Result<(), ValidationError> {
    if CSS_LENGTH_REGEX.is_match(value) {
        Ok(())
    } else {
        Err(error(
            "css_length",
            "Radius must be 0 or a number with px, rem, em or % units",
        ))
    }
}

/// Validates a URL slug.
pub fn validate_slug(value: &str) -> Result<(), ValidationError> {
    if is_valid_slug(value) {
        Ok(())
    } else {
        Err(error(
            "slug",
            "Slug may contain only lowercase letters, digits and single hyphens",
        ))
    }
}

/// Rejects strings that are empty after trimming whitespace.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(error("blank", "Value cannot be blank"))
    } else {
        Ok(())
    }
}

/// Accepts absolute http(s) URLs and root-relative paths (`/media/hero.jpg`).
pub fn validate_http_url(value: &str) -> Result<(), ValidationError> {
    let ok = (value.starts_with("https://") || value.starts_with("http://"))
        && value.len() > "https://".len()
        || (value.starts_with('/') && !value.starts_with("//"));
    if ok && !value.chars().any(char::is_whitespace) {
        Ok(())
    } else {
        Err(error("url", "Must be an http(s) URL or a site-relative path"))
    }
}
