//! Theme settings domain models.
//!
//! The site keeps a single theme row. Its values are rendered as CSS custom
//! properties on `:root`, which is how both the public site and the admin
//! preview frame pick them up.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// The persisted site theme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ThemeSettings {
    pub primary_color: String,
    pub secondary_color: String,
    pub accent_color: String,
    pub background_color: String,
    pub text_color: String,
    pub admin_primary_color: String,
    pub admin_background_color: String,
    pub heading_font: String,
    pub body_font: String,
    pub border_radius: String,
    pub updated_at: DateTime<Utc>,
}

impl Default for ThemeSettings {
    fn default() -> Self {
        Self {
            primary_color: "#1a1a2e".into(),
            secondary_color: "#16213e".into(),
            accent_color: "#e94560".into(),
            background_color: "#ffffff".into(),
            text_color: "#1a1a1a".into(),
            admin_primary_color: "#0f3460".into(),
            admin_background_color: "#f5f5f5".into(),
            heading_font: "Inter".into(),
            body_font: "Inter".into(),
            border_radius: "0.5rem".into(),
            updated_at: DateTime::<Utc>::default(),
        }
    }
}

impl ThemeSettings {
    /// CSS custom properties in a stable order.
    pub fn css_variables(&self) -> Vec<(&'static str, String)> {
        vec![
            ("--color-primary", self.primary_color.clone()),
            ("--color-secondary", self.secondary_color.clone()),
            ("--color-accent", self.accent_color.clone()),
            ("--color-background", self.background_color.clone()),
            ("--color-text", self.text_color.clone()),
            ("--admin-color-primary", self.admin_primary_color.clone()),
            ("--admin-color-background", self.admin_background_color.clone()),
            ("--font-heading", font_stack(&self.heading_font)),
            ("--font-body", font_stack(&self.body_font)),
            ("--radius", self.border_radius.clone()),
        ]
    }

    /// Renders the variables as a `:root` rule.
    pub fn to_css(&self) -> String {
        let mut css = String::from(":root {\n");
        for (name, value) in self.css_variables() {
            css.push_str("  ");
            css.push_str(name);
            css.push_str(": ");
            css.push_str(&value);
            css.push_str(";\n");
        }
        css.push('}');
        css.push('\n');
        css
    }
}

fn font_stack(family: &str) -> String {
    format!("'{}', system-ui, sans-serif", family.replace('\'', ""))
}

/// Admin update of the theme. Also used as the payload of preview messages.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdateThemeRequest {
    #[validate(custom(function = "shared::validation::validate_hex_color"))]
    pub primary_color: Option<String>,

    #[validate(custom(function = "shared::validation::validate_hex_color"))]
    pub secondary_color: Option<String>,

    #[validate(custom(function = "shared::validation::validate_hex_color"))]
    pub accent_color: Option<String>,

    #[validate(custom(function = "shared::validation::validate_hex_color"))]
    pub background_color: Option<String>,

    #[validate(custom(function = "shared::validation::validate_hex_color"))]
    pub text_color: Option<String>,

    #[validate(custom(function = "shared::validation::validate_hex_color"))]
    pub admin_primary_color: Option<String>,

    #[validate(custom(function = "shared::validation::validate_hex_color"))]
    pub admin_background_color: Option<String>,

    #[validate(length(min = 1, max = 100, message = "Font must be 1-100 characters"))]
    #[validate(custom(function = "validate_font_family"))]
    pub heading_font: Option<String>,

    #[validate(length(min = 1, max = 100, message = "Font must be 1-100 characters"))]
    #[validate(custom(function = "validate_font_family"))]
    pub body_font: Option<String>,

    #[validate(custom(function = "shared::validation::validate_css_length"))]
    pub border_radius: Option<String>,
}

impl UpdateThemeRequest {
    /// Returns `base` with the provided fields overridden.
    pub fn merged_onto(self, base: &ThemeSettings, now: DateTime<Utc>) -> ThemeSettings {
        let base = base.clone();
        ThemeSettings {
            primary_color: self.primary_color.unwrap_or(base.primary_color),
            secondary_color: self.secondary_color.unwrap_or(base.secondary_color),
            accent_color: self.accent_color.unwrap_or(base.accent_color),
            background_color: self.background_color.unwrap_or(base.background_color),
            text_color: self.text_color.unwrap_or(base.text_color),
            admin_primary_color: self.admin_primary_color.unwrap_or(base.admin_primary_color),
            admin_background_color: self
                .admin_background_color
                .unwrap_or(base.admin_background_color),
            heading_font: self.heading_font.unwrap_or(base.heading_font),
            body_font: self.body_font.unwrap_or(base.body_font),
            border_radius: self.border_radius.unwrap_or(base.border_radius),
            updated_at: now,
        }
    }
}

/// Font names end up inside CSS; keep them to plain family names.
fn validate_font_family(value: &str) -> Result<(), validator::ValidationError> {
    let ok = value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == ' ' || c == '-' || c == '_');
    if ok {
        Ok(())
    } else {
        let mut err = validator::ValidationError::new("font_family");
        err.message = Some("Font may only contain letters, digits, spaces, '-' or '_'".into());
        Err(err)
    }
}
