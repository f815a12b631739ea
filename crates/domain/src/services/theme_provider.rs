//! Theme provider state machine.
//!
//! Each consumer of the live theme (a browser tab, an SSE stream) owns one
//! `ThemeProvider`. It tracks the persisted theme plus an optional preview
//! override sent from the admin editor. Preview messages are only honored
//! when they come from the consumer's allowed origin.

use crate::models::ThemeSettings;

/// A message from the theme editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThemeMessage {
    /// Apply `theme` without persisting it.
    Preview { origin: String, theme: ThemeSettings },
    /// Drop any preview and fall back to the persisted theme.
    Clear { origin: String },
}

impl ThemeMessage {
    pub fn origin(&self) -> &str {
        match self {
            ThemeMessage::Preview { origin, .. } | ThemeMessage::Clear { origin } => origin,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ThemeProvider {
    persisted: ThemeSettings,
    preview: Option<ThemeSettings>,
    allowed_origin: String,
}

impl ThemeProvider {
    pub fn new(persisted: ThemeSettings, allowed_origin: impl Into<String>) -> Self {
        Self {
            persisted,
            preview: None,
            allowed_origin: allowed_origin.into(),
        }
    }

    /// The theme currently applied: the preview override if any, else the persisted row.
    pub fn effective(&self) -> &ThemeSettings {
        self.preview.as_ref().unwrap_or(&self.persisted)
    }

    pub fn persisted(&self) -> &ThemeSettings {
        &self.persisted
    }

    pub fn is_previewing(&self) -> bool {
        self.preview.is_some()
    }

    /// Handles an editor message. Returns whether the effective theme changed.
    ///
    /// Messages from any other origin are ignored.
    pub fn handle_message(&mut self, message: ThemeMessage) -> bool {
        if message.origin() != self.allowed_origin {
            return false;
        }
        let before = self.effective().clone();
        match message {
            ThemeMessage::Preview { theme, .. } => self.preview = Some(theme),
            ThemeMessage::Clear { .. } => self.preview = None,
        }
        *self.effective() != before
    }

    /// Replaces the persisted theme after a change notification.
    ///
    /// An active preview stays in force until it is cleared. Returns whether
    /// the effective theme changed.
    pub fn on_change_notification(&mut self, theme: ThemeSettings) -> bool {
        let before = self.effective().clone();
        self.persisted = theme;
        *self.effective() != before
    }

    /// Resets to `theme` after missed messages. Any preview is dropped since
    /// its `Clear` may have been among them. Returns whether the effective
    /// theme changed.
    pub fn resync(&mut self, theme: ThemeSettings) -> bool {
        let before = self.effective().clone();
        self.persisted = theme;
        self.preview = None;
        *self.effective() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGIN: &str = "https://studio.example.com";

    fn red() -> ThemeSettings {
        ThemeSettings {
            primary_color: "#ff0000".into(),
            ..Default::default()
        }
    }

    fn blue() -> ThemeSettings {
        ThemeSettings {
            primary_color: "#0000ff".into(),
            ..Default::default()
        }
    }

    fn preview(theme: ThemeSettings) -> ThemeMessage {
        ThemeMessage::Preview {
            origin: ORIGIN.into(),
            theme,
        }
    }

    fn clear() -> ThemeMessage {
        ThemeMessage::Clear {
            origin: ORIGIN.into(),
        }
    }

    #[test]
    fn test_preview_then_clear_reverts() {
        let mut provider = ThemeProvider::new(ThemeSettings::default(), ORIGIN);

        assert!(provider.handle_message(preview(red())));
        assert!(provider.is_previewing());
        assert_eq!(provider.effective().primary_color, "#ff0000");

        assert!(provider.handle_message(clear()));
        assert!(!provider.is_previewing());
        assert_eq!(provider.effective(), &ThemeSettings::default());
    }

    #[test]
    fn test_last_message_wins() {
        let mut provider = ThemeProvider::new(ThemeSettings::default(), ORIGIN);
        provider.handle_message(preview(red()));
        provider.handle_message(preview(blue()));
        assert_eq!(provider.effective().primary_color, "#0000ff");
    }

    #[test]
    fn test_foreign_origin_ignored() {
        let mut provider = ThemeProvider::new(ThemeSettings::default(), ORIGIN);
        let changed = provider.handle_message(ThemeMessage::Preview {
            origin: "https://evil.example".into(),
            theme: red(),
        });
        assert!(!changed);
        assert!(!provider.is_previewing());

        provider.handle_message(preview(red()));
        assert!(!provider.handle_message(ThemeMessage::Clear {
            origin: "https://evil.example".into()
        }));
        assert!(provider.is_previewing());
    }

    #[test]
    fn test_clear_without_preview_is_noop() {
        let mut provider = ThemeProvider::new(red(), ORIGIN);
        assert!(!provider.handle_message(clear()));
        assert_eq!(provider.effective(), &red());
    }

    #[test]
    fn test_change_notification_applies() {
        let mut provider = ThemeProvider::new(ThemeSettings::default(), ORIGIN);
        assert!(provider.on_change_notification(blue()));
        assert_eq!(provider.effective(), &blue());
    }

    #[test]
    fn test_change_notification_under_preview() {
        let mut provider = ThemeProvider::new(ThemeSettings::default(), ORIGIN);
        provider.handle_message(preview(red()));

        assert!(!provider.on_change_notification(blue()));
        assert_eq!(provider.effective(), &red());

        provider.handle_message(clear());
        assert_eq!(provider.effective(), &blue());
    }

    #[test]
    fn test_resync_drops_preview() {
        let mut provider = ThemeProvider::new(ThemeSettings::default(), ORIGIN);
        provider.handle_message(preview(red()));

        assert!(provider.resync(blue()));
        assert!(!provider.is_previewing());
        assert_eq!(provider.effective(), &blue());

        assert!(!provider.resync(blue()));
    }
}
