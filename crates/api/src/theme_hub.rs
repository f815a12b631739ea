//! Live theme distribution.
//!
//! `ThemeHub` keeps the last persisted theme and fans out changes to every
//! open theme stream. Preview and clear messages are addressed to a single
//! preview id; each stream owns a `ThemeProvider` that only honors messages
//! for its own id.

use std::sync::Arc;

use domain::models::ThemeSettings;
use domain::services::{ThemeMessage, ThemeProvider};
use domain::store::{Store, StoreResult};
use tokio::sync::{broadcast, RwLock};

/// Buffered events per subscriber before slow consumers start lagging.
const CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThemeBroadcast {
    /// The stored theme changed.
    Persisted(ThemeSettings),
    /// Unsaved theme from the editor for one preview frame.
    Preview {
        preview_id: String,
        theme: ThemeSettings,
    },
    /// Preview frame goes back to the stored theme.
    Clear { preview_id: String },
}

impl ThemeBroadcast {
    /// Feeds the event into a consumer's provider. Returns whether the
    /// consumer's effective theme changed.
    pub fn apply_to(self, provider: &mut ThemeProvider) -> bool {
        match self {
            ThemeBroadcast::Persisted(theme) => provider.on_change_notification(theme),
            ThemeBroadcast::Preview { preview_id, theme } => {
                provider.handle_message(ThemeMessage::Preview {
                    origin: preview_id,
                    theme,
                })
            }
            ThemeBroadcast::Clear { preview_id } => {
                provider.handle_message(ThemeMessage::Clear { origin: preview_id })
            }
        }
    }
}

pub struct ThemeHub {
    store: Arc<dyn Store>,
    current: RwLock<ThemeSettings>,
    sender: broadcast::Sender<ThemeBroadcast>,
}

impl ThemeHub {
    pub fn new(store: Arc<dyn Store>, initial: ThemeSettings) -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            store,
            current: RwLock::new(initial),
            sender,
        }
    }

    /// Creates a hub seeded from the store.
    pub async fn load(store: Arc<dyn Store>) -> StoreResult<Self> {
        let initial = store.get_theme().await?;
        Ok(Self::new(store, initial))
    }

    pub async fn current(&self) -> ThemeSettings {
        self.current.read().await.clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ThemeBroadcast> {
        self.sender.subscribe()
    }

    /// A provider for a new consumer, starting from the persisted theme.
    ///
    /// Consumers without a preview id get a random one so no editor can
    /// address them.
    pub async fn provider_for(&self, preview_id: Option<&str>) -> ThemeProvider {
        let origin = match preview_id {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => uuid::Uuid::new_v4().to_string(),
        };
        ThemeProvider::new(self.current().await, origin)
    }

    /// Re-reads the theme row and broadcasts it if it changed.
    ///
    /// Called for realtime notifications and after admin updates.
    pub async fn reload(&self) -> StoreResult<ThemeSettings> {
        let theme = self.store.get_theme().await?;
        self.publish_persisted(theme.clone()).await;
        Ok(theme)
    }

    /// Stores `theme` as current and notifies streams when it differs.
    pub async fn publish_persisted(&self, theme: ThemeSettings) {
        let changed = {
            let mut current = self.current.write().await;
            if *current == theme {
                false
            } else {
                *current = theme.clone();
                true
            }
        };
        if changed {
            tracing::info!("Theme settings changed, notifying streams");
            self.send(ThemeBroadcast::Persisted(theme));
        }
    }

    pub fn preview(&self, preview_id: impl Into<String>, theme: ThemeSettings) {
        self.send(ThemeBroadcast::Preview {
            preview_id: preview_id.into(),
            theme,
        });
    }

    pub fn clear_preview(&self, preview_id: impl Into<String>) {
        self.send(ThemeBroadcast::Clear {
            preview_id: preview_id.into(),
        });
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    fn send(&self, event: ThemeBroadcast) {
        // No receivers just means no open streams.
        if self.sender.send(event).is_err() {
            tracing::debug!("Theme event dropped, no active streams");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::store::SettingsStore;
    use persistence::MemoryStore;

    fn themed(color: &str) -> ThemeSettings {
        ThemeSettings {
            primary_color: color.to_string(),
            ..Default::default()
        }
    }

    fn hub() -> (Arc<MemoryStore>, ThemeHub) {
        let store = Arc::new(MemoryStore::new());
        let hub = ThemeHub::new(store.clone(), ThemeSettings::default());
        (store, hub)
    }

    #[tokio::test]
    async fn test_reload_broadcasts_new_theme() {
        let (store, hub) = hub();
        let mut rx = hub.subscribe();

        store.save_theme(&themed("#123456")).await.unwrap();
        let theme = hub.reload().await.unwrap();

        assert_eq!(theme.primary_color, "#123456");
        assert_eq!(hub.current().await.primary_color, "#123456");
        match rx.recv().await.unwrap() {
            ThemeBroadcast::Persisted(t) => assert_eq!(t.primary_color, "#123456"),
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_reload_without_change_is_silent() {
        let (_store, hub) = hub();
        let mut rx = hub.subscribe();

        hub.reload().await.unwrap();
        assert!(matches!(
            rx.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));
    }

    #[tokio::test]
    async fn test_preview_only_reaches_matching_provider() {
        let (_store, hub) = hub();
        let mut target = hub.provider_for(Some("frame-1")).await;
        let mut bystander = hub.provider_for(Some("frame-2")).await;
        let mut rx = hub.subscribe();

        hub.preview("frame-1", themed("#abcdef"));
        let event = rx.recv().await.unwrap();

        assert!(event.clone().apply_to(&mut target));
        assert!(!event.apply_to(&mut bystander));
        assert_eq!(target.effective().primary_color, "#abcdef");
        assert_eq!(bystander.effective(), &ThemeSettings::default());
    }

    #[tokio::test]
    async fn test_preview_then_clear_reverts() {
        let (_store, hub) = hub();
        let mut provider = hub.provider_for(Some("frame-1")).await;
        let mut rx = hub.subscribe();

        hub.preview("frame-1", themed("#abcdef"));
        hub.clear_preview("frame-1");

        rx.recv().await.unwrap().apply_to(&mut provider);
        assert!(provider.is_previewing());
        rx.recv().await.unwrap().apply_to(&mut provider);
        assert!(!provider.is_previewing());
        assert_eq!(provider.effective(), &ThemeSettings::default());
    }

    #[tokio::test]
    async fn test_anonymous_provider_ignores_previews() {
        let (_store, hub) = hub();
        let mut provider = hub.provider_for(None).await;

        let changed = ThemeBroadcast::Preview {
            preview_id: String::new(),
            theme: themed("#000000"),
        }
        .apply_to(&mut provider);
        assert!(!changed);
    }

    #[test]
    fn test_send_without_subscribers() {
        let (_store, hub) = hub();
        hub.preview("nobody", ThemeSettings::default());
        assert_eq!(hub.subscriber_count(), 0);
    }
}
