//! Periodic theme re-read.
//!
//! Realtime notifications can be missed while the listener reconnects. A
//! slow resync bounds how long open pages can show a stale theme.

use std::sync::Arc;

use super::scheduler::{Job, JobError, JobFrequency};
use crate::theme_hub::ThemeHub;

pub struct ThemeResyncJob {
    hub: Arc<ThemeHub>,
}

impl ThemeResyncJob {
    pub fn new(hub: Arc<ThemeHub>) -> Self {
        Self { hub }
    }
}

#[async_trait::async_trait]
impl Job for ThemeResyncJob {
    fn name(&self) -> &'static str {
        "theme_resync"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Minutes(5)
    }

    async fn execute(&self) -> Result<(), JobError> {
        self.hub.reload().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::models::ThemeSettings;
    use domain::store::SettingsStore;
    use persistence::MemoryStore;

    #[tokio::test]
    async fn test_resync_picks_up_store_changes() {
        let store = Arc::new(MemoryStore::new());
        let hub = Arc::new(ThemeHub::new(store.clone(), ThemeSettings::default()));

        let changed = ThemeSettings {
            heading_font: "Playfair Display".into(),
            ..Default::default()
        };
        store.save_theme(&changed).await.unwrap();

        ThemeResyncJob::new(hub.clone()).execute().await.unwrap();
        assert_eq!(hub.current().await.heading_font, "Playfair Display");
    }
}
