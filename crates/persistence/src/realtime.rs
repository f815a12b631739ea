//! Realtime change notifications from the external store.
//!
//! The store emits `pg_notify` on a channel whenever the theme settings row
//! changes. `ThemeChangeListener` subscribes with `PgListener` and invokes a
//! registered callback for every notification.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::PgListener;
use sqlx::PgPool;
use tokio::sync::watch;

/// Default channel used by the theme settings trigger.
pub const DEFAULT_THEME_CHANNEL: &str = "theme_settings_changed";

/// Callback invoked with the notification payload.
pub type ChangeCallback =
    Arc<dyn Fn(String) -> Pin<Box<dyn Future<Output = ()> + Send>> + Send + Sync>;

pub struct ThemeChangeListener {
    pool: PgPool,
    channel: String,
    callbacks: Vec<ChangeCallback>,
    reconnect_delay: Duration,
}

impl ThemeChangeListener {
    pub fn new(pool: PgPool, channel: impl Into<String>) -> Self {
        Self {
            pool,
            channel: channel.into(),
            callbacks: Vec::new(),
            reconnect_delay: Duration::from_secs(5),
        }
    }

    /// Registers a callback run on every change notification.
    pub fn on_change<F, Fut>(mut self, callback: F) -> Self
    where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.callbacks
            .push(Arc::new(move |payload| Box::pin(callback(payload))));
        self
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// Listens until `shutdown` flips to true. Connection failures are
    /// retried after a fixed delay.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        tracing::info!(channel = %self.channel, "Starting realtime listener");

        loop {
            let mut listener = match PgListener::connect_with(&self.pool).await {
                Ok(listener) => listener,
                Err(e) => {
                    tracing::warn!(error = %e, "Realtime listener connect failed, retrying");
                    if wait_or_shutdown(&mut shutdown, self.reconnect_delay).await {
                        break;
                    }
                    continue;
                }
            };
            if let Err(e) = listener.listen(&self.channel).await {
                tracing::warn!(error = %e, channel = %self.channel, "LISTEN failed, retrying");
                if wait_or_shutdown(&mut shutdown, self.reconnect_delay).await {
                    break;
                }
                continue;
            }

            loop {
                tokio::select! {
                    notification = listener.recv() => match notification {
                        Ok(notification) => {
                            let payload = notification.payload().to_string();
                            tracing::debug!(channel = %self.channel, "Change notification received");
                            metrics::counter!("realtime_notifications_total").increment(1);
                            for callback in &self.callbacks {
                                callback(payload.clone()).await;
                            }
                        }
                        Err(e) => {
                            tracing::warn!(error = %e, "Realtime listener connection lost");
                            break;
                        }
                    },
                    changed = shutdown.changed() => {
                        if changed.is_err() || *shutdown.borrow() {
                            tracing::info!("Realtime listener shutting down");
                            return;
                        }
                    }
                }
            }

            if wait_or_shutdown(&mut shutdown, self.reconnect_delay).await {
                break;
            }
        }
    }
}

/// Sleeps for `delay`. Returns true when shutdown was requested meanwhile.
async fn wait_or_shutdown(shutdown: &mut watch::Receiver<bool>, delay: Duration) -> bool {
    tokio::select! {
        _ = tokio::time::sleep(delay) => *shutdown.borrow(),
        changed = shutdown.changed() => changed.is_err() || *shutdown.borrow(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_wait_or_shutdown_signals() {
        let (tx, mut rx) = watch::channel(false);
        tx.send(true).unwrap();
        assert!(wait_or_shutdown(&mut rx, Duration::from_secs(60)).await);
    }

    #[tokio::test]
    async fn test_wait_or_shutdown_times_out() {
        let (_tx, mut rx) = watch::channel(false);
        assert!(!wait_or_shutdown(&mut rx, Duration::from_millis(5)).await);
    }
}
