//! Auto-dismissing notification tray
//!
//! Collects the user-facing notifications produced by lifecycle events and
//! forgets each one once its display time is over.

use crate::error::{LifecycleError, Result};
use crate::event::{LifecycleEvent, Notification};
use mcpenv_config::NotificationSettings;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::runtime::Handle;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, warn};

#[derive(Debug)]
struct Entry {
    notification: Notification,
    expires_at: Instant,
}

/// Shared tray of visible notifications
#[derive(Debug, Clone)]
pub struct NotificationTray {
    entries: Arc<Mutex<VecDeque<Entry>>>,
    settings: NotificationSettings,
}

impl NotificationTray {
    pub fn new(settings: NotificationSettings) -> Self {
        Self {
            entries: Arc::new(Mutex::new(VecDeque::new())),
            settings,
        }
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<Entry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn prune(entries: &mut VecDeque<Entry>, now: Instant) {
        entries.retain(|entry| entry.expires_at > now);
    }

    /// Show a notification; the oldest one is dropped when the tray is full
    pub fn push(&self, notification: Notification) {
        let now = Instant::now();
        let mut entries = self.lock();
        Self::prune(&mut entries, now);

        debug!(kind = %notification.kind, "notification shown");
        entries.push_back(Entry {
            notification,
            expires_at: now + self.settings.dismiss_after,
        });
        while entries.len() > self.settings.max_visible {
            entries.pop_front();
        }
    }

    /// Notifications still on display, oldest first
    pub fn active(&self) -> Vec<Notification> {
        let mut entries = self.lock();
        Self::prune(&mut entries, Instant::now());
        entries.iter().map(|e| e.notification.clone()).collect()
    }

    pub fn dismiss_all(&self) {
        self.lock().clear();
    }

    /// Feed the tray from a lifecycle event stream.
    ///
    /// The listener ends when the stream closes; abort the returned handle
    /// to stop it earlier.
    pub fn attach(
        &self,
        mut events: broadcast::Receiver<LifecycleEvent>,
    ) -> Result<JoinHandle<()>> {
        let handle = Handle::try_current().map_err(|_| LifecycleError::NoRuntime)?;
        let tray = self.clone();
        Ok(handle.spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => {
                        if let Some(notification) = event.notification() {
                            tray.push(notification);
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "notification listener fell behind lifecycle events");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        }))
    }
}

impl Default for NotificationTray {
    fn default() -> Self {
        Self::new(NotificationSettings::default())
    }
}
