//! Delivering notifier

use std::sync::Arc;

use tracing::info;

use crate::config::{Config, LevelStyle};
use crate::error::Result;
use crate::models::{Level, Urgency};

use super::backend::{DesktopNotification, NotificationBackend};

/// Sends notifications through a [`NotificationBackend`]
pub struct DesktopNotifier {
    config: Arc<Config>,
    backend: Arc<dyn NotificationBackend>,
}

impl DesktopNotifier {
    /// Create a desktop notifier
    pub fn new(config: Arc<Config>, backend: Arc<dyn NotificationBackend>) -> Self {
        Self { config, backend }
    }

    /// Presentation hints for `level`, falling back to normal urgency and no icon
    pub fn style_for(&self, level: Level) -> LevelStyle {
        self.config
            .notification
            .levels
            .get(level.as_str())
            .cloned()
            .unwrap_or_default()
    }

    /// Send a notification
    pub async fn send(&self, title: &str, message: &str, level: Level) -> Result<()> {
        let style = self.style_for(level);
        let notification = DesktopNotification {
            title: title.to_string(),
            message: message.to_string(),
            icon: style.icon,
            urgency: Urgency::parse_lossy(&style.urgency),
        };

        if self.config.verbose() {
            info!(
                title,
                message,
                level = %level,
                icon = %notification.icon,
                urgency = %notification.urgency,
                platform = std::env::consts::OS,
                "[DesktopNotifier] Sending notification"
            );
        }

        self.backend.notify(&notification).await?;

        if self.config.verbose() {
            info!(title, level = %level, "[DesktopNotifier] Notification delivered");
        }

        Ok(())
    }
}

impl std::fmt::Debug for DesktopNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DesktopNotifier")
            .field("verbose", &self.config.verbose())
            .finish_non_exhaustive()
    }
}
