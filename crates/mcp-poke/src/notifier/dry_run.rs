//! Logging-only notifier

use std::sync::Arc;

use tracing::info;

use crate::config::Config;
use crate::models::Level;

/// Logs what would have been sent and never touches the desktop
#[derive(Debug, Clone)]
pub struct DryRunNotifier {
    config: Arc<Config>,
}

impl DryRunNotifier {
    /// Create a dry-run notifier
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }

    /// Log the notification
    pub fn send(&self, title: &str, message: &str, level: Level) {
        let preview = self.config.notification.template.render(title, message, level);
        info!(
            title,
            message,
            level = %level,
            platform = std::env::consts::OS,
            preview = %preview,
            "[DRY RUN] Would send notification"
        );
    }
}
