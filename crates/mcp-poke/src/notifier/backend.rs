//! The OS notification facility

use tracing::debug;

use crate::models::Urgency;

/// A notification ready for the desktop
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesktopNotification {
    /// Summary line
    pub title: String,
    /// Body text
    pub message: String,
    /// Icon name or path, empty for none
    pub icon: String,
    /// Urgency hint
    pub urgency: Urgency,
}

/// Errors raised by a notification backend
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// The native library failed
    #[error("{0}")]
    Native(String),

    /// No notification service could be reached
    #[error("notification service unavailable: {0}")]
    Unavailable(String),

    /// The blocking delivery task did not finish
    #[error("notification task failed: {0}")]
    Task(String),
}

/// Something that can put a notification on screen
#[async_trait::async_trait]
pub trait NotificationBackend: Send + Sync {
    /// Show a notification
    async fn notify(&self, notification: &DesktopNotification) -> Result<(), BackendError>;
}

/// Backend using the platform notification service via `notify-rust`
#[derive(Debug, Clone)]
pub struct NativeBackend {
    app_name: String,
}

impl NativeBackend {
    /// Create a backend that reports notifications under `app_name`
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
        }
    }
}

impl Default for NativeBackend {
    fn default() -> Self {
        Self::new("mcp-poke")
    }
}

#[async_trait::async_trait]
impl NotificationBackend for NativeBackend {
    async fn notify(&self, notification: &DesktopNotification) -> Result<(), BackendError> {
        let app_name = self.app_name.clone();
        let notification = notification.clone();

        // show() talks to D-Bus / the OS synchronously
        tokio::task::spawn_blocking(move || show(&app_name, &notification))
            .await
            .map_err(|e| BackendError::Task(e.to_string()))?
    }
}

fn show(app_name: &str, notification: &DesktopNotification) -> Result<(), BackendError> {
    let mut builder = notify_rust::Notification::new();
    builder
        .appname(app_name)
        .summary(&notification.title)
        .body(&notification.message);

    if !notification.icon.is_empty() {
        builder.icon(&notification.icon);
    }

    #[cfg(all(unix, not(target_os = "macos")))]
    builder.urgency(match notification.urgency {
        Urgency::Low => notify_rust::Urgency::Low,
        Urgency::Normal => notify_rust::Urgency::Normal,
        Urgency::Critical => notify_rust::Urgency::Critical,
    });

    builder
        .show()
        .map_err(|e| BackendError::Native(e.to_string()))?;
    debug!(title = %notification.title, "Desktop notification shown");
    Ok(())
}
