//! Notification delivery
//!
//! A [`Notifier`] is built once at startup from the configuration. Dry-run
//! mode always yields the logging variant; otherwise the delivery mode picks
//! the desktop variant or is rejected.

mod backend;
mod desktop;
mod dry_run;

pub use backend::{BackendError, DesktopNotification, NativeBackend, NotificationBackend};
pub use desktop::DesktopNotifier;
pub use dry_run::DryRunNotifier;

use std::sync::Arc;

use crate::config::{Config, LIBRARY_MODE};
use crate::error::{Error, Result};
use crate::models::Level;

/// The notifier selected for this process
#[derive(Debug)]
pub enum Notifier {
    /// Delivers through the desktop notification service
    Desktop(DesktopNotifier),
    /// Only logs
    DryRun(DryRunNotifier),
}

impl Notifier {
    /// Build the notifier for `config` on top of the native backend
    pub fn from_config(config: Arc<Config>) -> Result<Self> {
        Self::with_backend(config, Arc::new(NativeBackend::default()))
    }

    /// Build the notifier for `config`, delivering through `backend`
    pub fn with_backend(config: Arc<Config>, backend: Arc<dyn NotificationBackend>) -> Result<Self> {
        if config.dry_run() {
            return Ok(Self::DryRun(DryRunNotifier::new(config)));
        }

        if config.notification.mode == LIBRARY_MODE {
            return Ok(Self::Desktop(DesktopNotifier::new(config, backend)));
        }

        Err(Error::UnsupportedMode(config.notification.mode.clone()))
    }

    /// Send a notification
    pub async fn send(&self, title: &str, message: &str, level: Level) -> Result<()> {
        match self {
            Self::Desktop(notifier) => notifier.send(title, message, level).await,
            Self::DryRun(notifier) => {
                notifier.send(title, message, level);
                Ok(())
            }
        }
    }

    /// Short name of the variant, for logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Desktop(_) => "desktop",
            Self::DryRun(_) => "dry-run",
        }
    }

    /// Whether this is the dry-run variant
    pub fn is_dry_run(&self) -> bool {
        matches!(self, Self::DryRun(_))
    }
}

/// Backends for exercising notifiers without a desktop session
#[cfg(test)]
pub(crate) mod test_support {
    use std::io;
    use std::sync::{Arc, Mutex};

    use tracing::subscriber::DefaultGuard;

    use super::{BackendError, DesktopNotification, NotificationBackend};

    /// Records every notification it is given
    #[derive(Default)]
    pub struct RecordingBackend {
        log: Mutex<Vec<DesktopNotification>>,
    }

    impl RecordingBackend {
        pub fn sent(&self) -> Vec<DesktopNotification> {
            self.log.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl NotificationBackend for RecordingBackend {
        async fn notify(&self, notification: &DesktopNotification) -> Result<(), BackendError> {
            self.log.lock().unwrap().push(notification.clone());
            Ok(())
        }
    }

    /// Fails every notification
    pub struct FailingBackend;

    #[async_trait::async_trait]
    impl NotificationBackend for FailingBackend {
        async fn notify(&self, _notification: &DesktopNotification) -> Result<(), BackendError> {
            Err(BackendError::Unavailable("no session bus".to_string()))
        }
    }

    /// Formatted log output collected by [`capture_logs`]
    #[derive(Clone, Default)]
    pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl LogBuffer {
        pub fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Route this thread's `info` and above records into a buffer until the guard drops
    pub fn capture_logs() -> (LogBuffer, DefaultGuard) {
        let buffer = LogBuffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::INFO)
            .finish();
        let guard = tracing::subscriber::set_default(subscriber);
        (buffer, guard)
    }
}
