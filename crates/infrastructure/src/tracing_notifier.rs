//! Notifier that writes toasts to tracing output.

use bella_application::{NotificationKind, Notifier};
use tracing::{info, warn};

/// Logs every notification instead of showing it.
#[derive(Clone, Default)]
pub struct TracingNotifier;

impl TracingNotifier {
    /// Creates a new tracing notifier.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Notifier for TracingNotifier {
    fn notify(&self, message: &str, kind: NotificationKind, title: Option<&str>) {
        let title = title.unwrap_or_default();
        match kind {
            NotificationKind::Error => {
                warn!(kind = kind.as_str(), title = title, "{message}");
            }
            NotificationKind::Success | NotificationKind::Info | NotificationKind::Warning => {
                info!(kind = kind.as_str(), title = title, "{message}");
            }
        }
    }
}
