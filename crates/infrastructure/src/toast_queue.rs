use std::sync::{Mutex, PoisonError};

use bella_application::{NotificationKind, Notifier};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Lifetime of a toast unless configured otherwise.
pub const DEFAULT_TOAST_DURATION_MS: u64 = 3000;

/// One queued notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    /// Queue-unique identifier.
    pub id: Uuid,
    /// Severity.
    pub kind: NotificationKind,
    /// Heading, defaulted from the kind.
    pub title: String,
    /// Body text.
    pub message: String,
    /// Time the toast was queued.
    pub created_at: DateTime<Utc>,
    /// Display time in milliseconds; zero keeps the toast until dismissed.
    pub duration_ms: u64,
}

impl Toast {
    /// Returns whether the toast is still shown at `now`.
    #[must_use]
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        if self.duration_ms == 0 {
            return true;
        }

        let lifetime =
            i64::try_from(self.duration_ms).map_or(Duration::MAX, Duration::milliseconds);
        self.created_at
            .checked_add_signed(lifetime)
            .is_none_or(|expires_at| now < expires_at)
    }
}

fn default_title(kind: NotificationKind) -> &'static str {
    match kind {
        NotificationKind::Success => "Success",
        NotificationKind::Error => "Error",
        NotificationKind::Info => "Info",
        NotificationKind::Warning => "Warning",
    }
}

/// Notifier that keeps toasts until they expire or are dismissed.
#[derive(Debug)]
pub struct ToastQueue {
    duration_ms: u64,
    toasts: Mutex<Vec<Toast>>,
}

impl ToastQueue {
    /// Creates a queue with the default toast lifetime.
    #[must_use]
    pub fn new() -> Self {
        Self::with_duration(DEFAULT_TOAST_DURATION_MS)
    }

    /// Creates a queue whose toasts live for `duration_ms`.
    #[must_use]
    pub fn with_duration(duration_ms: u64) -> Self {
        Self {
            duration_ms,
            toasts: Mutex::new(Vec::new()),
        }
    }

    /// Queues a toast at an explicit time and returns its id. Toasts expired
    /// at `now` are dropped first.
    pub fn push_at(
        &self,
        message: &str,
        kind: NotificationKind,
        title: Option<&str>,
        now: DateTime<Utc>,
    ) -> Uuid {
        let toast = Toast {
            id: Uuid::new_v4(),
            kind,
            title: title.unwrap_or(default_title(kind)).to_owned(),
            message: message.to_owned(),
            created_at: now,
            duration_ms: self.duration_ms,
        };
        let id = toast.id;
        let mut toasts = self.lock();
        toasts.retain(|queued| queued.is_active_at(now));
        toasts.push(toast);
        id
    }

    /// Drops expired toasts and returns the rest in arrival order.
    pub fn active_at(&self, now: DateTime<Utc>) -> Vec<Toast> {
        let mut toasts = self.lock();
        toasts.retain(|toast| toast.is_active_at(now));
        toasts.clone()
    }

    /// Removes one toast. Returns whether it was queued.
    pub fn dismiss(&self, id: Uuid) -> bool {
        let mut toasts = self.lock();
        let before = toasts.len();
        toasts.retain(|toast| toast.id != id);
        toasts.len() != before
    }

    /// Removes every toast.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Toast>> {
        self.toasts.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ToastQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for ToastQueue {
    fn notify(&self, message: &str, kind: NotificationKind, title: Option<&str>) {
        self.push_at(message, kind, title, Utc::now());
    }
}

#[cfg(test)]
mod tests {
    use bella_application::{NotificationKind, Notifier};
    use chrono::{Duration, TimeZone, Utc};

    use super::ToastQueue;

    #[test]
    fn toasts_expire_after_their_duration() {
        let queue = ToastQueue::with_duration(3000);
        let start = Utc
            .with_ymd_and_hms(2025, 3, 14, 9, 0, 0)
            .single()
            .unwrap_or_else(|| unreachable!());
        queue.push_at("Staff created successfully", NotificationKind::Success, None, start);
        queue.push_at(
            "Email is invalid",
            NotificationKind::Error,
            None,
            start + Duration::seconds(2),
        );

        let active = queue.active_at(start + Duration::milliseconds(2999));
        assert_eq!(active.len(), 2);
        assert_eq!(active[0].title, "Success");
        assert_eq!(active[1].title, "Error");

        let active = queue.active_at(start + Duration::seconds(3));
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].message, "Email is invalid");

        assert!(queue.active_at(start + Duration::seconds(10)).is_empty());
    }

    #[test]
    fn pushing_drops_expired_toasts_without_polling() {
        let queue = ToastQueue::with_duration(3000);
        let start = Utc::now();
        for second in 0..100 {
            queue.push_at(
                "Shift updated successfully",
                NotificationKind::Success,
                None,
                start + Duration::seconds(second * 10),
            );
        }

        assert_eq!(queue.lock().len(), 1);
    }

    #[test]
    fn sticky_toasts_stay_until_dismissed() {
        let queue = ToastQueue::with_duration(0);
        let start = Utc::now();
        let id = queue.push_at(
            "Please log in to access this page",
            NotificationKind::Error,
            Some("Authentication Required"),
            start,
        );

        let active = queue.active_at(start + Duration::days(1));
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].title, "Authentication Required");

        assert!(queue.dismiss(id));
        assert!(!queue.dismiss(id));
        assert!(queue.active_at(start).is_empty());
    }

    #[test]
    fn notifier_port_queues_and_clear_empties() {
        let queue = ToastQueue::new();
        queue.notify("Category deleted successfully", NotificationKind::Success, None);
        queue.notify("Service not found", NotificationKind::Error, None);
        assert_eq!(queue.active_at(Utc::now()).len(), 2);

        queue.clear();
        assert!(queue.active_at(Utc::now()).is_empty());
    }
}
