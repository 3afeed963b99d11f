//! Observer surface for the UI collaborator.
//!
//! The engine never renders anything; it hands the UI collaborator
//! notification events and collection-changed callbacks and lets it
//! decide what to do with them.

use parking_lot::Mutex;
use quotesync_core::QuoteRecord;

/// Severity of a notification event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Informational message.
    Info,
    /// A sync cycle completed cleanly.
    Success,
    /// Something degraded but the cycle carried on.
    Warning,
    /// A cycle aborted.
    Error,
}

/// A user-visible notification event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Human-readable message.
    pub message: String,
    /// Severity of the event.
    pub severity: Severity,
}

impl Notification {
    /// Creates an info notification.
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Info,
        }
    }

    /// Creates a success notification.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Success,
        }
    }

    /// Creates a warning notification.
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Warning,
        }
    }

    /// Creates an error notification.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Error,
        }
    }
}

/// Callback surface the sync controller reports through.
pub trait SyncObserver: Send + Sync {
    /// Delivers a notification event.
    fn notify(&self, notification: &Notification);

    /// Called after the local collection was replaced and persisted.
    ///
    /// The UI collaborator refreshes its category list and displayed
    /// quote from here.
    fn collection_changed(&self, _records: &[QuoteRecord]) {}
}

/// An observer that drops everything.
#[derive(Debug, Default)]
pub struct NullObserver;

impl SyncObserver for NullObserver {
    fn notify(&self, _notification: &Notification) {}
}

/// An observer that records everything, for tests.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    notifications: Mutex<Vec<Notification>>,
    change_events: Mutex<Vec<Vec<QuoteRecord>>>,
}

impl RecordingObserver {
    /// Creates an empty recording observer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all notifications received so far.
    #[must_use]
    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications.lock().clone()
    }

    /// Returns the notifications of a given severity.
    #[must_use]
    pub fn with_severity(&self, severity: Severity) -> Vec<Notification> {
        self.notifications
            .lock()
            .iter()
            .filter(|n| n.severity == severity)
            .cloned()
            .collect()
    }

    /// Returns every collection the controller announced.
    #[must_use]
    pub fn change_events(&self) -> Vec<Vec<QuoteRecord>> {
        self.change_events.lock().clone()
    }
}

impl SyncObserver for RecordingObserver {
    fn notify(&self, notification: &Notification) {
        self.notifications.lock().push(notification.clone());
    }

    fn collection_changed(&self, records: &[QuoteRecord]) {
        self.change_events.lock().push(records.to_vec());
    }
}
