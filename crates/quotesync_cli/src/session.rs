//! CLI session wiring: snapshot file, store, demo remote, and the
//! terminal observer.

use quotesync_core::{default_quotes, JsonFileSnapshot, QuoteStore, SnapshotStore};
use quotesync_engine::{
    InMemoryRemote, Notification, Severity, SyncConfig, SyncController, SyncObserver,
};
use std::path::Path;
use std::sync::Arc;

/// The controller type every command operates on.
pub type CliController = SyncController<InMemoryRemote, JsonFileSnapshot>;

/// Observer that mirrors sync notifications onto the terminal.
pub struct TerminalObserver;

impl SyncObserver for TerminalObserver {
    fn notify(&self, notification: &Notification) {
        let tag = match notification.severity {
            Severity::Info => "info",
            Severity::Success => "ok",
            Severity::Warning => "warn",
            Severity::Error => "error",
        };
        println!("[{tag}] {}", notification.message);
    }
}

/// Opens the quote collection at `path` and wires up a controller.
///
/// A missing or empty snapshot file seeds the store with the default
/// quotes, matching first-run behavior. The remote is an in-process
/// server seeded with the same defaults; a real deployment would swap in
/// an HTTP-backed source here.
pub fn open(path: &Path, config: SyncConfig) -> Result<CliController, Box<dyn std::error::Error>> {
    let snapshot = JsonFileSnapshot::new(path);
    let records = match snapshot.load()? {
        Some(records) => records,
        None => default_quotes(),
    };
    tracing::debug!(path = %path.display(), count = records.len(), "opened quote collection");

    Ok(SyncController::new(
        Arc::new(QuoteStore::with_records(records)),
        InMemoryRemote::with_default_quotes(),
        snapshot,
        Arc::new(TerminalObserver),
        config,
    ))
}
