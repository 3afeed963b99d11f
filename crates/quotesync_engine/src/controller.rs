//! Sync controller state machine.
//!
//! Orchestrates fetch → resolve → merge → persist → push around the pure
//! resolver and merge engine. At most one cycle is ever in flight; a
//! trigger arriving mid-cycle is dropped, not queued.

use crate::config::SyncConfig;
use crate::error::{SyncError, SyncResult};
use crate::merge::merge;
use crate::observer::{Notification, SyncObserver};
use crate::remote::RemoteSource;
use crate::resolver::resolve;
use parking_lot::RwLock;
use quotesync_core::payload::{collection_fingerprint, export_collection, import_collection};
use quotesync_core::{now_millis, QuoteRecord, QuoteStore, SnapshotStore, Timestamp};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// The current state of the sync controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// No cycle in flight.
    Idle,
    /// A cycle is running.
    Syncing,
    /// Pausing between failed fetch attempts.
    RetryWait,
}

/// What caused a sync cycle to start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncTrigger {
    /// Explicit user request.
    Manual,
    /// The periodic interval fired.
    Periodic,
    /// Connectivity came back.
    Online,
    /// A quote was just added locally.
    PostAdd,
}

/// How a completed cycle went.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Fetch, merge, and push all succeeded with no conflicts.
    Success,
    /// The cycle finished but conflicts were resolved or the push failed.
    Warning,
    /// Fetch retries were exhausted; the local collection is untouched.
    Error,
}

/// Result of a single sync cycle.
#[derive(Debug, Clone)]
pub struct SyncCycleResult {
    /// Overall outcome.
    pub outcome: SyncOutcome,
    /// Number of conflicts resolved during the cycle.
    pub conflicts: usize,
    /// Number of records in the fetched remote snapshot.
    pub pulled: usize,
    /// Whether the local collection changed and was persisted.
    pub changed: bool,
    /// Duration of the cycle.
    pub duration: Duration,
}

/// Statistics across sync cycles.
#[derive(Debug, Clone, Default)]
pub struct SyncStats {
    /// Completed cycles, successful or not.
    pub cycles_completed: u64,
    /// Total conflicts resolved.
    pub conflicts_encountered: u64,
    /// Total fetch retries.
    pub retries: u64,
    /// Time of the last cycle that ran to completion.
    pub last_sync_time: Option<Timestamp>,
    /// Last error message, cleared on success.
    pub last_error: Option<String>,
}

/// The sync controller reconciles the local store with a remote source.
pub struct SyncController<R: RemoteSource, P: SnapshotStore> {
    store: Arc<QuoteStore>,
    remote: R,
    snapshot: P,
    observer: Arc<dyn SyncObserver>,
    config: SyncConfig,
    state: RwLock<SyncState>,
    stats: RwLock<SyncStats>,
}

impl<R: RemoteSource, P: SnapshotStore> SyncController<R, P> {
    /// Creates a controller around an owned store, remote, and snapshot
    /// store.
    pub fn new(
        store: Arc<QuoteStore>,
        remote: R,
        snapshot: P,
        observer: Arc<dyn SyncObserver>,
        config: SyncConfig,
    ) -> Self {
        Self {
            store,
            remote,
            snapshot,
            observer,
            config,
            state: RwLock::new(SyncState::Idle),
            stats: RwLock::new(SyncStats::default()),
        }
    }

    /// Current controller state.
    pub fn state(&self) -> SyncState {
        *self.state.read()
    }

    /// Snapshot of the accumulated statistics.
    pub fn stats(&self) -> SyncStats {
        self.stats.read().clone()
    }

    /// The local store this controller mutates.
    pub fn store(&self) -> &Arc<QuoteStore> {
        &self.store
    }

    /// The remote source this controller syncs against.
    pub fn remote(&self) -> &R {
        &self.remote
    }

    /// Requests a sync cycle.
    ///
    /// Returns `None` without side effects when a cycle is already in
    /// flight; there is no queueing and no cancellation.
    pub fn trigger(&self, trigger: SyncTrigger) -> Option<SyncCycleResult> {
        if let Err(err) = self.begin_cycle() {
            tracing::debug!(?trigger, %err, "sync trigger dropped");
            return None;
        }

        tracing::debug!(?trigger, "sync cycle started");
        let result = self.run_cycle();
        *self.state.write() = SyncState::Idle;
        Some(result)
    }

    /// Runs periodic sync triggers until `stop` is set.
    ///
    /// The interval fires regardless of the prior outcome.
    pub fn run_periodic(&self, stop: &AtomicBool) {
        while !stop.load(Ordering::SeqCst) {
            std::thread::sleep(self.config.sync_interval);
            if stop.load(Ordering::SeqCst) {
                break;
            }
            self.trigger(SyncTrigger::Periodic);
        }
    }

    /// Adds a user-entered quote, persists, and fires a post-add sync.
    ///
    /// Rejects empty text or category with
    /// [`quotesync_core::Error::InvalidInput`].
    pub fn add_quote(&self, text: &str, category: &str) -> SyncResult<QuoteRecord> {
        let text = text.trim();
        let category = category.trim();
        if text.is_empty() || category.is_empty() {
            return Err(quotesync_core::Error::InvalidInput(
                "both quote text and category are required".to_string(),
            )
            .into());
        }

        let record = QuoteRecord::local(text, category, now_millis());
        self.store.add(record.clone());
        self.snapshot.save(&self.store.all()).map_err(SyncError::from)?;
        self.observer.collection_changed(&self.store.all());

        self.trigger(SyncTrigger::PostAdd);
        Ok(record)
    }

    /// Imports a JSON payload into the store.
    ///
    /// A malformed payload fails with `InvalidFormat` and leaves the
    /// store untouched.
    pub fn import(&self, raw: &str) -> SyncResult<usize> {
        let records = import_collection(raw, now_millis()).map_err(SyncError::from)?;
        let count = records.len();
        for record in records {
            self.store.add(record);
        }
        self.snapshot.save(&self.store.all()).map_err(SyncError::from)?;
        self.observer.collection_changed(&self.store.all());
        self.observer
            .notify(&Notification::success(format!("Imported {count} quotes")));
        Ok(count)
    }

    /// Exports the current collection as a JSON payload.
    pub fn export(&self) -> SyncResult<String> {
        export_collection(&self.store.all()).map_err(SyncError::from)
    }

    fn begin_cycle(&self) -> SyncResult<()> {
        let mut state = self.state.write();
        if *state != SyncState::Idle {
            return Err(SyncError::InvalidStateTransition {
                from: format!("{:?}", *state),
                to: format!("{:?}", SyncState::Syncing),
            });
        }
        *state = SyncState::Syncing;
        Ok(())
    }

    fn run_cycle(&self) -> SyncCycleResult {
        let start = Instant::now();

        let remote_records = match self.fetch_with_retry() {
            Ok(records) => records,
            Err(err) => {
                tracing::warn!(%err, "sync aborted: remote fetch exhausted retries");
                self.observer.notify(&Notification::error(format!(
                    "Sync failed: {err}"
                )));
                let mut stats = self.stats.write();
                stats.cycles_completed += 1;
                stats.last_error = Some(err.to_string());
                return SyncCycleResult {
                    outcome: SyncOutcome::Error,
                    conflicts: 0,
                    pulled: 0,
                    changed: false,
                    duration: start.elapsed(),
                };
            }
        };
        let pulled = remote_records.len();

        // Resolve, merge, and persist if anything actually changed.
        let local = self.store.all();
        let resolution = resolve(&local, &remote_records);
        let conflicts = resolution.conflicts.len();
        let merged = merge(&local, &resolution.resolved, now_millis());
        let mut changed = self.apply_if_changed(&local, merged);

        let mut push_failed = false;
        match self.remote.push(&self.store.all()) {
            Ok(server_snapshot) => {
                // Re-merge against the authoritative snapshot to pick up
                // server-assigned ids and versions.
                let current = self.store.all();
                let post_push = merge(&current, &server_snapshot, now_millis());
                changed |= self.apply_if_changed(&current, post_push);
            }
            Err(err) => {
                // Local-first durability: the merge result stays.
                push_failed = true;
                tracing::warn!(%err, "push to remote failed; keeping local changes");
                self.observer.notify(&Notification::warning(format!(
                    "Could not push local quotes: {err}"
                )));
            }
        }

        let now = now_millis();
        if let Err(err) = self.snapshot.set_last_sync(now) {
            tracing::warn!(%err, "failed to record last sync time");
        }

        let outcome = if conflicts > 0 || push_failed {
            SyncOutcome::Warning
        } else {
            SyncOutcome::Success
        };
        match outcome {
            SyncOutcome::Warning if conflicts > 0 => {
                self.observer.notify(&Notification::warning(format!(
                    "Synced with {conflicts} conflict(s) resolved from remote"
                )));
            }
            SyncOutcome::Success => {
                self.observer
                    .notify(&Notification::success("Quotes synced with remote"));
            }
            _ => {}
        }

        {
            let mut stats = self.stats.write();
            stats.cycles_completed += 1;
            stats.conflicts_encountered += conflicts as u64;
            stats.last_sync_time = Some(now);
            stats.last_error = None;
        }

        tracing::info!(
            ?outcome,
            pulled,
            conflicts,
            changed,
            "sync cycle finished"
        );

        SyncCycleResult {
            outcome,
            conflicts,
            pulled,
            changed,
            duration: start.elapsed(),
        }
    }

    /// Replaces and persists the collection when the merged result is not
    /// byte-identical to the current one. Returns whether it changed.
    fn apply_if_changed(&self, current: &[QuoteRecord], merged: Vec<QuoteRecord>) -> bool {
        let before = collection_fingerprint(current).ok();
        let after = collection_fingerprint(&merged).ok();
        if before.is_some() && before == after {
            return false;
        }

        self.store.replace_all(merged);
        let records = self.store.all();
        if let Err(err) = self.snapshot.save(&records) {
            tracing::warn!(%err, "failed to persist snapshot");
            self.observer.notify(&Notification::warning(format!(
                "Could not persist quotes: {err}"
            )));
        }
        self.observer.collection_changed(&records);
        true
    }

    fn fetch_with_retry(&self) -> SyncResult<Vec<QuoteRecord>> {
        let retry = &self.config.retry;
        let mut last_error = None;

        for attempt in 1..=retry.max_attempts {
            if attempt > 1 {
                *self.state.write() = SyncState::RetryWait;
                std::thread::sleep(retry.delay);
                *self.state.write() = SyncState::Syncing;
                self.stats.write().retries += 1;
            }

            match self.remote.fetch_all() {
                Ok(records) => return Ok(records),
                Err(err) => {
                    tracing::warn!(attempt, %err, "fetch from remote failed");
                    self.observer.notify(&Notification::warning(format!(
                        "Fetch attempt {attempt} failed: {err}"
                    )));
                    if !err.is_retryable() {
                        return Err(err);
                    }
                    last_error = Some(err);
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| SyncError::remote_unavailable("no fetch attempts configured")))
    }
}
