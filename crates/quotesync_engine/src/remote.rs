//! Remote source abstraction and the in-memory test double.

use crate::error::{SyncError, SyncResult};
use parking_lot::Mutex;
use quotesync_core::{default_quotes, now_millis, Provenance, QuoteId, QuoteRecord};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// A remote source holds the authoritative copy of the collection.
///
/// Both calls are idempotent from the controller's perspective: retrying
/// a fetch has no side effect; retrying a push may create duplicate
/// remote records if the implementation assigns new ids without
/// deduplication, and the controller must not mask that.
pub trait RemoteSource: Send + Sync {
    /// Returns the remote's current collection snapshot.
    ///
    /// Fails with [`SyncError::RemoteUnavailable`] on network or server
    /// failure.
    fn fetch_all(&self) -> SyncResult<Vec<QuoteRecord>>;

    /// Sends the local collection; on success returns the remote's
    /// authoritative post-push snapshot.
    fn push(&self, records: &[QuoteRecord]) -> SyncResult<Vec<QuoteRecord>>;
}

/// Failure and latency injection policy for [`InMemoryRemote`].
///
/// Replaces ad-hoc randomized delays with an explicit, configurable
/// policy the tests control.
#[derive(Debug, Default)]
pub struct FaultPolicy {
    /// Simulated latency applied to every call.
    pub latency: Duration,
    /// Number of upcoming fetches that fail with `RemoteUnavailable`.
    pub fail_fetches: usize,
    /// Number of upcoming pushes that fail with `RemoteUnavailable`.
    pub fail_pushes: usize,
}

impl FaultPolicy {
    /// A policy that never fails and adds no latency.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Fails the next `n` fetches.
    #[must_use]
    pub fn failing_fetches(n: usize) -> Self {
        Self {
            fail_fetches: n,
            ..Self::default()
        }
    }

    /// Fails the next `n` pushes.
    #[must_use]
    pub fn failing_pushes(n: usize) -> Self {
        Self {
            fail_pushes: n,
            ..Self::default()
        }
    }

    /// Sets the simulated latency.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }
}

/// In-memory remote source, a port of the original mock quote server.
///
/// Assigns incrementing ids to pushed id-less records, versions updates
/// server-side, and exposes update/delete capabilities the merge core
/// never exercises. Tests drive failures through [`FaultPolicy`] and read
/// the call counters to assert retry and reentrancy behavior.
#[derive(Debug, Default)]
pub struct InMemoryRemote {
    quotes: Mutex<Vec<QuoteRecord>>,
    next_id: Mutex<u64>,
    faults: Mutex<FaultPolicy>,
    fetch_calls: AtomicUsize,
    push_calls: AtomicUsize,
}

impl InMemoryRemote {
    /// Creates an empty remote.
    #[must_use]
    pub fn new() -> Self {
        Self {
            quotes: Mutex::new(Vec::new()),
            next_id: Mutex::new(1),
            faults: Mutex::new(FaultPolicy::none()),
            fetch_calls: AtomicUsize::new(0),
            push_calls: AtomicUsize::new(0),
        }
    }

    /// Creates a remote seeded with the five default quotes, ids 1–5.
    #[must_use]
    pub fn with_default_quotes() -> Self {
        let remote = Self::new();
        remote.set_quotes(
            default_quotes()
                .into_iter()
                .enumerate()
                .map(|(index, mut quote)| {
                    quote.id = Some(QuoteId(index as u64 + 1));
                    quote.source = Provenance::Remote;
                    quote
                })
                .collect(),
        );
        remote
    }

    /// Replaces the server-side collection, advancing the id counter past
    /// the highest assigned id.
    pub fn set_quotes(&self, quotes: Vec<QuoteRecord>) {
        let max_id = quotes.iter().filter_map(|q| q.id).map(|id| id.0).max();
        *self.next_id.lock() = max_id.map_or(1, |id| id + 1);
        *self.quotes.lock() = quotes;
    }

    /// Returns a copy of the server-side collection.
    #[must_use]
    pub fn quotes(&self) -> Vec<QuoteRecord> {
        self.quotes.lock().clone()
    }

    /// Installs a fault policy.
    pub fn set_faults(&self, policy: FaultPolicy) {
        *self.faults.lock() = policy;
    }

    /// Number of `fetch_all` calls made so far.
    #[must_use]
    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    /// Number of `push` calls made so far.
    #[must_use]
    pub fn push_calls(&self) -> usize {
        self.push_calls.load(Ordering::SeqCst)
    }

    /// Updates a quote server-side: bumps the version, stamps
    /// `updated_at`, and returns the updated record.
    ///
    /// Fails with [`SyncError::NotFound`] for an unknown id. This is a
    /// remote capability; the merge core never calls it.
    pub fn update_quote(
        &self,
        id: QuoteId,
        text: Option<&str>,
        category: Option<&str>,
    ) -> SyncResult<QuoteRecord> {
        let mut quotes = self.quotes.lock();
        let quote = quotes
            .iter_mut()
            .find(|q| q.id == Some(id))
            .ok_or(SyncError::NotFound(id))?;

        if let Some(text) = text {
            quote.text = text.to_string();
        }
        if let Some(category) = category {
            quote.category = category.to_string();
        }
        quote.version += 1;
        quote.updated_at = Some(now_millis());
        Ok(quote.clone())
    }

    /// Deletes a quote server-side and returns it.
    ///
    /// Fails with [`SyncError::NotFound`] for an unknown id.
    pub fn delete_quote(&self, id: QuoteId) -> SyncResult<QuoteRecord> {
        let mut quotes = self.quotes.lock();
        let index = quotes
            .iter()
            .position(|q| q.id == Some(id))
            .ok_or(SyncError::NotFound(id))?;
        Ok(quotes.remove(index))
    }

    fn apply_faults(&self, operation: &str) -> SyncResult<()> {
        let mut faults = self.faults.lock();
        if !faults.latency.is_zero() {
            let latency = faults.latency;
            drop(faults);
            std::thread::sleep(latency);
            faults = self.faults.lock();
        }
        let budget = if operation == "fetch" {
            &mut faults.fail_fetches
        } else {
            &mut faults.fail_pushes
        };
        if *budget > 0 {
            *budget -= 1;
            return Err(SyncError::remote_unavailable(format!(
                "simulated {operation} failure"
            )));
        }
        Ok(())
    }
}

impl RemoteSource for InMemoryRemote {
    fn fetch_all(&self) -> SyncResult<Vec<QuoteRecord>> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        self.apply_faults("fetch")?;
        Ok(self.quotes())
    }

    fn push(&self, records: &[QuoteRecord]) -> SyncResult<Vec<QuoteRecord>> {
        self.push_calls.fetch_add(1, Ordering::SeqCst);
        self.apply_faults("push")?;

        let mut quotes = self.quotes.lock();
        for record in records {
            match record.id {
                None => {
                    // New local record: assign an id unless an identical
                    // quote already made it over in an earlier push.
                    let already_known = quotes
                        .iter()
                        .any(|q| q.text == record.text && q.category == record.category);
                    if already_known {
                        continue;
                    }
                    let mut assigned = record.clone();
                    let mut next_id = self.next_id.lock();
                    assigned.id = Some(QuoteId(*next_id));
                    *next_id += 1;
                    assigned.version = 1;
                    assigned.created_at = Some(now_millis());
                    assigned.source = Provenance::Remote;
                    quotes.push(assigned);
                }
                Some(id) => match quotes.iter_mut().find(|q| q.id == Some(id)) {
                    Some(existing) => {
                        if existing.text != record.text || existing.category != record.category {
                            existing.text = record.text.clone();
                            existing.category = record.category.clone();
                            existing.version += 1;
                            existing.updated_at = Some(now_millis());
                        }
                    }
                    None => {
                        let mut adopted = record.clone();
                        adopted.source = Provenance::Remote;
                        // Keep the id counter ahead of adopted ids so a
                        // later id-less push cannot be assigned one of
                        // them.
                        let mut next_id = self.next_id.lock();
                        if id.0 >= *next_id {
                            *next_id = id.0 + 1;
                        }
                        quotes.push(adopted);
                    }
                },
            }
        }
        Ok(quotes.clone())
    }
}
