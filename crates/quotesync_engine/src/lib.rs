//! # QuoteSync Engine
//!
//! Local/remote reconciliation engine for QuoteSync.
//!
//! This crate provides:
//! - Remote source abstraction with an in-memory, fault-injecting double
//! - Pure conflict resolution (remote-wins with version bump)
//! - Pure merge engine (local-wins category preference)
//! - Sync controller state machine (idle → syncing → retry-wait)
//! - Fixed-delay retry and periodic triggering
//! - Notification/observer surface for the UI collaborator
//!
//! ## Architecture
//!
//! A sync cycle is **fetch → resolve → merge → persist → push**, then a
//! second merge against the remote's post-push snapshot to pick up
//! server-assigned ids and versions.
//!
//! ## Key Invariants
//!
//! - At most one cycle is in flight; triggers arriving mid-cycle are
//!   dropped, never queued
//! - Conflict resolution is remote-wins; merge-time category preference
//!   is local-wins
//! - A push failure never rolls back local changes
//! - Every failure path returns the controller to idle with the last
//!   known-good collection intact

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod controller;
mod error;
mod merge;
mod observer;
mod remote;
mod resolver;

pub use config::{RetryConfig, SyncConfig};
pub use controller::{
    SyncController, SyncCycleResult, SyncOutcome, SyncState, SyncStats, SyncTrigger,
};
pub use error::{SyncError, SyncResult};
pub use merge::merge;
pub use observer::{Notification, NullObserver, RecordingObserver, Severity, SyncObserver};
pub use remote::{FaultPolicy, InMemoryRemote, RemoteSource};
pub use resolver::{resolve, Conflict, Resolution, STRATEGY_REMOTE_WINS};
