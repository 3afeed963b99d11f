//! # QuoteSync Core
//!
//! Shared model and persistence layer for QuoteSync.
//!
//! This crate provides:
//! - The quote record model with remote-assigned ids, versions, and
//!   provenance tagging
//! - An ordered in-memory quote store with category filtering and random
//!   selection
//! - Snapshot persistence (in-memory and single-file JSON)
//! - The JSON import/export payload codec

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod payload;
pub mod record;
pub mod snapshot;
pub mod store;

pub use error::{Error, Result};
pub use record::{
    default_quotes, now_millis, Provenance, QuoteId, QuoteRecord, Timestamp,
};
pub use snapshot::{JsonFileSnapshot, MemorySnapshot, SnapshotStore};
pub use store::QuoteStore;
