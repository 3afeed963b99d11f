//! Quote record model.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Unix-millisecond timestamp.
pub type Timestamp = u64;

/// Returns the current time as unix milliseconds.
#[must_use]
pub fn now_millis() -> Timestamp {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}

/// Identifier assigned to a quote by the remote source.
///
/// Locally created records carry no id until the remote assigns one;
/// once assigned, an id is unique within a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuoteId(pub u64);

impl fmt::Display for QuoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for QuoteId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Provenance of a record, used to decide ownership during merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    /// Created on this device.
    #[default]
    Local,
    /// Received from the remote source.
    Remote,
}

/// A quote in the collection.
///
/// Wire names are camelCase to match the JSON payloads the remote source
/// and import/export format use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRecord {
    /// Remote-assigned identifier; `None` until the remote assigns one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<QuoteId>,
    /// Quote body. Non-empty.
    pub text: String,
    /// Free-form category label. Non-empty.
    pub category: String,
    /// Mutation counter; incremented on every accepted write.
    #[serde(default = "default_version")]
    pub version: u32,
    /// Timestamp of last mutation; absent for records never synced.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
    /// Creation timestamp; set once, never mutated afterwards.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
    /// Where this record came from.
    #[serde(default)]
    pub source: Provenance,
}

fn default_version() -> u32 {
    1
}

impl QuoteRecord {
    /// Creates a record from user input: no id, version 1, created now.
    #[must_use]
    pub fn local(text: impl Into<String>, category: impl Into<String>, now: Timestamp) -> Self {
        Self {
            id: None,
            text: text.into(),
            category: category.into(),
            version: 1,
            updated_at: None,
            created_at: Some(now),
            source: Provenance::Local,
        }
    }

    /// Compares the serialized content of two records.
    ///
    /// Conflict detection is defined over the serialized form rather than
    /// individual fields.
    #[must_use]
    pub fn content_eq(&self, other: &Self) -> bool {
        match (serde_json::to_value(self), serde_json::to_value(other)) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        }
    }
}

/// The five seed quotes the original collection ships with.
#[must_use]
pub fn default_quotes() -> Vec<QuoteRecord> {
    const SEED: [(&str, &str); 5] = [
        (
            "The only way to do great work is to love what you do.",
            "Motivation",
        ),
        (
            "Innovation distinguishes between a leader and a follower.",
            "Business",
        ),
        (
            "The future belongs to those who believe in the beauty of their dreams.",
            "Inspiration",
        ),
        (
            "Success is not final, failure is not fatal: It is the courage to continue that counts.",
            "Success",
        ),
        (
            "The only limit to our realization of tomorrow is our doubts of today.",
            "Inspiration",
        ),
    ];

    SEED.iter()
        .map(|(text, category)| QuoteRecord {
            id: None,
            text: (*text).to_string(),
            category: (*category).to_string(),
            version: 1,
            updated_at: None,
            created_at: None,
            source: Provenance::Local,
        })
        .collect()
}
