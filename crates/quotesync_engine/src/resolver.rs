//! Conflict detection and resolution.
//!
//! Pure functions over the local and remote collections; nothing here
//! touches the store or the network.

use quotesync_core::{QuoteId, QuoteRecord, Timestamp};
use std::collections::HashMap;

/// Name of the resolution strategy applied to every conflict.
pub const STRATEGY_REMOTE_WINS: &str = "remote-wins";

/// A detected conflict between a local and a remote record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    /// Id shared by the two disagreeing records.
    pub id: QuoteId,
    /// Local record's last-mutation timestamp.
    pub local_updated_at: Timestamp,
    /// Remote record's last-mutation timestamp.
    pub remote_updated_at: Timestamp,
    /// Resolution strategy name.
    pub strategy: &'static str,
}

/// Output of conflict resolution.
#[derive(Debug, Clone)]
pub struct Resolution {
    /// Whether any record pair disagreed.
    pub has_conflicts: bool,
    /// The resolved collection handed to the merge engine.
    pub resolved: Vec<QuoteRecord>,
    /// One entry per conflicting record pair.
    pub conflicts: Vec<Conflict>,
}

/// Compares the local and remote collections and resolves disagreements.
///
/// A remote record conflicts with its local counterpart iff the
/// serialized content differs AND both records carry an `updated_at`
/// timestamp AND those timestamps differ. A record pair lacking either
/// timestamp can therefore never be flagged, even when content differs;
/// freshly created records always slide through.
///
/// Policy is remote-wins with a version bump: the resolved record is the
/// local one overwritten by the remote fields, with
/// `version = local.version + 1`.
///
/// With no conflicts the resolved collection is the remote collection
/// verbatim. With conflicts it is the local collection with each
/// conflicting entry replaced in place; remote-only and local-only
/// entries are left for the merge engine.
#[must_use]
pub fn resolve(local: &[QuoteRecord], remote: &[QuoteRecord]) -> Resolution {
    let local_by_id: HashMap<QuoteId, &QuoteRecord> = local
        .iter()
        .filter_map(|record| record.id.map(|id| (id, record)))
        .collect();

    let mut resolutions: HashMap<QuoteId, QuoteRecord> = HashMap::new();
    let mut conflicts = Vec::new();

    for remote_record in remote {
        let Some(id) = remote_record.id else {
            continue;
        };
        let Some(local_record) = local_by_id.get(&id) else {
            continue;
        };
        let (Some(local_at), Some(remote_at)) =
            (local_record.updated_at, remote_record.updated_at)
        else {
            continue;
        };
        if local_at != remote_at && !local_record.content_eq(remote_record) {
            conflicts.push(Conflict {
                id,
                local_updated_at: local_at,
                remote_updated_at: remote_at,
                strategy: STRATEGY_REMOTE_WINS,
            });
            resolutions.insert(id, overwrite_with_remote(local_record, remote_record));
        }
    }

    if conflicts.is_empty() {
        return Resolution {
            has_conflicts: false,
            resolved: remote.to_vec(),
            conflicts,
        };
    }

    let resolved = local
        .iter()
        .map(|record| {
            record
                .id
                .and_then(|id| resolutions.get(&id))
                .cloned()
                .unwrap_or_else(|| record.clone())
        })
        .collect();

    Resolution {
        has_conflicts: true,
        resolved,
        conflicts,
    }
}

/// Remote-wins field overwrite: remote's present fields win, absent
/// optional fields keep the local value, version bumps from local.
fn overwrite_with_remote(local: &QuoteRecord, remote: &QuoteRecord) -> QuoteRecord {
    let mut resolved = local.clone();
    resolved.text = remote.text.clone();
    resolved.category = remote.category.clone();
    resolved.source = remote.source;
    if remote.updated_at.is_some() {
        resolved.updated_at = remote.updated_at;
    }
    if remote.created_at.is_some() {
        resolved.created_at = remote.created_at;
    }
    resolved.version = local.version + 1;
    resolved
}
