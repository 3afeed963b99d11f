//! Merge engine combining the local collection with the resolved remote
//! collection.

use quotesync_core::{Provenance, QuoteId, QuoteRecord, Timestamp};
use std::collections::{HashMap, HashSet};

/// Merges the resolved remote collection into the local one, producing
/// the next local collection.
///
/// - A resolved-remote record with a matching local id overwrites it in
///   place, preserving the local `category` when the remote value is
///   empty, with `version = remote.version + 1` and `updated_at = now`.
/// - A resolved-remote record with no local match is appended at the
///   end, in remote order, tagged remote.
/// - A local record absent from the remote collection (or carrying no id
///   at all) is kept in place, tagged local, with `version` defaulted to
///   at least 1 and a `created_at` stamped when missing.
///
/// Note the deliberate asymmetry with the resolver: conflict resolution
/// is remote-wins, but the merge-time category preference is local-wins.
#[must_use]
pub fn merge(
    local: &[QuoteRecord],
    resolved_remote: &[QuoteRecord],
    now: Timestamp,
) -> Vec<QuoteRecord> {
    let remote_by_id: HashMap<QuoteId, &QuoteRecord> = resolved_remote
        .iter()
        .filter_map(|record| record.id.map(|id| (id, record)))
        .collect();
    let local_ids: HashSet<QuoteId> = local.iter().filter_map(|record| record.id).collect();

    let mut merged = Vec::with_capacity(local.len() + resolved_remote.len());

    for record in local {
        match record.id.and_then(|id| remote_by_id.get(&id)) {
            Some(remote_record) => merged.push(overwrite_local(record, remote_record, now)),
            None => merged.push(keep_local(record, now)),
        }
    }

    for record in resolved_remote {
        let is_new = record
            .id
            .is_some_and(|id| !local_ids.contains(&id));
        if is_new {
            let mut added = record.clone();
            added.source = Provenance::Remote;
            merged.push(added);
        }
    }

    merged
}

fn overwrite_local(local: &QuoteRecord, remote: &QuoteRecord, now: Timestamp) -> QuoteRecord {
    let mut updated = remote.clone();
    updated.id = local.id;
    if updated.category.is_empty() {
        updated.category = local.category.clone();
    }
    if updated.created_at.is_none() {
        updated.created_at = local.created_at;
    }
    updated.version = remote.version + 1;
    updated.updated_at = Some(now);
    updated
}

fn keep_local(local: &QuoteRecord, now: Timestamp) -> QuoteRecord {
    let mut kept = local.clone();
    kept.source = Provenance::Local;
    kept.version = kept.version.max(1);
    if kept.created_at.is_none() {
        kept.created_at = Some(now);
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::resolve;
    use proptest::prelude::*;

    fn record(id: Option<u64>, text: &str, category: &str, version: u32) -> QuoteRecord {
        QuoteRecord {
            id: id.map(QuoteId),
            text: text.to_string(),
            category: category.to_string(),
            version,
            updated_at: None,
            created_at: Some(1),
            source: Provenance::Local,
        }
    }

    #[test]
    fn merge_with_empty_remote_is_identity() {
        let local = vec![
            record(Some(1), "A", "X", 1),
            record(None, "B", "Y", 1),
        ];

        let resolution = resolve(&local, &[]);
        let merged = merge(&local, &resolution.resolved, 999);
        assert_eq!(merged, local);
    }

    #[test]
    fn remote_only_records_append_in_remote_order() {
        let local = vec![record(Some(1), "A", "X", 1)];
        let remote = vec![
            record(Some(3), "C", "Z", 1),
            record(Some(1), "A", "X", 1),
            record(Some(2), "B", "Y", 1),
        ];

        let merged = merge(&local, &remote, 10);
        assert_eq!(merged.len(), 3);
        assert_eq!(merged[0].id, Some(QuoteId(1)));
        assert_eq!(merged[1].id, Some(QuoteId(3)));
        assert_eq!(merged[2].id, Some(QuoteId(2)));
        assert_eq!(merged[1].source, Provenance::Remote);
    }

    #[test]
    fn matched_records_bump_version_and_stamp_updated_at() {
        let local = vec![record(Some(1), "A", "X", 1)];
        let remote = vec![record(Some(1), "A2", "X", 2)];

        let merged = merge(&local, &remote, 777);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].text, "A2");
        assert_eq!(merged[0].version, 3);
        assert_eq!(merged[0].updated_at, Some(777));
    }

    #[test]
    fn empty_remote_category_keeps_local_category() {
        let local = vec![record(Some(1), "A", "Wisdom", 1)];
        let remote = vec![record(Some(1), "A2", "", 2)];

        let merged = merge(&local, &remote, 10);
        assert_eq!(merged[0].category, "Wisdom");
        assert_eq!(merged[0].text, "A2");
    }

    #[test]
    fn idless_local_records_survive() {
        let local = vec![record(None, "mine", "X", 1)];
        let remote = vec![record(Some(1), "theirs", "Y", 1)];

        let merged = merge(&local, &remote, 10);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].text, "mine");
        assert_eq!(merged[0].source, Provenance::Local);
        assert_eq!(merged[1].text, "theirs");
    }

    #[test]
    fn kept_local_records_get_version_and_created_at_defaults() {
        let mut orphan = record(Some(7), "kept", "X", 0);
        orphan.created_at = None;

        let merged = merge(&[orphan], &[], 42);
        assert_eq!(merged[0].version, 1);
        assert_eq!(merged[0].created_at, Some(42));
    }

    #[test]
    fn missing_remote_created_at_keeps_local_value() {
        let local = vec![record(Some(1), "A", "X", 1)];
        let mut remote_record = record(Some(1), "A2", "X", 2);
        remote_record.created_at = None;

        let merged = merge(&local, &[remote_record], 10);
        assert_eq!(merged[0].created_at, Some(1));
    }

    #[test]
    fn conflict_scenario_version_chain() {
        // L = [{id:1, text:"A", version:1, updatedAt:t0}]
        // R = [{id:1, text:"A2", version:2, updatedAt:t1}]
        // resolve -> version 2, merge -> version 3.
        let mut local_record = record(Some(1), "A", "X", 1);
        local_record.updated_at = Some(100);
        let mut remote_record = record(Some(1), "A2", "X", 2);
        remote_record.updated_at = Some(200);

        let local = vec![local_record];
        let resolution = resolve(&local, &[remote_record]);
        assert!(resolution.has_conflicts);
        assert_eq!(resolution.resolved[0].version, 2);

        let merged = merge(&local, &resolution.resolved, 300);
        assert_eq!(merged[0].text, "A2");
        assert_eq!(merged[0].category, "X");
        assert_eq!(merged[0].version, 3);
    }

    fn arb_record(max_id: u64) -> impl Strategy<Value = QuoteRecord> {
        (
            proptest::option::of(0..max_id),
            "[a-z]{1,8}",
            "[A-Z][a-z]{0,5}",
            1u32..5,
            proptest::option::of(0u64..1000),
        )
            .prop_map(|(id, text, category, version, updated_at)| QuoteRecord {
                id: id.map(QuoteId),
                text,
                category,
                version,
                updated_at,
                created_at: Some(1),
                source: Provenance::Local,
            })
    }

    fn arb_collection(max_id: u64) -> impl Strategy<Value = Vec<QuoteRecord>> {
        proptest::collection::vec(arb_record(max_id), 0..8).prop_map(|records| {
            // Enforce the id-uniqueness invariant within a collection.
            let mut seen = HashSet::new();
            records
                .into_iter()
                .filter(|r| r.id.map_or(true, |id| seen.insert(id)))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn merge_never_drops_local_records(
            local in arb_collection(10),
            remote in arb_collection(10),
        ) {
            let merged = merge(&local, &remote, 50);
            let remote_ids: HashSet<QuoteId> =
                remote.iter().filter_map(|r| r.id).collect();

            for (index, record) in local.iter().enumerate() {
                let retained = record.id.map_or(true, |id| !remote_ids.contains(&id));
                if retained {
                    // Kept in place, unchanged apart from tagging/defaults.
                    prop_assert_eq!(&merged[index].text, &record.text);
                    prop_assert_eq!(&merged[index].category, &record.category);
                    prop_assert_eq!(merged[index].id, record.id);
                } else {
                    // Overwritten in place, never dropped.
                    prop_assert_eq!(merged[index].id, record.id);
                }
            }
        }

        #[test]
        fn merged_versions_exceed_remote_versions(
            local in arb_collection(10),
            remote in arb_collection(10),
        ) {
            let merged = merge(&local, &remote, 50);
            let local_ids: HashSet<QuoteId> =
                local.iter().filter_map(|r| r.id).collect();

            for remote_record in &remote {
                let Some(id) = remote_record.id else { continue };
                if local_ids.contains(&id) {
                    let updated = merged.iter().find(|r| r.id == Some(id)).unwrap();
                    prop_assert!(updated.version > remote_record.version);
                    prop_assert_eq!(updated.updated_at, Some(50));
                }
            }
        }

        #[test]
        fn merge_result_has_unique_ids(
            local in arb_collection(10),
            remote in arb_collection(10),
        ) {
            let merged = merge(&local, &remote, 50);
            let mut seen = HashSet::new();
            for record in &merged {
                if let Some(id) = record.id {
                    prop_assert!(seen.insert(id), "duplicate id {} in merge result", id);
                }
            }
        }
    }
}
