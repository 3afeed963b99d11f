//! In-memory quote store.

use crate::record::QuoteRecord;
use parking_lot::RwLock;
use rand::seq::SliceRandom;

/// An ordered, interior-mutable collection of quote records.
///
/// The store never checks id uniqueness on `add`; ids are assigned
/// downstream by the remote source. Persistence is a caller-triggered
/// side effect, not internal to the store.
///
/// # Thread Safety
///
/// The store is thread-safe; locks are held only for the duration of a
/// single operation, so `replace_all` swaps the backing collection with
/// no partial visibility.
#[derive(Debug, Default)]
pub struct QuoteStore {
    records: RwLock<Vec<QuoteRecord>>,
}

impl QuoteStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with an initial collection.
    #[must_use]
    pub fn with_records(records: Vec<QuoteRecord>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }

    /// Appends a record to the collection.
    pub fn add(&self, record: QuoteRecord) {
        self.records.write().push(record);
    }

    /// Returns a snapshot copy of the whole collection.
    #[must_use]
    pub fn all(&self) -> Vec<QuoteRecord> {
        self.records.read().clone()
    }

    /// Returns the records in the given category.
    #[must_use]
    pub fn by_category(&self, category: &str) -> Vec<QuoteRecord> {
        self.records
            .read()
            .iter()
            .filter(|record| record.category == category)
            .cloned()
            .collect()
    }

    /// Atomically replaces the entire backing collection.
    pub fn replace_all(&self, records: Vec<QuoteRecord>) {
        *self.records.write() = records;
    }

    /// Returns the sorted, deduplicated category labels.
    #[must_use]
    pub fn categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = self
            .records
            .read()
            .iter()
            .map(|record| record.category.clone())
            .collect();
        categories.sort();
        categories.dedup();
        categories
    }

    /// Picks a uniformly random record, optionally restricted to a category.
    ///
    /// Returns `None` when the (filtered) collection is empty.
    #[must_use]
    pub fn random(&self, category: Option<&str>) -> Option<QuoteRecord> {
        let records = self.records.read();
        let filtered: Vec<&QuoteRecord> = records
            .iter()
            .filter(|record| category.is_none_or(|c| record.category == c))
            .collect();
        filtered.choose(&mut rand::thread_rng()).map(|r| (*r).clone())
    }

    /// Number of records in the collection.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Returns true if the collection is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{default_quotes, QuoteRecord};

    fn record(text: &str, category: &str) -> QuoteRecord {
        QuoteRecord::local(text, category, 0)
    }

    #[test]
    fn add_appends_in_order() {
        let store = QuoteStore::new();
        store.add(record("a", "X"));
        store.add(record("b", "Y"));

        let all = store.all();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].text, "a");
        assert_eq!(all[1].text, "b");
    }

    #[test]
    fn add_does_not_enforce_id_uniqueness() {
        let store = QuoteStore::new();
        let mut first = record("a", "X");
        first.id = Some(1.into());
        let mut second = record("b", "Y");
        second.id = Some(1.into());

        store.add(first);
        store.add(second);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn by_category_filters() {
        let store = QuoteStore::with_records(default_quotes());
        let inspiration = store.by_category("Inspiration");
        assert_eq!(inspiration.len(), 2);
        assert!(inspiration.iter().all(|q| q.category == "Inspiration"));
        assert!(store.by_category("Nope").is_empty());
    }

    #[test]
    fn replace_all_swaps_collection() {
        let store = QuoteStore::with_records(default_quotes());
        store.replace_all(vec![record("only", "Z")]);
        assert_eq!(store.len(), 1);
        assert_eq!(store.all()[0].text, "only");
    }

    #[test]
    fn categories_are_sorted_and_unique() {
        let store = QuoteStore::with_records(default_quotes());
        assert_eq!(
            store.categories(),
            vec!["Business", "Inspiration", "Motivation", "Success"]
        );
    }

    #[test]
    fn random_respects_category_filter() {
        let store = QuoteStore::with_records(default_quotes());

        for _ in 0..20 {
            let quote = store.random(Some("Business")).unwrap();
            assert_eq!(quote.category, "Business");
        }

        assert!(store.random(Some("Nope")).is_none());
        assert!(store.random(None).is_some());
    }

    #[test]
    fn random_on_empty_store_is_none() {
        let store = QuoteStore::new();
        assert!(store.random(None).is_none());
        assert!(store.is_empty());
    }
}
