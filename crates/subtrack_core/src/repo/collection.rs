//! Whole-collection persistence and normalization.
//!
//! # Responsibility
//! - Recover the valid subset of a possibly corrupt stored array.
//! - Rewrite a collection as one serialized JSON array.
//!
//! # Invariants
//! - Reads never fail: unreadable or non-array values load as empty.
//! - A collection is rewritten on read only when elements were dropped, and
//!   then exactly once.
//! - Element order is preserved through normalization.

use super::RepoResult;
use crate::model::list::List;
use crate::model::subscription::Subscription;
use crate::model::validation::{parse_record, Validate, ValidationError};
use crate::store::KeyValueStore;
use log::{debug, error, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;
use std::marker::PhantomData;

/// Entity stored as one element of a collection array.
pub trait Record: Serialize + DeserializeOwned + Validate {
    fn record_id(&self) -> &str;
}

impl Record for List {
    fn record_id(&self) -> &str {
        &self.id
    }
}

impl Record for Subscription {
    fn record_id(&self) -> &str {
        &self.id
    }
}

/// Result of normalizing stored collection text.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized<T> {
    /// Valid elements in stored order.
    pub items: Vec<T>,
    /// Number of array elements that failed validation.
    pub dropped: usize,
}

impl<T> Normalized<T> {
    fn empty() -> Self {
        Self {
            items: Vec::new(),
            dropped: 0,
        }
    }
}

/// Recovers the valid elements of a stored collection.
///
/// `None`, undeserializable text and non-array JSON all yield an empty
/// collection with nothing dropped, as if the key had never been written.
pub fn normalize_collection<T: Record>(raw: Option<&str>) -> Normalized<T> {
    let Some(text) = raw else {
        return Normalized::empty();
    };

    let value = match serde_json::from_str::<Value>(text) {
        Ok(value) => value,
        Err(err) => {
            warn!("event=collection_normalize module=repo status=unreadable error={err}");
            return Normalized::empty();
        }
    };

    let Value::Array(elements) = value else {
        warn!("event=collection_normalize module=repo status=not_array");
        return Normalized::empty();
    };

    if let Ok(items) = elements
        .iter()
        .map(parse_record::<T>)
        .collect::<Result<Vec<T>, _>>()
    {
        return Normalized { items, dropped: 0 };
    }

    let total = elements.len();
    let items = elements
        .iter()
        .filter_map(|element| match parse_record::<T>(element) {
            Ok(item) => Some(item),
            Err(err) => {
                debug!("event=collection_normalize module=repo status=drop reason={err}");
                None
            }
        })
        .collect::<Vec<_>>();
    let dropped = total - items.len();

    Normalized { items, dropped }
}

/// Rejects the first id that occurs twice in `items`.
pub(crate) fn ensure_unique_ids<T: Record>(items: &[T]) -> Result<(), ValidationError> {
    let mut seen = HashSet::with_capacity(items.len());
    for item in items {
        if !seen.insert(item.record_id()) {
            return Err(ValidationError::DuplicateId(item.record_id().to_string()));
        }
    }
    Ok(())
}

/// Typed handle on one collection key.
pub(crate) struct Collection<'s, T> {
    store: &'s dyn KeyValueStore,
    key: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<'s, T: Record> Collection<'s, T> {
    pub(crate) fn new(store: &'s dyn KeyValueStore, key: &'static str) -> Self {
        Self {
            store,
            key,
            _marker: PhantomData,
        }
    }

    /// Loads the normalized collection, rewriting storage if corruption was found.
    ///
    /// Read failures are logged and load as empty; use `load_for_write` when the
    /// result is about to be written back.
    pub(crate) fn load(&self) -> Vec<T> {
        let raw = match self.store.get(self.key) {
            Ok(raw) => raw,
            Err(err) => {
                error!(
                    "event=collection_load module=repo status=error key={} error={}",
                    self.key, err
                );
                None
            }
        };
        self.heal(raw.as_deref())
    }

    /// Like `load`, but a failed read is returned instead of treated as absent.
    pub(crate) fn load_for_write(&self) -> RepoResult<Vec<T>> {
        let raw = self.store.get(self.key).map_err(|err| {
            error!(
                "event=collection_load module=repo status=error key={} mode=write error={}",
                self.key, err
            );
            err
        })?;
        Ok(self.heal(raw.as_deref()))
    }

    fn heal(&self, raw: Option<&str>) -> Vec<T> {
        let normalized = normalize_collection::<T>(raw);
        if normalized.dropped > 0 {
            warn!(
                "event=collection_heal module=repo status=start key={} dropped={} kept={}",
                self.key,
                normalized.dropped,
                normalized.items.len()
            );
            if let Err(err) = self.save(&normalized.items) {
                error!(
                    "event=collection_heal module=repo status=error key={} error={}",
                    self.key, err
                );
            }
        }

        normalized.items
    }

    /// Validates every element and writes the collection as one JSON array.
    pub(crate) fn save(&self, items: &[T]) -> RepoResult<()> {
        for item in items {
            item.validate()?;
        }
        let text = serde_json::to_string(items)?;
        self.store.set(self.key, &text)?;
        debug!(
            "event=collection_save module=repo status=ok key={} count={}",
            self.key,
            items.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{normalize_collection, Collection, Normalized};
    use crate::model::list::List;
    use crate::store::{KeyValueStore, MemoryStore};

    #[test]
    fn missing_and_garbage_values_normalize_to_empty() {
        assert_eq!(normalize_collection::<List>(None), Normalized::empty());
        assert_eq!(
            normalize_collection::<List>(Some("{not json")),
            Normalized::empty()
        );
        assert_eq!(
            normalize_collection::<List>(Some(r#"{"id":"L1","name":"x"}"#)),
            Normalized::empty()
        );
    }

    #[test]
    fn mixed_array_keeps_valid_elements_in_order() {
        let raw = r#"[
            {"id":"L1","name":"One"},
            {"id":"L2","name":""},
            42,
            {"id":"L3","name":"Three"}
        ]"#;
        let normalized = normalize_collection::<List>(Some(raw));
        assert_eq!(
            normalized.items,
            vec![List::new("L1", "One"), List::new("L3", "Three")]
        );
        assert_eq!(normalized.dropped, 2);
    }

    #[test]
    fn load_heals_once_and_save_rejects_invalid_elements() {
        let store = MemoryStore::with_entries([(
            "lists",
            r#"[{"id":"L1","name":"One"},{"id":"","name":"bad"}]"#,
        )]);
        let lists = Collection::<List>::new(&store, "lists");

        assert_eq!(lists.load(), vec![List::new("L1", "One")]);
        assert_eq!(store.write_count(), 1);
        assert_eq!(lists.load().len(), 1);
        assert_eq!(store.write_count(), 1);

        let err = lists.save(&[List::new("L2", " ")]).unwrap_err();
        assert!(matches!(err, crate::repo::RepoError::Validation(_)));
        assert_eq!(
            store.get("lists").unwrap().as_deref(),
            Some(r#"[{"id":"L1","name":"One"}]"#)
        );
    }
}
