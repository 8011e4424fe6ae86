use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use subtrack_core::store::{KeyValueStore, StoreError, StoreResult, LISTS_KEY, SUBSCRIPTIONS_KEY};
use subtrack_core::{
    normalize_collection, List, ListRepository, MemoryStore, Subscription,
    SubscriptionRepository, UuidIdGenerator,
};

fn valid_subscription(id: &str) -> Value {
    json!({
        "id": id,
        "name": format!("Sub {id}"),
        "icon": null,
        "listId": null,
        "frequency": "monthly",
        "amount": 4.5,
        "currency": "USD",
        "startDate": "2025-01-01T00:00:00.000Z"
    })
}

#[test]
fn valid_collection_is_returned_unchanged_without_rewrite() {
    let raw = json!([valid_subscription("S1"), valid_subscription("S2")]).to_string();
    let store = MemoryStore::with_entries([(SUBSCRIPTIONS_KEY, raw.clone())]);
    let repo = SubscriptionRepository::new(&store, &UuidIdGenerator);

    let ids = repo
        .list()
        .into_iter()
        .map(|sub| sub.id)
        .collect::<Vec<_>>();
    assert_eq!(ids, vec!["S1", "S2"]);
    assert_eq!(store.write_count(), 0);
    assert_eq!(store.raw(SUBSCRIPTIONS_KEY), Some(raw));
}

#[test]
fn mixed_collection_returns_valid_subset_and_heals_once() {
    let mut negative = valid_subscription("S2");
    negative["amount"] = json!(-3);
    let mut legacy = valid_subscription("S3");
    legacy["frequency"] = json!("weekly");
    let raw = json!([
        valid_subscription("S1"),
        negative,
        legacy,
        "garbage",
        valid_subscription("S4")
    ])
    .to_string();
    let store = MemoryStore::with_entries([(SUBSCRIPTIONS_KEY, raw)]);
    let repo = SubscriptionRepository::new(&store, &UuidIdGenerator);

    let ids = repo
        .list()
        .into_iter()
        .map(|sub| sub.id)
        .collect::<Vec<_>>();
    assert_eq!(ids, vec!["S1", "S4"]);
    assert_eq!(store.write_count(), 1);

    let healed: Vec<Subscription> =
        serde_json::from_str(&store.raw(SUBSCRIPTIONS_KEY).unwrap()).unwrap();
    assert_eq!(healed.len(), 2);

    repo.list();
    assert_eq!(store.write_count(), 1);
}

#[test]
fn normalize_reports_dropped_count() {
    let raw = json!([
        {"id": "L1", "name": "Keep"},
        {"id": "L2"},
        {"id": "L3", "name": 7}
    ])
    .to_string();
    let normalized = normalize_collection::<List>(Some(raw.as_str()));
    assert_eq!(normalized.items, vec![List::new("L1", "Keep")]);
    assert_eq!(normalized.dropped, 2);
}

#[test]
fn unreadable_or_non_array_values_load_empty_without_rewrite() {
    for raw in ["not json at all", "{\"id\":\"L1\"}", "null", "\"lists\""] {
        let store = MemoryStore::with_entries([(LISTS_KEY, raw)]);
        let repo = ListRepository::new(&store, &UuidIdGenerator);
        assert!(repo.list().is_empty(), "raw value {raw} should load empty");
        assert_eq!(store.write_count(), 0);
    }
}

#[test]
fn create_on_corrupt_collection_keeps_valid_items() {
    let store = MemoryStore::with_entries([(
        LISTS_KEY,
        r#"[{"id":"L1","name":"Keep"},{"id":"L2","name":""}]"#,
    )]);
    let repo = ListRepository::new(&store, &UuidIdGenerator);

    let created = repo.create("New").unwrap();
    let names = repo
        .list()
        .into_iter()
        .map(|list| list.name)
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["Keep", "New"]);
    assert_ne!(created.id, "L2");
}

/// Reads fail; writes succeed.
#[derive(Default)]
struct BrokenReads {
    inner: MemoryStore,
}

impl KeyValueStore for BrokenReads {
    fn get(&self, _key: &str) -> StoreResult<Option<String>> {
        Err(StoreError::Unavailable("disk detached".to_string()))
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.inner.set(key, value)
    }

    fn delete(&self, key: &str) -> StoreResult<()> {
        self.inner.delete(key)
    }
}

/// Reads serve seeded data; writes fail.
struct BrokenWrites {
    inner: MemoryStore,
}

impl KeyValueStore for BrokenWrites {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        self.inner.get(key)
    }

    fn set(&self, _key: &str, _value: &str) -> StoreResult<()> {
        Err(StoreError::Unavailable("read-only".to_string()))
    }

    fn delete(&self, _key: &str) -> StoreResult<()> {
        Err(StoreError::Unavailable("read-only".to_string()))
    }
}

#[test]
fn read_failures_load_as_empty() {
    let store = BrokenReads::default();
    let repo = ListRepository::new(&store, &UuidIdGenerator);
    assert!(repo.list().is_empty());
}

#[test]
fn failed_heal_still_returns_cleaned_collection_and_writes_surface_errors() {
    let store = BrokenWrites {
        inner: MemoryStore::with_entries([(
            LISTS_KEY,
            r#"[{"id":"L1","name":"Keep"},{"id":"","name":"Drop"}]"#,
        )]),
    };
    let repo = ListRepository::new(&store, &UuidIdGenerator);

    assert_eq!(repo.list(), vec![List::new("L1", "Keep")]);
    assert!(matches!(
        repo.create("New"),
        Err(subtrack_core::RepoError::Storage(_))
    ));
}

/// Reads of one key fail a fixed number of times, then recover.
struct FlakyReads {
    inner: MemoryStore,
    key: &'static str,
    failures_left: AtomicUsize,
}

impl FlakyReads {
    fn new(inner: MemoryStore, key: &'static str, failures: usize) -> Self {
        Self {
            inner,
            key,
            failures_left: AtomicUsize::new(failures),
        }
    }
}

impl KeyValueStore for FlakyReads {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        if key == self.key
            && self
                .failures_left
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
                .is_ok()
        {
            return Err(StoreError::Unavailable("transient read failure".to_string()));
        }
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.inner.set(key, value)
    }

    fn delete(&self, key: &str) -> StoreResult<()> {
        self.inner.delete(key)
    }
}

#[test]
fn failed_read_aborts_create_without_clobbering_the_collection() {
    let seeded = r#"[{"id":"L1","name":"One"},{"id":"L2","name":"Two"}]"#;
    let store = FlakyReads::new(
        MemoryStore::with_entries([(LISTS_KEY, seeded)]),
        LISTS_KEY,
        1,
    );
    let repo = ListRepository::new(&store, &UuidIdGenerator);

    assert!(matches!(
        repo.create("C"),
        Err(subtrack_core::RepoError::Storage(_))
    ));
    assert_eq!(store.inner.raw(LISTS_KEY).as_deref(), Some(seeded));

    repo.create("C").unwrap();
    let names = repo
        .list()
        .into_iter()
        .map(|list| list.name)
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["One", "Two", "C"]);
}

#[test]
fn failed_subscription_read_aborts_list_removal() {
    let mut member = valid_subscription("S1");
    member["listId"] = json!("L1");
    let subscriptions = json!([member]).to_string();
    let lists = r#"[{"id":"L1","name":"Streaming"}]"#;
    let store = FlakyReads::new(
        MemoryStore::with_entries([
            (LISTS_KEY, lists.to_string()),
            (SUBSCRIPTIONS_KEY, subscriptions.clone()),
        ]),
        SUBSCRIPTIONS_KEY,
        1,
    );
    let repo = ListRepository::new(&store, &UuidIdGenerator);

    assert!(matches!(
        repo.remove("L1"),
        Err(subtrack_core::RepoError::Storage(_))
    ));
    assert_eq!(store.inner.raw(LISTS_KEY).as_deref(), Some(lists));
    assert_eq!(store.inner.raw(SUBSCRIPTIONS_KEY), Some(subscriptions));

    assert!(repo.remove("L1").unwrap().is_some());
    let detached = SubscriptionRepository::new(&store, &UuidIdGenerator).list();
    assert_eq!(detached[0].list_id, None);
}

#[test]
fn failed_read_aborts_subscription_update_and_remove() {
    let raw = json!([valid_subscription("S1")]).to_string();
    let store = FlakyReads::new(
        MemoryStore::with_entries([(SUBSCRIPTIONS_KEY, raw.clone())]),
        SUBSCRIPTIONS_KEY,
        2,
    );
    let repo = SubscriptionRepository::new(&store, &UuidIdGenerator);
    let record: Subscription = serde_json::from_value(valid_subscription("S1")).unwrap();

    assert!(repo.update(record).is_err());
    assert!(repo.remove("S1").is_err());
    assert_eq!(store.inner.raw(SUBSCRIPTIONS_KEY), Some(raw));
    assert_eq!(store.inner.write_count(), 0);
}
