use std::sync::{Arc, Mutex};
use subtrack_core::store::{DEFAULT_CURRENCY_KEY, ONBOARDING_COMPLETE_KEY, USER_NAME_KEY};
use subtrack_core::{
    Currency, CurrencyPreference, MemoryStore, OnboardingListeners, ProfileStore, SqliteStore,
};

#[test]
fn corrupt_preference_values_read_as_absent() {
    let store = MemoryStore::with_entries([
        (DEFAULT_CURRENCY_KEY, "EUR"),
        (USER_NAME_KEY, "{\"name\":\"Ada\"}"),
        (ONBOARDING_COMPLETE_KEY, "1"),
    ]);

    assert_eq!(CurrencyPreference::new(&store).get(), None);
    assert_eq!(
        CurrencyPreference::new(&store).get_or_default(),
        Currency::Usd
    );
    let profile = ProfileStore::new(&store);
    assert_eq!(profile.user_name(), None);
    assert!(!profile.is_onboarding_complete());
    assert_eq!(store.write_count(), 0);
}

#[test]
fn onboarding_flow_persists_in_sqlite() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prefs.sqlite3");
    let events = Arc::new(Mutex::new(Vec::new()));

    {
        let store = SqliteStore::open(&path).unwrap();
        let listeners = OnboardingListeners::new();
        let sink = Arc::clone(&events);
        listeners.subscribe(move |complete| sink.lock().unwrap().push(complete));

        let profile = ProfileStore::new(&store).with_listeners(&listeners);
        profile.set_user_name("Grace Hopper").unwrap();
        CurrencyPreference::new(&store).set_code("EUR").unwrap();
        profile.set_onboarding_complete().unwrap();
    }

    let store = SqliteStore::open(&path).unwrap();
    let profile = ProfileStore::new(&store);
    assert_eq!(profile.user_name().as_deref(), Some("Grace Hopper"));
    assert!(profile.is_onboarding_complete());
    assert_eq!(CurrencyPreference::new(&store).get(), Some(Currency::Eur));
    assert_eq!(*events.lock().unwrap(), vec![true]);
}
