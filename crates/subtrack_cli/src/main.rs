//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `subtrack_core` linkage.
//! - Optionally summarize a store file: `subtrack [db_path]`.
//! - Keep output deterministic for quick local sanity checks.

use std::process::ExitCode;
use subtrack_core::{
    CurrencyPreference, ListRepository, ProfileStore, SqliteStore, SubscriptionRepository,
    UuidIdGenerator,
};

fn main() -> ExitCode {
    println!("subtrack_core ping={}", subtrack_core::ping());
    println!("subtrack_core version={}", subtrack_core::core_version());

    let Some(db_path) = std::env::args().nth(1) else {
        return ExitCode::SUCCESS;
    };

    let store = match SqliteStore::open(&db_path) {
        Ok(store) => store,
        Err(err) => {
            eprintln!("failed to open `{db_path}`: {err}");
            return ExitCode::FAILURE;
        }
    };

    let lists = ListRepository::new(&store, &UuidIdGenerator).list();
    let subscriptions = SubscriptionRepository::new(&store, &UuidIdGenerator).list();
    let unassigned = subscriptions
        .iter()
        .filter(|subscription| subscription.list_id.is_none())
        .count();
    let profile = ProfileStore::new(&store);

    println!("store lists={}", lists.len());
    println!(
        "store subscriptions={} unassigned={}",
        subscriptions.len(),
        unassigned
    );
    println!(
        "store currency={}",
        CurrencyPreference::new(&store).get_or_default()
    );
    println!(
        "store onboarding_complete={}",
        profile.is_onboarding_complete()
    );
    ExitCode::SUCCESS
}
