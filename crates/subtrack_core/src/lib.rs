//! On-device persistence core for subscription tracking.
//! This crate is the single source of truth for stored-data invariants.

pub mod db;
pub mod ids;
pub mod input;
pub mod logging;
pub mod model;
pub mod prefs;
pub mod repo;
pub mod store;

pub use ids::{IdGenerator, UuidIdGenerator};
pub use logging::{default_log_level, init_logging, logging_status, LogLevel};
pub use model::currency::{currency_symbol, Currency};
pub use model::list::List;
pub use model::subscription::{Frequency, NewSubscription, Subscription};
pub use model::validation::{parse_record, Validate, ValidationError};
pub use prefs::currency::CurrencyPreference;
pub use prefs::profile::{ListenerId, OnboardingListeners, ProfileStore};
pub use repo::collection::{normalize_collection, Normalized, Record};
pub use repo::list_repo::ListRepository;
pub use repo::subscription_repo::SubscriptionRepository;
pub use repo::{RepoError, RepoResult};
pub use store::{KeyValueStore, MemoryStore, SqliteStore, StoreError, StoreResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
