//! Single-value preferences stored next to the collections.
//!
//! # Responsibility
//! - Persist the preferred currency, the user display name and the
//!   onboarding flag, each under its own key.
//!
//! # Invariants
//! - Writes validate before storing; reads treat unreadable or invalid
//!   values as absent instead of failing.

use crate::repo::RepoResult;
use crate::store::KeyValueStore;
use log::{error, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;

pub mod currency;
pub mod profile;

/// Reads one JSON value, mapping every failure to `None`.
fn read_value<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    let raw = match store.get(key) {
        Ok(raw) => raw?,
        Err(err) => {
            error!("event=pref_read module=prefs status=error key={key} error={err}");
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!("event=pref_read module=prefs status=unreadable key={key} error={err}");
            None
        }
    }
}

fn write_value<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> RepoResult<()> {
    let text = serde_json::to_string(value)?;
    store.set(key, &text)?;
    Ok(())
}
