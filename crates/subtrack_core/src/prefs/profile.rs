//! User display name and onboarding state.
//!
//! # Invariants
//! - The stored name is trimmed, non-blank and bounded like every other name.
//! - Onboarding counts as complete only when the stored value is JSON `true`.
//! - Listeners are notified after the flag has been written, outside any lock.

use super::{read_value, write_value};
use crate::model::validation::{check_name, normalize_name};
use crate::repo::RepoResult;
use crate::store::{KeyValueStore, ONBOARDING_COMPLETE_KEY, USER_NAME_KEY};
use log::{info, warn};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Handle returned by `OnboardingListeners::subscribe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Arc<dyn Fn(bool) + Send + Sync>;

/// Callbacks interested in onboarding completion.
#[derive(Default)]
pub struct OnboardingListeners {
    next_id: AtomicU64,
    listeners: Mutex<Vec<(ListenerId, Listener)>>,
}

impl OnboardingListeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, listener: impl Fn(bool) + Send + Sync + 'static) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, Arc::new(listener)));
        id
    }

    /// Returns whether a listener with `id` was registered.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.lock().unwrap_or_else(PoisonError::into_inner);
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    fn notify(&self, complete: bool) {
        let snapshot = self
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect::<Vec<_>>();
        for listener in snapshot {
            listener(complete);
        }
    }
}

/// Reads and writes the user profile keys.
pub struct ProfileStore<'s> {
    store: &'s dyn KeyValueStore,
    listeners: Option<&'s OnboardingListeners>,
}

impl<'s> ProfileStore<'s> {
    pub fn new(store: &'s dyn KeyValueStore) -> Self {
        Self {
            store,
            listeners: None,
        }
    }

    /// Attaches listeners notified by `set_onboarding_complete`.
    pub fn with_listeners(mut self, listeners: &'s OnboardingListeners) -> Self {
        self.listeners = Some(listeners);
        self
    }

    /// Stored display name, or `None` when unset or invalid.
    pub fn user_name(&self) -> Option<String> {
        let name = read_value::<String>(self.store, USER_NAME_KEY)?;
        match check_name("userName", &name) {
            Ok(()) => Some(name.trim().to_string()),
            Err(err) => {
                warn!("event=user_name_get module=prefs status=invalid error={err}");
                None
            }
        }
    }

    /// Validates, trims and stores the display name.
    pub fn set_user_name(&self, name: &str) -> RepoResult<String> {
        let name = normalize_name("userName", name)?;
        write_value(self.store, USER_NAME_KEY, name.as_str())?;
        info!("event=user_name_set module=prefs status=ok");
        Ok(name)
    }

    pub fn is_onboarding_complete(&self) -> bool {
        read_value::<bool>(self.store, ONBOARDING_COMPLETE_KEY) == Some(true)
    }

    /// Marks onboarding as complete and notifies attached listeners.
    pub fn set_onboarding_complete(&self) -> RepoResult<()> {
        write_value(self.store, ONBOARDING_COMPLETE_KEY, &true)?;
        info!("event=onboarding_complete module=prefs status=ok");
        if let Some(listeners) = self.listeners {
            listeners.notify(true);
        }
        Ok(())
    }
}
