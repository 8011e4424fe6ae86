//! Process-wide per-key write serialization.
//!
//! Repositories hold a key's guard for the whole read-normalize-mutate-write
//! cycle so two interleaved cycles on the same collection cannot lose an
//! update. Guards are not reentrant: a thread must not lock a key it already
//! holds.

use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::sync::{Condvar, Mutex, PoisonError};

struct KeyLocks {
    held: Mutex<HashSet<String>>,
    released: Condvar,
}

static KEY_LOCKS: Lazy<KeyLocks> = Lazy::new(|| KeyLocks {
    held: Mutex::new(HashSet::new()),
    released: Condvar::new(),
});

/// Exclusive hold on one storage key; released on drop.
#[must_use = "the key is unlocked as soon as the guard is dropped"]
#[derive(Debug)]
pub struct KeyLockGuard {
    key: String,
}

/// Blocks until no other guard holds `key`, then takes it.
pub fn lock_key(key: &str) -> KeyLockGuard {
    let mut held = KEY_LOCKS
        .held
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    while held.contains(key) {
        held = KEY_LOCKS
            .released
            .wait(held)
            .unwrap_or_else(PoisonError::into_inner);
    }
    held.insert(key.to_string());
    KeyLockGuard {
        key: key.to_string(),
    }
}

impl Drop for KeyLockGuard {
    fn drop(&mut self) {
        let mut held = KEY_LOCKS
            .held
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        held.remove(&self.key);
        KEY_LOCKS.released.notify_all();
    }
}
