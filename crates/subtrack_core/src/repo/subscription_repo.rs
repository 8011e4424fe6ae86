//! Subscription repository over the `subscriptions` collection.
//!
//! # Responsibility
//! - Create, replace, remove, reorder and enumerate subscriptions.
//! - Unassign subscriptions from a list being removed.
//!
//! # Invariants
//! - Replacement keeps the record at its position in the collection.
//! - `save_all` persists exactly the given order (last writer wins).
//! - `list_id` is stored as given; existence of the list is not checked.

use super::collection::{ensure_unique_ids, Collection};
use super::RepoResult;
use crate::ids::IdGenerator;
use crate::model::subscription::{NewSubscription, Subscription};
use crate::store::{lock_key, KeyValueStore, SUBSCRIPTIONS_KEY};
use log::info;

/// Repository for `Subscription` records.
pub struct SubscriptionRepository<'s> {
    store: &'s dyn KeyValueStore,
    ids: &'s dyn IdGenerator,
}

impl<'s> SubscriptionRepository<'s> {
    pub fn new(store: &'s dyn KeyValueStore, ids: &'s dyn IdGenerator) -> Self {
        Self { store, ids }
    }

    fn collection(&self) -> Collection<'s, Subscription> {
        Collection::new(self.store, SUBSCRIPTIONS_KEY)
    }

    /// Returns all subscriptions in stored order, healing storage when needed.
    pub fn list(&self) -> Vec<Subscription> {
        let _guard = lock_key(SUBSCRIPTIONS_KEY);
        self.collection().load()
    }

    /// Returns one subscription by id.
    pub fn get(&self, id: &str) -> Option<Subscription> {
        self.list().into_iter().find(|sub| sub.id == id)
    }

    /// Validates `fields`, assigns a fresh id and appends the record.
    ///
    /// # Errors
    /// - `RepoError::Validation` on blank name, negative or non-finite amount,
    ///   blank icon or blank list reference. Nothing is written.
    pub fn create(&self, fields: NewSubscription) -> RepoResult<Subscription> {
        let subscription = fields.into_subscription(self.ids.generate()).normalized()?;

        let _guard = lock_key(SUBSCRIPTIONS_KEY);
        let collection = self.collection();
        let mut subscriptions = collection.load_for_write()?;
        subscriptions.push(subscription.clone());
        collection.save(&subscriptions)?;

        info!(
            "event=subscription_create module=repo status=ok subscription_id={}",
            subscription.id
        );
        Ok(subscription)
    }

    /// Replaces the record with the same id, keeping its position.
    ///
    /// Returns `Ok(None)` without writing when no record has that id.
    pub fn update(&self, subscription: Subscription) -> RepoResult<Option<Subscription>> {
        let subscription = subscription.normalized()?;

        let _guard = lock_key(SUBSCRIPTIONS_KEY);
        let collection = self.collection();
        let mut subscriptions = collection.load_for_write()?;
        let Some(slot) = subscriptions
            .iter_mut()
            .find(|existing| existing.id == subscription.id)
        else {
            info!(
                "event=subscription_update module=repo status=not_found subscription_id={}",
                subscription.id
            );
            return Ok(None);
        };
        *slot = subscription.clone();
        collection.save(&subscriptions)?;

        info!(
            "event=subscription_update module=repo status=ok subscription_id={}",
            subscription.id
        );
        Ok(Some(subscription))
    }

    /// Removes a record and returns it, or `Ok(None)` without writing.
    pub fn remove(&self, id: &str) -> RepoResult<Option<Subscription>> {
        let _guard = lock_key(SUBSCRIPTIONS_KEY);
        let collection = self.collection();
        let mut subscriptions = collection.load_for_write()?;
        let Some(index) = subscriptions.iter().position(|sub| sub.id == id) else {
            info!("event=subscription_remove module=repo status=not_found subscription_id={id}");
            return Ok(None);
        };
        let removed = subscriptions.remove(index);
        collection.save(&subscriptions)?;

        info!("event=subscription_remove module=repo status=ok subscription_id={id}");
        Ok(Some(removed))
    }

    /// Replaces the whole collection with `ordered`, e.g. after drag-to-reorder.
    ///
    /// # Errors
    /// - `RepoError::Validation` when any element is invalid or two elements
    ///   share an id. Nothing is written.
    pub fn save_all(&self, ordered: Vec<Subscription>) -> RepoResult<Vec<Subscription>> {
        let ordered = ordered
            .into_iter()
            .map(Subscription::normalized)
            .collect::<Result<Vec<_>, _>>()?;

        ensure_unique_ids(&ordered)?;

        let _guard = lock_key(SUBSCRIPTIONS_KEY);
        self.collection().save(&ordered)?;

        info!(
            "event=subscription_save_all module=repo status=ok count={}",
            ordered.len()
        );
        Ok(ordered)
    }

    /// Sets `list_id` to `None` on every record referencing `list_id`.
    ///
    /// Returns the number of records changed; writes only when it is non-zero.
    pub fn detach_list(&self, list_id: &str) -> RepoResult<usize> {
        let _guard = lock_key(SUBSCRIPTIONS_KEY);
        let collection = self.collection();
        let mut subscriptions = collection.load_for_write()?;

        let mut detached = 0;
        for sub in subscriptions
            .iter_mut()
            .filter(|sub| sub.list_id.as_deref() == Some(list_id))
        {
            sub.list_id = None;
            detached += 1;
        }

        if detached > 0 {
            collection.save(&subscriptions)?;
        }
        Ok(detached)
    }
}
