//! List repository over the `lists` collection.
//!
//! # Responsibility
//! - Create, rename, remove and enumerate user-defined lists.
//! - Cascade list removal onto subscriptions that reference it.
//!
//! # Invariants
//! - Renaming keeps the list at its position in the collection.
//! - On removal the subscription cascade is written before the list
//!   collection, so an interrupted removal leaves an unreferenced list
//!   rather than dangling `listId` values.

use super::collection::Collection;
use super::subscription_repo::SubscriptionRepository;
use super::RepoResult;
use crate::ids::IdGenerator;
use crate::model::list::List;
use crate::model::validation::{check_id, normalize_name};
use crate::store::{lock_key, KeyValueStore, LISTS_KEY};
use log::info;

/// Repository for `List` records.
pub struct ListRepository<'s> {
    store: &'s dyn KeyValueStore,
    ids: &'s dyn IdGenerator,
}

impl<'s> ListRepository<'s> {
    pub fn new(store: &'s dyn KeyValueStore, ids: &'s dyn IdGenerator) -> Self {
        Self { store, ids }
    }

    fn collection(&self) -> Collection<'s, List> {
        Collection::new(self.store, LISTS_KEY)
    }

    /// Returns all lists in stored order, healing storage when needed.
    pub fn list(&self) -> Vec<List> {
        let _guard = lock_key(LISTS_KEY);
        self.collection().load()
    }

    /// Returns one list by id.
    pub fn get(&self, id: &str) -> Option<List> {
        self.list().into_iter().find(|list| list.id == id)
    }

    /// Creates a list with a fresh id and appends it.
    ///
    /// # Errors
    /// - `RepoError::Validation` when `name` is blank or too long.
    /// - `RepoError::Storage` when the rewrite fails.
    pub fn create(&self, name: &str) -> RepoResult<List> {
        let name = normalize_name("name", name)?;
        let list = List::new(self.ids.generate(), name);
        check_id("id", &list.id)?;

        let _guard = lock_key(LISTS_KEY);
        let collection = self.collection();
        let mut lists = collection.load_for_write()?;
        lists.push(list.clone());
        collection.save(&lists)?;

        info!("event=list_create module=repo status=ok list_id={}", list.id);
        Ok(list)
    }

    /// Renames a list in place.
    ///
    /// Returns `Ok(None)` without writing when no list has `id`.
    pub fn update(&self, id: &str, name: &str) -> RepoResult<Option<List>> {
        check_id("id", id)?;
        let name = normalize_name("name", name)?;

        let _guard = lock_key(LISTS_KEY);
        let collection = self.collection();
        let mut lists = collection.load_for_write()?;
        let Some(target) = lists.iter_mut().find(|list| list.id == id) else {
            info!("event=list_update module=repo status=not_found list_id={id}");
            return Ok(None);
        };
        target.name = name;
        let updated = target.clone();
        collection.save(&lists)?;

        info!("event=list_update module=repo status=ok list_id={id}");
        Ok(Some(updated))
    }

    /// Removes a list and unassigns every subscription that referenced it.
    ///
    /// Returns the removed list, or `Ok(None)` without writing when absent.
    pub fn remove(&self, id: &str) -> RepoResult<Option<List>> {
        let _guard = lock_key(LISTS_KEY);
        let collection = self.collection();
        let mut lists = collection.load_for_write()?;
        let Some(index) = lists.iter().position(|list| list.id == id) else {
            info!("event=list_remove module=repo status=not_found list_id={id}");
            return Ok(None);
        };

        let detached = SubscriptionRepository::new(self.store, self.ids).detach_list(id)?;
        let removed = lists.remove(index);
        collection.save(&lists)?;

        info!("event=list_remove module=repo status=ok list_id={id} detached={detached}");
        Ok(Some(removed))
    }
}
