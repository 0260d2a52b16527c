//! Item storage implementations.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use todoapi_core::{DomainError, DomainResult, Entity};

use crate::item::{Item, ItemId};

/// Keyed item store abstraction.
///
/// The store is the only owner of item records and never holds two records
/// with the same id.
pub trait ItemStore: Send + Sync {
    /// Every stored item, in no particular order.
    fn get_all(&self) -> DomainResult<Vec<Item>>;

    /// The item with `id`, or `None` when absent.
    fn get_by_id(&self, id: ItemId) -> DomainResult<Option<Item>>;

    /// Insert a new item. Fails with `Conflict` when the id is already present.
    fn add(&self, item: Item) -> DomainResult<()>;

    /// Replace the record at `item.id()`, inserting it when absent.
    fn update(&self, item: Item) -> DomainResult<()>;

    /// Remove the record at `id`. Removing an absent id is a no-op.
    fn delete(&self, id: ItemId) -> DomainResult<()>;

    /// Replace the record at `item.id()` only if it is present.
    ///
    /// The presence check and the write happen atomically. Fails with
    /// `NotFound` and leaves the store unchanged when the id is absent.
    fn replace_existing(&self, item: Item) -> DomainResult<()>;

    /// Remove the record at `id` only if it is present, atomically.
    /// Fails with `NotFound` when the id is absent.
    fn remove_existing(&self, id: ItemId) -> DomainResult<Item>;
}

impl<S> ItemStore for Arc<S>
where
    S: ItemStore + ?Sized,
{
    fn get_all(&self) -> DomainResult<Vec<Item>> {
        (**self).get_all()
    }

    fn get_by_id(&self, id: ItemId) -> DomainResult<Option<Item>> {
        (**self).get_by_id(id)
    }

    fn add(&self, item: Item) -> DomainResult<()> {
        (**self).add(item)
    }

    fn update(&self, item: Item) -> DomainResult<()> {
        (**self).update(item)
    }

    fn delete(&self, id: ItemId) -> DomainResult<()> {
        (**self).delete(id)
    }

    fn replace_existing(&self, item: Item) -> DomainResult<()> {
        (**self).replace_existing(item)
    }

    fn remove_existing(&self, id: ItemId) -> DomainResult<Item> {
        (**self).remove_existing(id)
    }
}

/// The three items every fresh process starts with.
pub fn seed_items() -> Vec<Item> {
    vec![
        Item::new(1, "Item 1", false),
        Item::new(2, "Item 2", true),
        Item::new(3, "Item 3", false),
    ]
}

/// In-memory item store guarded by a single `RwLock`.
#[derive(Debug, Default)]
pub struct InMemoryItemStore {
    items: RwLock<HashMap<ItemId, Item>>,
}

impl InMemoryItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with [`seed_items`].
    pub fn seeded() -> Self {
        Self::with_items(seed_items())
    }

    /// Store pre-populated with `items`. Later duplicates replace earlier ones.
    pub fn with_items(items: impl IntoIterator<Item = Item>) -> Self {
        let items = items.into_iter().map(|item| (item.id(), item)).collect();
        Self {
            items: RwLock::new(items),
        }
    }

    fn read(&self) -> DomainResult<RwLockReadGuard<'_, HashMap<ItemId, Item>>> {
        self.items
            .read()
            .map_err(|_| DomainError::storage("item store lock poisoned"))
    }

    fn write(&self) -> DomainResult<RwLockWriteGuard<'_, HashMap<ItemId, Item>>> {
        self.items
            .write()
            .map_err(|_| DomainError::storage("item store lock poisoned"))
    }
}

impl ItemStore for InMemoryItemStore {
    fn get_all(&self) -> DomainResult<Vec<Item>> {
        Ok(self.read()?.values().cloned().collect())
    }

    fn get_by_id(&self, id: ItemId) -> DomainResult<Option<Item>> {
        Ok(self.read()?.get(&id).cloned())
    }

    fn add(&self, item: Item) -> DomainResult<()> {
        let mut items = self.write()?;
        let id = item.id();
        if items.contains_key(&id) {
            return Err(DomainError::conflict(format!("item {id} already exists")));
        }
        items.insert(id, item);
        tracing::debug!(item_id = id, "item added");
        Ok(())
    }

    fn update(&self, item: Item) -> DomainResult<()> {
        let id = item.id();
        self.write()?.insert(id, item);
        tracing::debug!(item_id = id, "item replaced");
        Ok(())
    }

    fn delete(&self, id: ItemId) -> DomainResult<()> {
        if self.write()?.remove(&id).is_some() {
            tracing::debug!(item_id = id, "item deleted");
        }
        Ok(())
    }

    fn replace_existing(&self, item: Item) -> DomainResult<()> {
        let mut items = self.write()?;
        let id = item.id();
        match items.get_mut(&id) {
            Some(slot) => {
                *slot = item;
                tracing::debug!(item_id = id, "item replaced");
                Ok(())
            }
            None => Err(DomainError::not_found(format!("item {id}"))),
        }
    }

    fn remove_existing(&self, id: ItemId) -> DomainResult<Item> {
        let removed = self
            .write()?
            .remove(&id)
            .ok_or_else(|| DomainError::not_found(format!("item {id}")))?;
        tracing::debug!(item_id = id, "item deleted");
        Ok(removed)
    }
}
