use std::path::{Path, PathBuf};
use std::sync::Arc;

use todoapi_core::DomainResult;
use todoapi_items::{Item, ItemId, ItemStore};

use crate::config::ApiConfig;

/// Shared per-process services handed to every handler via `Extension`.
///
/// The item store is injected by the caller, so tests and the binary each
/// own their store instance.
#[derive(Clone)]
pub struct AppServices {
    items: Arc<dyn ItemStore>,
    upload_path: PathBuf,
}

impl AppServices {
    pub fn new(config: &ApiConfig, items: Arc<dyn ItemStore>) -> Self {
        Self {
            items,
            upload_path: config.upload_path.clone(),
        }
    }

    pub fn upload_path(&self) -> &Path {
        &self.upload_path
    }

    pub fn items_list(&self) -> DomainResult<Vec<Item>> {
        self.items.get_all()
    }

    pub fn items_get(&self, id: ItemId) -> DomainResult<Option<Item>> {
        self.items.get_by_id(id)
    }

    pub fn items_add(&self, item: Item) -> DomainResult<()> {
        self.items.add(item)
    }

    /// Replace a present item; `NotFound` when absent.
    pub fn items_replace(&self, item: Item) -> DomainResult<()> {
        self.items.replace_existing(item)
    }

    /// Remove a present item; `NotFound` when absent.
    pub fn items_remove(&self, id: ItemId) -> DomainResult<Item> {
        self.items.remove_existing(id)
    }
}
