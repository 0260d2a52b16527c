//! Todo item domain module.
//!
//! This crate contains the item record types and the keyed in-memory item
//! store (no HTTP, no persistence).

pub mod item;
pub mod store;

pub use item::{Item, ItemId, Todo};
pub use store::{InMemoryItemStore, ItemStore, seed_items};
