//! In-memory storage backend.
//!
//! All data is held in RAM. Pair it with [`load_from_jsonl`] and
//! [`save_to_jsonl`] (or use the JSONL backend from
//! [`create_storage`](crate::storage::create_storage)) for persistence.
//!
//! # Architecture
//!
//! - one insertion-ordered table per entity kind
//! - a petgraph `StableDiGraph` mirroring issue parent links (parent -> child)
//!   for subtask cascades and loop detection
//! - deletes are planned against an immutable view and then applied, so a
//!   failed delete changes nothing
//!
//! # Thread Safety
//!
//! The store is wrapped in `Arc<Mutex<InMemoryStorageInner>>`. Every trait
//! method takes the lock exactly once, so mutations are serialized and issue
//! numbers are computed and inserted under the same lock.

mod cascade;
mod cycles;
mod hierarchy;
mod inner;
mod integrity;
mod issues;
mod jsonl;
mod numbering;
mod projects;
mod table;
mod tracking;
mod trait_impl;

use crate::storage::{StorageOptions, TrackerStorage};
use inner::InMemoryStorageInner;
use std::sync::Arc;
use tokio::sync::Mutex;

pub use jsonl::{LoadWarning, load_from_jsonl, save_to_jsonl};

/// Thread-safe in-memory storage.
pub(crate) type InMemoryStorage = Arc<Mutex<InMemoryStorageInner>>;

/// Create an empty in-memory store.
///
/// # Example
///
/// ```
/// use flowdeck::storage::StorageOptions;
/// use flowdeck::storage::in_memory::new_in_memory_storage;
///
/// let storage = new_in_memory_storage(StorageOptions::default());
/// # drop(storage);
/// ```
#[must_use]
pub fn new_in_memory_storage(options: StorageOptions) -> Box<dyn TrackerStorage> {
    Box::new(Arc::new(Mutex::new(InMemoryStorageInner::new(options))))
}
