#![forbid(unsafe_code)]

pub mod accessor;
pub mod keys;
pub mod repository;
pub mod sqlite;

pub use accessor::PersistentStore;
pub use repository::{InMemoryStore, KeyValueStore, Storage, StorageError};
