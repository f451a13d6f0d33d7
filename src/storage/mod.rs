// Persistent key-value storage module.
// String-keyed, string-valued storage shared by the cache, favorites, and preferences.

pub mod kv;
pub mod paths;

pub use kv::{FileStore, KeyValueStore, MemoryStore, SharedStore};
