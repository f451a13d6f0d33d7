// Cache module for weather responses.
// Keys are derived from the query; entries carry a write timestamp for TTL checks.

pub mod key;
pub mod store;

pub use key::CacheKey;
pub use store::{CacheStore, CachedData, DEFAULT_TTL};
