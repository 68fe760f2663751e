//! Durable image cache for generated storefront imagery.
//!
//! [`ImageCache`] owns an in-memory mapping of entry id to cached value and
//! mirrors it into a [`CacheStore`] slot on every [`flush`](ImageCache::flush).
//! Loading never fails: a missing, unreadable or corrupt slot starts empty.

pub mod error;
pub mod image_cache;
pub mod store;

pub use error::CacheError;
pub use image_cache::{CacheLayout, CacheValue, CategoryImageCache, ImageCache, ProductImageCache};
pub use store::{CacheStore, FileStore, MemoryStore};
