//! Owned image cache with a load / merge / flush contract.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use tokio::sync::RwLock;

use lumina_core::images::ProductImages;
use lumina_core::policy::{CATEGORY_CACHE_KEY, PRODUCT_CACHE_ENVELOPE, PRODUCT_CACHE_KEY};
use lumina_core::types::{EntryId, ImagePayload};

use crate::error::CacheError;
use crate::store::CacheStore;

// ---------------------------------------------------------------------------
// Cache values
// ---------------------------------------------------------------------------

/// A value that can live in an [`ImageCache`].
pub trait CacheValue: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Fold `update` into `self`.
    fn merge(&mut self, update: Self);

    /// Values with nothing filled are dropped on load.
    fn is_blank(&self) -> bool;
}

/// Category images: a newer payload replaces the old one.
impl CacheValue for ImagePayload {
    fn merge(&mut self, update: Self) {
        if !update.is_empty() {
            *self = update;
        }
    }

    fn is_blank(&self) -> bool {
        self.is_empty()
    }
}

/// Product images merge slot by slot.
impl CacheValue for ProductImages {
    fn merge(&mut self, update: Self) {
        self.overlay(update);
    }

    fn is_blank(&self) -> bool {
        self.main.is_none() && self.texture.is_none()
    }
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

/// Shape of the persisted document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheLayout {
    /// The document is the `{id: value}` mapping itself.
    Flat,
    /// The mapping sits under one field of a larger object; the other
    /// top-level fields are carried through untouched.
    Nested(&'static str),
}

pub type CategoryImageCache = ImageCache<ImagePayload>;
pub type ProductImageCache = ImageCache<ProductImages>;

// ---------------------------------------------------------------------------
// ImageCache
// ---------------------------------------------------------------------------

/// In-memory `{id: value}` mapping mirrored into one store slot.
///
/// Slots only ever go from absent to present, so readers may look at the
/// cache while a backfill is writing to it.
pub struct ImageCache<V> {
    store: Arc<dyn CacheStore>,
    key: String,
    layout: CacheLayout,
    inner: RwLock<Document<V>>,
}

struct Document<V> {
    entries: BTreeMap<EntryId, V>,
    /// Sibling fields of a nested document.
    siblings: Map<String, Value>,
}

impl ImageCache<ImagePayload> {
    /// Load the category cache from its well-known slot.
    pub async fn open_categories(store: Arc<dyn CacheStore>) -> Self {
        Self::load(store, CATEGORY_CACHE_KEY, CacheLayout::Flat).await
    }
}

impl ImageCache<ProductImages> {
    /// Load the product cache from its well-known slot.
    pub async fn open_products(store: Arc<dyn CacheStore>) -> Self {
        Self::load(
            store,
            PRODUCT_CACHE_KEY,
            CacheLayout::Nested(PRODUCT_CACHE_ENVELOPE),
        )
        .await
    }
}

impl<V: CacheValue> ImageCache<V> {
    /// Read `key` from `store`. Missing, unreadable or corrupt documents
    /// start an empty cache; entries that fail to decode are dropped.
    pub async fn load(store: Arc<dyn CacheStore>, key: impl Into<String>, layout: CacheLayout) -> Self {
        let key = key.into();

        let raw = match store.read(&key).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Cache unreadable, starting empty");
                None
            }
        };

        let document = raw
            .map(|raw| decode(&key, layout, &raw))
            .unwrap_or_else(Document::empty);

        tracing::debug!(key = %key, entries = document.entries.len(), "Cache loaded");

        Self {
            store,
            key,
            layout,
            inner: RwLock::new(document),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub async fn get(&self, id: &str) -> Option<V> {
        self.inner.read().await.entries.get(id).cloned()
    }

    pub async fn contains(&self, id: &str) -> bool {
        self.inner.read().await.entries.contains_key(id)
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Copy of the whole mapping.
    pub async fn snapshot(&self) -> BTreeMap<EntryId, V> {
        self.inner.read().await.entries.clone()
    }

    /// Fold `update` into the entry for `id` (in memory only).
    pub async fn merge(&self, id: &str, update: V) {
        let mut doc = self.inner.write().await;
        match doc.entries.get_mut(id) {
            Some(existing) => existing.merge(update),
            None => {
                doc.entries.insert(id.to_string(), update);
            }
        }
    }

    /// Persist the current mapping, replacing the stored document.
    pub async fn flush(&self) -> Result<(), CacheError> {
        let encoded = {
            let doc = self.inner.read().await;
            encode(&self.key, self.layout, &doc)?
        };
        self.store.write(&self.key, &encoded).await
    }

    /// [`merge`](Self::merge) then [`flush`](Self::flush).
    pub async fn merge_and_flush(&self, id: &str, update: V) -> Result<(), CacheError> {
        self.merge(id, update).await;
        self.flush().await
    }
}

impl<V> Document<V> {
    fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
            siblings: Map::new(),
        }
    }
}

fn decode<V: CacheValue>(key: &str, layout: CacheLayout, raw: &str) -> Document<V> {
    let mut root = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(root)) => root,
        Ok(_) => {
            tracing::warn!(key, "Cache document is not an object, starting empty");
            return Document::empty();
        }
        Err(e) => {
            tracing::warn!(key, error = %e, "Cache document is corrupt, starting empty");
            return Document::empty();
        }
    };

    let (mapping, siblings) = match layout {
        CacheLayout::Flat => (root, Map::new()),
        CacheLayout::Nested(field) => match root.remove(field) {
            Some(Value::Object(mapping)) => (mapping, root),
            Some(_) => {
                tracing::warn!(key, field, "Cache envelope field is not an object, ignoring it");
                (Map::new(), root)
            }
            None => (Map::new(), root),
        },
    };

    let mut entries = BTreeMap::new();
    for (id, value) in mapping {
        match serde_json::from_value::<V>(value) {
            Ok(v) if !v.is_blank() => {
                entries.insert(id, v);
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(key, entry_id = %id, error = %e, "Dropping undecodable cache entry");
            }
        }
    }

    Document { entries, siblings }
}

fn encode<V: CacheValue>(key: &str, layout: CacheLayout, doc: &Document<V>) -> Result<String, CacheError> {
    let serialize_err = |source| CacheError::Serialize {
        key: key.to_string(),
        source,
    };

    let mapping = serde_json::to_value(&doc.entries).map_err(serialize_err)?;
    let document = match layout {
        CacheLayout::Flat => mapping,
        CacheLayout::Nested(field) => {
            let mut root = doc.siblings.clone();
            root.insert(field.to_string(), mapping);
            Value::Object(root)
        }
    };

    serde_json::to_string(&document).map_err(serialize_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use lumina_core::images::ProductSlot;

    fn store_with(key: &str, raw: &str) -> Arc<MemoryStore> {
        Arc::new(MemoryStore::new().with_entry(key, raw))
    }

    #[tokio::test]
    async fn missing_slot_loads_empty() {
        let cache = CategoryImageCache::open_categories(Arc::new(MemoryStore::new())).await;
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn corrupt_documents_load_empty() {
        for raw in ["not json", "[1,2]", "\"str\"", "{\"products\": 7}"] {
            let store = store_with(PRODUCT_CACHE_KEY, raw);
            let cache = ProductImageCache::open_products(store).await;
            assert!(cache.is_empty().await, "expected empty cache for {raw:?}");
        }
    }

    #[tokio::test]
    async fn undecodable_entries_are_dropped() {
        let store = store_with(CATEGORY_CACHE_KEY, r#"{"Serums":"data:a","Hydration":42,"Treatment":""}"#);
        let cache = CategoryImageCache::open_categories(store).await;
        assert_eq!(cache.len().await, 1);
        assert_eq!(cache.get("Serums").await.as_deref(), Some("data:a"));
    }

    #[tokio::test]
    async fn nested_layout_round_trips_and_keeps_siblings() {
        let store = store_with(
            PRODUCT_CACHE_KEY,
            r#"{"products":{"vit-c":{"main":"data:m","texture":""}},"ingredients":{"x":"y"}}"#,
        );
        let cache = ProductImageCache::open_products(store.clone()).await;

        let entry = cache.get("vit-c").await.unwrap();
        assert_eq!(entry.main.as_deref(), Some("data:m"));
        assert!(entry.texture.is_none());

        cache
            .merge_and_flush("vit-c", ProductImages::with_slot(ProductSlot::Texture, "data:t".into()))
            .await
            .unwrap();

        let raw: Value = serde_json::from_str(&store.get(PRODUCT_CACHE_KEY).unwrap()).unwrap();
        assert_eq!(raw["ingredients"]["x"], "y");
        assert_eq!(raw["products"]["vit-c"]["main"], "data:m");
        assert_eq!(raw["products"]["vit-c"]["texture"], "data:t");
    }

    #[tokio::test]
    async fn merge_does_not_clobber_other_slot() {
        let store = Arc::new(MemoryStore::new());
        let cache = ProductImageCache::open_products(store).await;

        cache
            .merge("p", ProductImages::with_slot(ProductSlot::Main, "m1".into()))
            .await;
        cache
            .merge("p", ProductImages::with_slot(ProductSlot::Texture, "t1".into()))
            .await;

        let entry = cache.get("p").await.unwrap();
        assert_eq!(entry.main.as_deref(), Some("m1"));
        assert_eq!(entry.texture.as_deref(), Some("t1"));
    }

    #[tokio::test]
    async fn flushed_cache_reloads_identically() {
        let store: Arc<MemoryStore> = Arc::new(MemoryStore::new());
        let cache = CategoryImageCache::open_categories(store.clone()).await;
        cache.merge_and_flush("Serums", "data:s".to_string()).await.unwrap();

        let raw = store.get(CATEGORY_CACHE_KEY).unwrap();
        assert_eq!(raw, r#"{"Serums":"data:s"}"#);

        let reloaded = CategoryImageCache::open_categories(store).await;
        assert_eq!(reloaded.snapshot().await, cache.snapshot().await);
    }
}
