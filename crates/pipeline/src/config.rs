//! Backfill configuration loaded from environment variables.
//!
//! | Env Var                    | Default                                      |
//! |----------------------------|----------------------------------------------|
//! | `GEMINI_API_KEY`           | falls back to `API_KEY`; unset is allowed    |
//! | `GEMINI_BASE_URL`          | `https://generativelanguage.googleapis.com`  |
//! | `GEMINI_MODEL`             | `gemini-2.5-flash-image`                     |
//! | `LUMINA_CACHE_DIR`         | `.lumina-cache`                              |
//! | `BACKFILL_INTERVAL_MS`     | `3000`                                       |
//! | `BACKFILL_MAX_RETRIES`     | `1`                                          |
//! | `BACKFILL_BACKOFF_BASE_MS` | `2000`                                       |

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use lumina_cache::{CacheStore, CategoryImageCache, FileStore, ProductImageCache};
use lumina_core::policy::{
    DEFAULT_BACKOFF_BASE_MS, DEFAULT_GEMINI_BASE_URL, DEFAULT_IMAGE_MODEL, DEFAULT_MAX_RETRIES,
    DEFAULT_RATE_LIMIT_INTERVAL_MS,
};
use lumina_imagegen::{GeminiApi, ImageClient, RetryPolicy};

use crate::backfill::{BackfillPolicy, ImageBackfill};
use crate::error::ConfigError;

/// Default directory for the durable cache documents.
pub const DEFAULT_CACHE_DIR: &str = ".lumina-cache";

/// Everything needed to wire a production backfill.
#[derive(Debug, Clone)]
pub struct BackfillConfig {
    pub api_key: Option<String>,
    pub gemini_base_url: String,
    pub model: String,
    pub cache_dir: PathBuf,
    pub rate_limit_interval: Duration,
    pub retry: RetryPolicy,
}

impl BackfillConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load from an arbitrary variable lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let api_key = get("GEMINI_API_KEY").or_else(|| get("API_KEY"));

        let number = |var: &'static str, default: u64| parse_or(get(var), var, default);
        let interval_ms = number("BACKFILL_INTERVAL_MS", DEFAULT_RATE_LIMIT_INTERVAL_MS)?;
        let backoff_ms = number("BACKFILL_BACKOFF_BASE_MS", DEFAULT_BACKOFF_BASE_MS)?;
        let max_retries: u32 = parse_or(
            get("BACKFILL_MAX_RETRIES"),
            "BACKFILL_MAX_RETRIES",
            DEFAULT_MAX_RETRIES,
        )?;

        Ok(Self {
            api_key,
            gemini_base_url: get("GEMINI_BASE_URL").unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.into()),
            model: get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_IMAGE_MODEL.into()),
            cache_dir: get("LUMINA_CACHE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CACHE_DIR)),
            rate_limit_interval: Duration::from_millis(interval_ms),
            retry: RetryPolicy {
                max_retries,
                backoff_base: Duration::from_millis(backoff_ms),
            },
        })
    }

    pub fn policy(&self) -> BackfillPolicy {
        BackfillPolicy {
            rate_limit_interval: self.rate_limit_interval,
        }
    }

    /// Retrying Gemini client built from this configuration.
    pub fn image_client(&self) -> ImageClient<GeminiApi> {
        let api = GeminiApi::new(self.api_key.clone())
            .with_base_url(self.gemini_base_url.clone())
            .with_model(self.model.clone());
        ImageClient::with_policy(api, self.retry)
    }

    /// File store rooted at [`cache_dir`](Self::cache_dir).
    pub fn store(&self) -> Arc<dyn CacheStore> {
        Arc::new(FileStore::new(self.cache_dir.clone()))
    }
}

/// Load both caches from `store`.
pub async fn open_caches(store: Arc<dyn CacheStore>) -> (Arc<CategoryImageCache>, Arc<ProductImageCache>) {
    let categories = CategoryImageCache::open_categories(store.clone()).await;
    let products = ProductImageCache::open_products(store).await;
    (Arc::new(categories), Arc::new(products))
}

/// Production backfill over the full catalog.
pub fn gemini_backfill(
    config: &BackfillConfig,
    categories: Arc<CategoryImageCache>,
    products: Arc<ProductImageCache>,
) -> ImageBackfill<ImageClient<GeminiApi>> {
    ImageBackfill::new(config.image_client(), categories, products, config.policy())
}

fn parse_or<T>(raw: Option<String>, var: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError {
            var,
            reason: e.to_string(),
            value,
        }),
    }
}
