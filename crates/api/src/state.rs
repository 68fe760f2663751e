use std::sync::Arc;

use lumina_cache::{CategoryImageCache, ProductImageCache};
use lumina_pipeline::LoadingFlag;

/// Shared application state available to all Axum handlers via `State<AppState>`.
#[derive(Clone)]
pub struct AppState {
    /// Generated category images (written by the backfill).
    pub categories: Arc<CategoryImageCache>,
    /// Generated product images (written by the backfill).
    pub products: Arc<ProductImageCache>,
    /// Cleared once the startup backfill ends.
    pub loading: Arc<LoadingFlag>,
}
