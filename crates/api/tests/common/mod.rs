use std::sync::Arc;

use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use lumina_api::config::ServerConfig;
use lumina_api::state::AppState;
use lumina_cache::{CacheStore, CategoryImageCache, MemoryStore, ProductImageCache};
use lumina_pipeline::LoadingFlag;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: [127, 0, 0, 1].into(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
    }
}

/// State over in-memory caches seeded from `store`.
pub async fn test_state(store: MemoryStore) -> AppState {
    let store: Arc<dyn CacheStore> = Arc::new(store);
    AppState {
        categories: Arc::new(CategoryImageCache::open_categories(Arc::clone(&store)).await),
        products: Arc::new(ProductImageCache::open_products(store).await),
        loading: Arc::new(LoadingFlag::new()),
    }
}

/// Full application router, as `main.rs` builds it.
pub fn build_test_app(state: AppState) -> Router {
    lumina_api::build_app(state, &test_config())
}

pub async fn get(app: Router, uri: &str) -> Response {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
