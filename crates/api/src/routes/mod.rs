pub mod catalog;
pub mod health;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api` route tree.
///
/// ```text
/// /status                        backfill progress
/// /categories                    collections with resolved imagery
/// /products                      catalog listing (?category=)
/// /products/{id}                 product detail
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/status", get(handlers::status::get_status))
        .merge(catalog::router())
}
