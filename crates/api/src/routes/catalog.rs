//! Route definitions for the catalog.

use axum::routing::get;
use axum::Router;

use crate::handlers::catalog;
use crate::state::AppState;

/// Routes mounted at `/api`.
///
/// ```text
/// GET /categories              -> list_categories
/// GET /products?category=      -> list_products
/// GET /products/{id}           -> get_product
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/categories", get(catalog::list_categories))
        .route("/products", get(catalog::list_products))
        .route("/products/{id}", get(catalog::get_product))
}
