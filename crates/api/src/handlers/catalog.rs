//! Handlers for the catalog resources.
//!
//! Every image field is resolved at request time: a generated image from
//! the cache when one exists, the entry's static fallback otherwise. The
//! texture close-up has no fallback and is omitted until generated.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use lumina_core::catalog::{self, Category, Product, ALL_CATEGORIES, CATEGORIES};
use lumina_core::images::{category_image_or, ProductImages};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /api/products`.
#[derive(Debug, Deserialize)]
pub struct ProductFilter {
    /// Category id, or `all` (the default).
    pub category: Option<String>,
}

/// A category with the image the storefront should show.
#[derive(Debug, Serialize)]
pub struct CategoryView {
    #[serde(flatten)]
    pub category: &'static Category,
    pub image: String,
}

/// A product with its resolved main image and optional texture close-up.
#[derive(Debug, Serialize)]
pub struct ProductView {
    #[serde(flatten)]
    pub product: &'static Product,
    pub image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub texture: Option<String>,
}

impl ProductView {
    fn resolve(product: &'static Product, cached: Option<&ProductImages>) -> Self {
        Self {
            product,
            image: ProductImages::main_or(cached, product.fallback_image).to_string(),
            texture: cached.and_then(|images| images.texture.clone()),
        }
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/categories
pub async fn list_categories(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let cached = state.categories.snapshot().await;

    let data: Vec<CategoryView> = CATEGORIES
        .iter()
        .map(|category| CategoryView {
            category,
            image: category_image_or(cached.get(category.id), category.fallback_image).to_string(),
        })
        .collect();

    Ok(Json(DataResponse { data }))
}

/// GET /api/products?category=all
///
/// Unknown categories yield an empty list rather than an error.
pub async fn list_products(
    State(state): State<AppState>,
    Query(filter): Query<ProductFilter>,
) -> AppResult<impl IntoResponse> {
    let category = filter.category.as_deref().unwrap_or(ALL_CATEGORIES);
    let cached = state.products.snapshot().await;

    let data: Vec<ProductView> = catalog::products_in_category(category)
        .into_iter()
        .map(|product| ProductView::resolve(product, cached.get(product.id)))
        .collect();

    Ok(Json(DataResponse { data }))
}

/// GET /api/products/{id}
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let product = catalog::find_product(&id)?;
    let cached = state.products.get(product.id).await;

    Ok(Json(DataResponse {
        data: ProductView::resolve(product, cached.as_ref()),
    }))
}
