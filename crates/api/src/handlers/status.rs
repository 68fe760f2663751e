use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::response::DataResponse;
use crate::state::AppState;

/// Progress of the background image backfill.
#[derive(Debug, Serialize)]
pub struct BackfillStatus {
    /// `true` until the startup backfill has ended, however it ended.
    pub loading: bool,
    pub categories_cached: usize,
    pub products_cached: usize,
}

/// GET /api/status
pub async fn get_status(State(state): State<AppState>) -> Json<DataResponse<BackfillStatus>> {
    Json(DataResponse {
        data: BackfillStatus {
            loading: state.loading.is_loading(),
            categories_cached: state.categories.len().await,
            products_cached: state.products.len().await,
        },
    })
}
