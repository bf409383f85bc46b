use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::instrument;

use super::NutritionRecord;
use crate::{barcode, error::AnalyzeError, state::AppState};

pub fn product_routes() -> Router<AppState> {
    Router::new().route("/products/:barcode", get(get_product))
}

/// Lookup without the recommendation step; no password involved.
#[instrument(skip(state))]
pub async fn get_product(
    State(state): State<AppState>,
    Path(barcode): Path<String>,
) -> Result<Json<NutritionRecord>, (StatusCode, String)> {
    match state.nutrition.lookup(&barcode).await {
        Ok(Some(record)) => Ok(Json(record)),
        Ok(None) => {
            let normalized = barcode::normalize(&barcode);
            Err((
                StatusCode::NOT_FOUND,
                AnalyzeError::ProductNotFound(normalized).to_string(),
            ))
        }
        Err(e) => Err((StatusCode::BAD_GATEWAY, e.to_string())),
    }
}
