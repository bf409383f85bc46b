use axum::{extract::State, http::StatusCode, routing::get, Router};
use tracing::instrument;

use crate::state::AppState;

pub fn log_routes() -> Router<AppState> {
    Router::new().route("/log", get(get_log))
}

/// Raw interaction log content, for debugging.
#[instrument(skip(state))]
pub async fn get_log(State(state): State<AppState>) -> Result<String, (StatusCode, String)> {
    match tokio::fs::read_to_string(&state.config.interaction_log_path).await {
        Ok(content) => Ok(content),
        Err(_) => Err((
            StatusCode::NOT_FOUND,
            "Log file not created yet".to_string(),
        )),
    }
}
