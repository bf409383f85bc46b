use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use bytes::Bytes;
use tracing::instrument;

use super::dto::{AnalyzeImageBase64Request, AnalyzeRequest, AnalyzeResponse, DogProfile};
use super::services::{analyze, BarcodeInput};
use crate::error::AnalyzeError;
use crate::state::AppState;

pub fn analyze_routes() -> Router<AppState> {
    Router::new()
        .route("/analyze", post(analyze_manual))
        .route("/analyze/image", post(analyze_image_multipart))
        .route("/analyze/image/base64", post(analyze_image_base64))
        .layer(DefaultBodyLimit::max(20 * 1024 * 1024)) // 20MB uploads
}

/// POST /analyze { barcode, dog, password? }
#[instrument(skip(state, payload))]
pub async fn analyze_manual(
    State(state): State<AppState>,
    Json(payload): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, (StatusCode, String)> {
    if payload.barcode.is_empty() {
        return Err(bad_request("barcode must not be empty"));
    }
    payload.dog.validate().map_err(bad_request)?;
    run(
        &state,
        BarcodeInput::Manual(payload.barcode),
        payload.dog,
        payload.password,
    )
    .await
}

/// POST /analyze/image (multipart)
/// Fields: image (file), dog (JSON), password (optional text)
#[instrument(skip(state, mp))]
pub async fn analyze_image_multipart(
    State(state): State<AppState>,
    mut mp: Multipart,
) -> Result<Json<AnalyzeResponse>, (StatusCode, String)> {
    let mut image: Option<Bytes> = None;
    let mut dog: Option<DogProfile> = None;
    let mut password: Option<String> = None;

    while let Ok(Some(field)) = mp.next_field().await {
        let name = field.name().map(|s| s.to_string());
        match name.as_deref() {
            Some("image") => {
                image = Some(field.bytes().await.map_err(bad_request)?);
            }
            Some("dog") => {
                let text = field.text().await.map_err(bad_request)?;
                dog = Some(
                    serde_json::from_str(&text)
                        .map_err(|e| bad_request(format!("invalid dog profile: {e}")))?,
                );
            }
            Some("password") => {
                password = Some(field.text().await.map_err(bad_request)?);
            }
            _ => {}
        }
    }

    let image = image.ok_or_else(|| bad_request("image field is required"))?;
    let dog = dog.ok_or_else(|| bad_request("dog field is required"))?;
    dog.validate().map_err(bad_request)?;

    run(&state, BarcodeInput::Image(image), dog, password).await
}

/// POST /analyze/image/base64 { image_b64, dog, password? }
#[instrument(skip(state, payload))]
pub async fn analyze_image_base64(
    State(state): State<AppState>,
    Json(payload): Json<AnalyzeImageBase64Request>,
) -> Result<Json<AnalyzeResponse>, (StatusCode, String)> {
    payload.dog.validate().map_err(bad_request)?;
    let bytes = BASE64
        .decode(strip_data_url(&payload.image_b64).trim())
        .map_err(|_| bad_request("invalid base64 image"))?;
    run(
        &state,
        BarcodeInput::Image(Bytes::from(bytes)),
        payload.dog,
        payload.password,
    )
    .await
}

async fn run(
    state: &AppState,
    input: BarcodeInput,
    dog: DogProfile,
    password: Option<String>,
) -> Result<Json<AnalyzeResponse>, (StatusCode, String)> {
    analyze(state, input, dog, password)
        .await
        .map(Json)
        .map_err(error_response)
}

// Browsers hand webcam captures over as data URLs; accept those too.
fn strip_data_url(b64: &str) -> &str {
    if b64.starts_with("data:") {
        b64.split_once("base64,").map_or(b64, |(_, rest)| rest)
    } else {
        b64
    }
}

fn error_response(e: AnalyzeError) -> (StatusCode, String) {
    let status = match &e {
        AnalyzeError::Decode(_) | AnalyzeError::BarcodeNotFound => StatusCode::UNPROCESSABLE_ENTITY,
        AnalyzeError::ProductNotFound(_) => StatusCode::NOT_FOUND,
        AnalyzeError::Lookup(_) | AnalyzeError::Recommendation(_) => StatusCode::BAD_GATEWAY,
        AnalyzeError::Auth(_) => StatusCode::UNAUTHORIZED,
    };
    (status, e.to_string())
}

fn bad_request<E: ToString>(e: E) -> (StatusCode, String) {
    (StatusCode::BAD_REQUEST, e.to_string())
}
