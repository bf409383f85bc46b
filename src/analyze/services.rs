use bytes::Bytes;
use tracing::warn;

use super::dto::{AnalyzeResponse, DogProfile};
use crate::advisor::prompt::build_prompt;
use crate::barcode::{self, decode::decode_image_bytes};
use crate::config::AppConfig;
use crate::error::AnalyzeError;
use crate::logbook::InteractionEntry;
use crate::nutrition::NutritionRecord;
use crate::state::AppState;

pub enum BarcodeInput {
    Manual(String),
    Image(Bytes),
}

/// One submission, start to finish: resolve the barcode, fetch nutrition,
/// then try for a recommendation behind the password gate.
///
/// Only decode and lookup failures abort the submission. Gate and composer
/// failures ride along in the response next to the nutrition result, and a
/// record is appended only when a recommendation was actually produced.
pub async fn analyze(
    state: &AppState,
    input: BarcodeInput,
    dog: DogProfile,
    password: Option<String>,
) -> Result<AnalyzeResponse, AnalyzeError> {
    let (raw, detected) = match input {
        BarcodeInput::Manual(text) => (text, None),
        BarcodeInput::Image(bytes) => {
            // scanning is CPU-bound; keep it off the runtime threads
            let decoded = tokio::task::spawn_blocking(move || decode_image_bytes(&bytes))
                .await
                .map_err(|e| AnalyzeError::Decode(e.to_string()))??
                .ok_or(AnalyzeError::BarcodeNotFound)?;
            (decoded.clone(), Some(decoded))
        }
    };

    let barcode = barcode::normalize(&raw);
    let nutrition = state
        .nutrition
        .lookup(&raw)
        .await?
        .ok_or_else(|| AnalyzeError::ProductNotFound(barcode.clone()))?;

    let (recommendation, recommendation_error) =
        match request_recommendation(state, &nutrition, &dog, password.as_deref()).await {
            Ok(text) => (Some(text), None),
            Err(e) => (None, Some(e.to_string())),
        };

    let mut logged = false;
    if let Some(text) = &recommendation {
        let entry = InteractionEntry {
            barcode: barcode.clone(),
            dog,
            nutrition: nutrition.clone(),
            recommendation: text.clone(),
        };
        match state.interactions.append(&entry).await {
            Ok(()) => logged = true,
            Err(e) => warn!(error = %e, "failed to append interaction record"),
        }
    }

    Ok(AnalyzeResponse {
        barcode,
        detected_barcode: detected,
        nutrition,
        recommendation,
        recommendation_error,
        logged,
    })
}

async fn request_recommendation(
    state: &AppState,
    nutrition: &NutritionRecord,
    dog: &DogProfile,
    password: Option<&str>,
) -> Result<String, AnalyzeError> {
    check_password(&state.config, password)?;
    let Some(recommender) = &state.recommender else {
        return Err(AnalyzeError::Recommendation(
            "recommendation service is not configured".into(),
        ));
    };
    let prompt = build_prompt(nutrition, dog);
    recommender
        .recommend(&prompt)
        .await
        .map_err(|e| AnalyzeError::Recommendation(e.to_string()))
}

// A blank supplied password counts as missing; a missing configured
// password disables the step for everyone.
fn check_password(config: &AppConfig, supplied: Option<&str>) -> Result<(), AnalyzeError> {
    let Some(expected) = config.app_password.as_deref() else {
        return Err(AnalyzeError::Auth(
            "Recommendations are disabled: no password is configured".into(),
        ));
    };
    match supplied.filter(|p| !p.is_empty()) {
        Some(given) if given == expected => Ok(()),
        Some(_) => Err(AnalyzeError::Auth(
            "Incorrect password; no recommendation was generated".into(),
        )),
        None => Err(AnalyzeError::Auth(
            "Password required to generate a recommendation".into(),
        )),
    }
}
