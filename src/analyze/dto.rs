use serde::{Deserialize, Serialize};

use crate::nutrition::NutritionRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Low,
    Moderate,
    High,
    Working,
}

impl ActivityLevel {
    /// Human wording used in prompts.
    pub fn describe(self) -> &'static str {
        match self {
            Self::Low => "low (less than 1 hour of exercise per day)",
            Self::Moderate => "moderate (1-2 hours of exercise per day)",
            Self::High => "high (more than 2 hours of exercise per day)",
            Self::Working => "working dog (very high activity)",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DogProfile {
    pub breed: String,
    pub age_years: f64,
    pub weight_kg: f64,
    pub activity: ActivityLevel,
    #[serde(default)]
    pub allergies: Vec<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl DogProfile {
    /// Breed, age and weight are the minimum for a usable recommendation.
    pub fn validate(&self) -> Result<(), String> {
        if self.breed.trim().is_empty() {
            return Err("breed must not be empty".into());
        }
        if !self.age_years.is_finite() || self.age_years <= 0.0 {
            return Err("age_years must be a positive number".into());
        }
        if !self.weight_kg.is_finite() || self.weight_kg <= 0.0 {
            return Err("weight_kg must be a positive number".into());
        }
        Ok(())
    }
}

/// Manual barcode entry.
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub barcode: String,
    pub dog: DogProfile,
    #[serde(default)]
    pub password: Option<String>,
}

/// Webcam capture path: the client ships the frame as base64.
#[derive(Debug, Deserialize)]
pub struct AnalyzeImageBase64Request {
    pub image_b64: String,
    pub dog: DogProfile,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    /// Normalized barcode the lookup ran against.
    pub barcode: String,
    /// Raw decoder payload, present when the barcode came from an image.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detected_barcode: Option<String>,
    pub nutrition: NutritionRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
    /// User-visible reason why no recommendation was produced; the
    /// nutrition result above stays valid regardless.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation_error: Option<String>,
    pub logged: bool,
}
