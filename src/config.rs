use std::path::PathBuf;

use crate::advisor;

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Shared password gating the recommendation step. `None` disables
    /// recommendations entirely; lookups keep working.
    pub app_password: Option<String>,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub opff_base_url: String,
    pub opff_user_agent: String,
    pub interaction_log_path: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            // an empty value counts as unset, same as clearing the var
            app_password: std::env::var("APP_PASSWORD").ok().filter(|v| !v.is_empty()),
            gemini_api_key: std::env::var("GEMINI_API_KEY").ok().filter(|v| !v.is_empty()),
            gemini_model: std::env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| advisor::DEFAULT_MODEL.into()),
            gemini_base_url: std::env::var("GEMINI_BASE_URL")
                .unwrap_or_else(|_| advisor::DEFAULT_BASE_URL.into()),
            opff_base_url: std::env::var("OPFF_BASE_URL")
                .unwrap_or_else(|_| "https://world.openpetfoodfacts.org".into()),
            opff_user_agent: std::env::var("OPFF_USER_AGENT").unwrap_or_else(|_| {
                format!("kibblescan - Rust - Version {}", env!("CARGO_PKG_VERSION"))
            }),
            interaction_log_path: std::env::var("INTERACTION_LOG")
                .unwrap_or_else(|_| "logs/interactions.log".into())
                .into(),
        }
    }
}
