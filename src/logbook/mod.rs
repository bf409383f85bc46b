pub mod handlers;

use std::path::PathBuf;

use anyhow::Context;
use async_trait::async_trait;
use axum::Router;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};
use tokio::io::AsyncWriteExt;

use crate::analyze::dto::DogProfile;
use crate::nutrition::NutritionRecord;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    handlers::log_routes()
}

/// One completed interaction, written once per successful recommendation.
#[derive(Debug, Clone)]
pub struct InteractionEntry {
    pub barcode: String,
    pub dog: DogProfile,
    pub nutrition: NutritionRecord,
    pub recommendation: String,
}

impl InteractionEntry {
    /// Render to one multi-line text record. The recommendation is
    /// flattened to a single line so a record always ends at its own
    /// final newline.
    pub fn render(&self, timestamp: OffsetDateTime) -> String {
        let timestamp = timestamp
            .format(&Rfc3339)
            .unwrap_or_else(|_| timestamp.unix_timestamp().to_string());
        let dog = serde_json::to_string(&self.dog).unwrap_or_else(|_| "{}".into());
        let nutrition = serde_json::to_string(&self.nutrition).unwrap_or_else(|_| "{}".into());
        format!(
            "{timestamp} interaction\n\tbarcode: {}\n\tdog: {dog}\n\tnutrition: {nutrition}\n\trecommendation: {}\n",
            self.barcode,
            flatten(&self.recommendation),
        )
    }
}

fn flatten(text: &str) -> String {
    text.replace("\r\n", " ").replace(['\n', '\r'], " ")
}

#[async_trait]
pub trait InteractionLog: Send + Sync {
    async fn append(&self, entry: &InteractionEntry) -> anyhow::Result<()>;
}

/// Append-only text file. Records are never updated in place.
pub struct FileInteractionLog {
    path: PathBuf,
}

impl FileInteractionLog {
    pub fn new(path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let path = path.into();
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("create log directory {}", dir.display()))?;
        }
        Ok(Self { path })
    }
}

#[async_trait]
impl InteractionLog for FileInteractionLog {
    async fn append(&self, entry: &InteractionEntry) -> anyhow::Result<()> {
        let record = entry.render(OffsetDateTime::now_utc());
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .with_context(|| format!("open {}", self.path.display()))?;
        // one write per record, so concurrent submissions interleave at
        // record granularity only
        file.write_all(record.as_bytes())
            .await
            .context("append interaction record")?;
        Ok(())
    }
}
