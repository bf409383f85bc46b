use std::sync::Arc;

use tracing::warn;

use crate::advisor::{GeminiClient, Recommender};
use crate::config::AppConfig;
use crate::logbook::{FileInteractionLog, InteractionLog};
use crate::nutrition::{NutritionSource, OpenPetFoodFacts};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub nutrition: Arc<dyn NutritionSource>,
    pub recommender: Option<Arc<dyn Recommender>>,
    pub interactions: Arc<dyn InteractionLog>,
}

impl AppState {
    pub fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env());

        let nutrition = Arc::new(OpenPetFoodFacts::new(
            &config.opff_base_url,
            &config.opff_user_agent,
        )?) as Arc<dyn NutritionSource>;

        let recommender = match config.gemini_api_key.as_deref() {
            Some(key) => Some(Arc::new(GeminiClient::new(
                &config.gemini_base_url,
                key,
                &config.gemini_model,
            )?) as Arc<dyn Recommender>),
            None => {
                warn!("GEMINI_API_KEY not set; AI recommendations disabled");
                None
            }
        };
        if config.app_password.is_none() {
            warn!("APP_PASSWORD not set; AI recommendations disabled");
        }

        let interactions = Arc::new(FileInteractionLog::new(&config.interaction_log_path)?)
            as Arc<dyn InteractionLog>;

        Ok(Self {
            config,
            nutrition,
            recommender,
            interactions,
        })
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        nutrition: Arc<dyn NutritionSource>,
        recommender: Option<Arc<dyn Recommender>>,
        interactions: Arc<dyn InteractionLog>,
    ) -> Self {
        Self {
            config,
            nutrition,
            recommender,
            interactions,
        }
    }

    pub fn fake() -> Self {
        use async_trait::async_trait;

        use crate::error::AnalyzeError;
        use crate::logbook::InteractionEntry;
        use crate::nutrition::NutritionRecord;

        struct FakeNutrition;
        #[async_trait]
        impl NutritionSource for FakeNutrition {
            async fn lookup(
                &self,
                _barcode: &str,
            ) -> Result<Option<NutritionRecord>, AnalyzeError> {
                Ok(Some(NutritionRecord {
                    product_name: Some("Test Kibble".into()),
                    ..Default::default()
                }))
            }
        }

        struct FakeRecommender;
        #[async_trait]
        impl Recommender for FakeRecommender {
            async fn recommend(&self, _prompt: &str) -> anyhow::Result<String> {
                Ok("Feed 200g per day.".into())
            }
        }

        struct NullLog;
        #[async_trait]
        impl InteractionLog for NullLog {
            async fn append(&self, _entry: &InteractionEntry) -> anyhow::Result<()> {
                Ok(())
            }
        }

        let config = Arc::new(AppConfig {
            app_password: Some("test-password".into()),
            gemini_api_key: Some("test-key".into()),
            gemini_model: "test-model".into(),
            gemini_base_url: "http://gemini.invalid".into(),
            opff_base_url: "http://opff.invalid".into(),
            opff_user_agent: "kibblescan tests".into(),
            interaction_log_path: std::env::temp_dir().join("kibblescan-test.log"),
        });

        Self {
            config,
            nutrition: Arc::new(FakeNutrition),
            recommender: Some(Arc::new(FakeRecommender)),
            interactions: Arc::new(NullLog),
        }
    }
}
