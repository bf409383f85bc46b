use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, error};

use super::dto::NutritionRecord;
use crate::barcode;
use crate::error::AnalyzeError;

/// Product fields requested from the upstream database, each exactly once.
/// Whatever subset the upstream actually returns is passed through as-is.
const LOOKUP_FIELDS: &str = "product_name,brands,ingredients_text,serving_size,energy-kcal_100g,fat_100g,carbohydrates_100g,proteins_100g";

#[async_trait]
pub trait NutritionSource: Send + Sync {
    /// `Ok(None)` means the upstream database does not know the barcode;
    /// transport and parse failures are [`AnalyzeError::Lookup`].
    async fn lookup(&self, barcode: &str) -> Result<Option<NutritionRecord>, AnalyzeError>;
}

/// Open Pet Food Facts v2 product API client.
///
/// One best-effort GET per lookup: no caching, no retries, no timeout
/// beyond the transport default.
pub struct OpenPetFoodFacts {
    client: reqwest::Client,
    base_url: String,
}

impl OpenPetFoodFacts {
    pub fn new(base_url: &str, user_agent: &str) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().user_agent(user_agent).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct ProductEnvelope {
    #[serde(default)]
    status: i64,
    product: Option<NutritionRecord>,
}

#[async_trait]
impl NutritionSource for OpenPetFoodFacts {
    async fn lookup(&self, barcode: &str) -> Result<Option<NutritionRecord>, AnalyzeError> {
        let barcode = barcode::normalize(barcode);
        let url = format!(
            "{}/api/v2/product/{}?fields={}",
            self.base_url, barcode, LOOKUP_FIELDS
        );
        debug!(%barcode, "fetching product data");

        let response = self.client.get(&url).send().await.map_err(|e| {
            error!(error = %e, %barcode, "product request failed");
            AnalyzeError::Lookup(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            error!(%status, %barcode, "product request returned error status");
            return Err(AnalyzeError::Lookup(format!(
                "upstream responded with {status}"
            )));
        }

        let envelope: ProductEnvelope = response.json().await.map_err(|e| {
            error!(error = %e, %barcode, "product response was not valid JSON");
            AnalyzeError::Lookup(format!("invalid response body: {e}"))
        })?;

        if envelope.status == 1 {
            if let Some(product) = envelope.product {
                return Ok(Some(product));
            }
        }
        debug!(%barcode, upstream_status = envelope.status, "product not found upstream");
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::{NutritionSource, OpenPetFoodFacts, LOOKUP_FIELDS};
    use crate::error::AnalyzeError;

    const USER_AGENT: &str = "kibblescan - Rust - tests";

    fn client_for(server: &MockServer) -> OpenPetFoodFacts {
        OpenPetFoodFacts::new(&server.uri(), USER_AGENT).expect("client should build")
    }

    #[tokio::test]
    async fn normalizes_barcode_and_identifies_itself() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v2/product/123"))
            .and(query_param("fields", LOOKUP_FIELDS))
            .and(header("user-agent", USER_AGENT))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": 1,
                "product": { "product_name": "Test Kibble" }
            })))
            .mount(&server)
            .await;

        let record = client_for(&server)
            .lookup("0000000000123")
            .await
            .expect("lookup should succeed")
            .expect("product should be present");
        assert_eq!(record.product_name.as_deref(), Some("Test Kibble"));
    }

    #[tokio::test]
    async fn passes_upstream_payload_through() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v2/product/40123456"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": 1,
                "product": {
                    "product_name": "Beef Bites",
                    "brands": "Acme",
                    "energy-kcal_100g": 361,
                    "fat_100g": "12.5",
                    "labels": "grain-free"
                }
            })))
            .mount(&server)
            .await;

        let record = client_for(&server)
            .lookup("40123456")
            .await
            .expect("lookup should succeed")
            .expect("product should be present");
        assert_eq!(record.brands.as_deref(), Some("Acme"));
        assert_eq!(record.energy_kcal_100g, Some(361.0));
        assert_eq!(record.fat_100g, Some(12.5));
        assert_eq!(record.extra.get("labels"), Some(&json!("grain-free")));
    }

    #[tokio::test]
    async fn unknown_product_is_not_found_not_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v2/product/999"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "status": 0 })),
            )
            .mount(&server)
            .await;

        let result = client_for(&server)
            .lookup("999")
            .await
            .expect("lookup should succeed");
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn found_status_without_product_payload_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v2/product/999"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "status": 1 })),
            )
            .mount(&server)
            .await;

        let result = client_for(&server)
            .lookup("999")
            .await
            .expect("lookup should succeed");
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn server_error_is_a_lookup_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = client_for(&server).lookup("123").await.unwrap_err();
        assert!(matches!(err, AnalyzeError::Lookup(_)));
    }

    #[tokio::test]
    async fn non_json_body_is_a_lookup_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("service unavailable"))
            .mount(&server)
            .await;

        let err = client_for(&server).lookup("123").await.unwrap_err();
        assert!(matches!(err, AnalyzeError::Lookup(_)));
    }
}
