use std::fmt;

use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[async_trait]
pub trait Recommender: Send + Sync {
    /// Send one prompt, get one block of free text back. Any failure here
    /// is non-fatal to the submission that asked for it.
    async fn recommend(&self, prompt: &str) -> anyhow::Result<String>;
}

/// Gemini `generateContent` client. The response is treated as opaque
/// text; no structural parsing beyond pulling out the first candidate.
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(base_url: &str, api_key: &str, model: &str) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self {
            client,
            api_key: api_key.to_string(),
            model: model.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    candidates: Option<Vec<Candidate>>,
    error: Option<ApiError>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Deserialize)]
struct ResponseContent {
    parts: Option<Vec<ResponsePart>>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ApiError {
    message: String,
}

#[async_trait]
impl Recommender for GeminiClient {
    async fn recommend(&self, prompt: &str) -> anyhow::Result<String> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );
        let body = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        debug!(model = %self.model, "requesting recommendation");
        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .context("text generation request failed")?;

        let status = response.status();
        let text = response
            .text()
            .await
            .context("reading text generation response")?;

        if !status.is_success() {
            let message = serde_json::from_str::<GenerateResponse>(&text)
                .ok()
                .and_then(|r| r.error)
                .map_or_else(|| text.clone(), |e| e.message);
            error!(%status, "text generation returned error status");
            anyhow::bail!("model API responded with {status}: {message}");
        }

        let parsed: GenerateResponse =
            serde_json::from_str(&text).context("parsing text generation response")?;
        if let Some(error) = parsed.error {
            anyhow::bail!("model API error: {}", error.message);
        }

        first_text(parsed).ok_or_else(|| anyhow::anyhow!("model response contained no text"))
    }
}

fn first_text(response: GenerateResponse) -> Option<String> {
    response
        .candidates?
        .into_iter()
        .next()?
        .content?
        .parts?
        .into_iter()
        .next()?
        .text
}

impl fmt::Debug for GeminiClient {
    // keep the API key out of logs
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiClient")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::{GeminiClient, Recommender, DEFAULT_MODEL};

    fn client_for(server: &MockServer) -> GeminiClient {
        GeminiClient::new(&server.uri(), "test-key", DEFAULT_MODEL).expect("client should build")
    }

    #[tokio::test]
    async fn returns_first_candidate_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(format!("/models/{DEFAULT_MODEL}:generateContent")))
            .and(query_param("key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [
                    { "content": { "parts": [{ "text": "Feed 300g per day." }] } }
                ]
            })))
            .mount(&server)
            .await;

        let text = client_for(&server)
            .recommend("some prompt")
            .await
            .expect("recommendation should succeed");
        assert_eq!(text, "Feed 300g per day.");
    }

    #[tokio::test]
    async fn error_status_surfaces_api_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_json(json!({
                "error": { "message": "quota exceeded" }
            })))
            .mount(&server)
            .await;

        let err = client_for(&server).recommend("some prompt").await.unwrap_err();
        assert!(err.to_string().contains("quota exceeded"));
    }

    #[tokio::test]
    async fn empty_candidates_are_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
            .mount(&server)
            .await;

        let err = client_for(&server).recommend("some prompt").await.unwrap_err();
        assert!(err.to_string().contains("no text"));
    }
}
