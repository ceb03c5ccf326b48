//! Gemini `generateContent` client.

use std::sync::Arc;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use tracing::instrument;

use crate::config::GeminiConfig;

use super::AdvisoryService;
use super::error::{AdvisoryError, ApiErrorResponse};
use super::types::{GenerateContentRequest, GenerateContentResponse};

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini API client.
///
/// Cheap to clone; the HTTP connection pool is shared.
#[derive(Clone)]
pub struct GeminiClient {
    inner: Arc<GeminiClientInner>,
}

struct GeminiClientInner {
    client: reqwest::Client,
    api_key: Option<SecretString>,
    model: String,
    endpoint: String,
}

impl GeminiClient {
    /// Create a new Gemini client.
    ///
    /// A missing API key is not an error here; each request will fail with
    /// [`AdvisoryError::MissingCredential`] instead.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &GeminiConfig) -> Result<Self, AdvisoryError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(GeminiClientInner {
                client,
                api_key: config.api_key.clone(),
                model: config.model.clone(),
                endpoint: format!(
                    "{}/v1beta/models/{}:generateContent",
                    config.api_base, config.model
                ),
            }),
        })
    }

    /// Generate text for a single prompt.
    ///
    /// # Errors
    ///
    /// Returns an error if no key is configured, the request fails or times
    /// out, the API answers with an error, or the answer carries no text.
    #[instrument(skip(self, prompt), fields(model = %self.inner.model))]
    pub async fn generate(&self, prompt: &str) -> Result<String, AdvisoryError> {
        let api_key = self
            .inner
            .api_key
            .as_ref()
            .ok_or(AdvisoryError::MissingCredential)?;

        let response = self
            .inner
            .client
            .post(&self.inner.endpoint)
            .header(API_KEY_HEADER, api_key.expose_secret())
            .json(&GenerateContentRequest::from_prompt(prompt))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(handle_error_status(status, response).await);
        }

        let body = response.text().await?;
        let parsed: GenerateContentResponse = serde_json::from_str(&body)
            .map_err(|e| AdvisoryError::Parse(format!("Failed to parse response: {e}")))?;

        parsed
            .text()
            .ok_or_else(|| AdvisoryError::Parse("response contained no text".to_string()))
    }
}

#[async_trait]
impl AdvisoryService for GeminiClient {
    async fn advise(&self, prompt: &str) -> Result<String, AdvisoryError> {
        self.generate(prompt).await
    }
}

/// Map a non-success status to an error.
async fn handle_error_status(
    status: reqwest::StatusCode,
    response: reqwest::Response,
) -> AdvisoryError {
    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        return AdvisoryError::Unauthorized(format!("API key rejected ({status})"));
    }

    match response.text().await {
        Ok(body) => match serde_json::from_str::<ApiErrorResponse>(&body) {
            Ok(api_error) => AdvisoryError::Api {
                status: api_error.error.status,
                message: api_error.error.message,
            },
            Err(_) => AdvisoryError::Api {
                status: status.to_string(),
                message: body,
            },
        },
        Err(e) => AdvisoryError::Http(e),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_key_fails_per_request() {
        let client = GeminiClient::new(&GeminiConfig::default()).unwrap();
        let err = client.generate("hello").await.unwrap_err();
        assert!(matches!(err, AdvisoryError::MissingCredential));
    }

    #[test]
    fn test_endpoint_includes_model() {
        let config = GeminiConfig {
            api_base: "http://127.0.0.1:9".to_string(),
            model: "gemini-test".to_string(),
            ..GeminiConfig::default()
        };
        let client = GeminiClient::new(&config).unwrap();
        assert_eq!(
            client.inner.endpoint,
            "http://127.0.0.1:9/v1beta/models/gemini-test:generateContent"
        );
    }
}
