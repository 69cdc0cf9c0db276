use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

use crate::application::ports::embedding_provider::{EmbeddingProvider, EmbeddingProviderError};

#[derive(Serialize)]
struct EmbedRequest<'a> {
    texts: &'a [String],
}

#[derive(Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

#[derive(Debug, Clone)]
pub struct EmbeddingClientConfig {
    pub service_url: String,
    pub api_key: String,
    pub dimension: usize,
    pub max_retries: u32,
    pub timeout_secs: u64,
    pub backoff_factor: f64,
}

impl EmbeddingClientConfig {
    pub fn from_env() -> Result<Self, String> {
        let service_url = env::var("EMBEDDINGS_SERVICE_URL")
            .map_err(|_| "EMBEDDINGS_SERVICE_URL not set".to_string())?;
        let api_key = env::var("EMBEDDINGS_API_KEY")
            .map_err(|_| "EMBEDDINGS_API_KEY not set".to_string())?;
        let dimension = env::var("EMBEDDINGS_DIMENSION")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(768);

        Ok(Self {
            service_url,
            api_key,
            dimension,
            max_retries: 3,
            timeout_secs: 30,
            backoff_factor: 1.5,
        })
    }
}

/// HTTP client for the external embedding service. Bounded retries with
/// multiplicative backoff; a timeout surfaces as a retryable error, never
/// a hang.
pub struct HttpEmbeddingProvider {
    client: Client,
    config: EmbeddingClientConfig,
}

impl HttpEmbeddingProvider {
    pub fn new(config: EmbeddingClientConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        let config = EmbeddingClientConfig::from_env()?;
        Ok(Self::new(config)?)
    }

    async fn request_embeddings(
        &self,
        texts: &[String],
    ) -> Result<Vec<Vec<f32>>, EmbeddingProviderError> {
        let mut attempts = 0;
        let mut last_error = None;

        loop {
            attempts += 1;

            match self.execute_request(texts).await {
                Ok(embeddings) => return Ok(embeddings),
                Err(error) => {
                    if attempts > self.config.max_retries {
                        return Err(error);
                    }
                    last_error = Some(error);
                }
            }

            let backoff = Duration::from_millis(
                (self.config.backoff_factor.powi(attempts as i32 - 1) * 1000.0) as u64,
            );
            tracing::warn!(
                "Embedding request failed (attempt {}): {}; retrying in {:?}",
                attempts,
                last_error.as_ref().map(|e| e.to_string()).unwrap_or_default(),
                backoff
            );
            tokio::time::sleep(backoff).await;
        }
    }

    async fn execute_request(
        &self,
        texts: &[String],
    ) -> Result<Vec<Vec<f32>>, EmbeddingProviderError> {
        let response = self
            .client
            .post(&self.config.service_url)
            .bearer_auth(&self.config.api_key)
            .json(&EmbedRequest { texts })
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    EmbeddingProviderError::Timeout(e.to_string())
                } else {
                    EmbeddingProviderError::NetworkError(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            return Err(EmbeddingProviderError::ApiError(format!(
                "Embedding service returned {}",
                response.status()
            )));
        }

        let body: EmbedResponse = response
            .json()
            .await
            .map_err(|e| EmbeddingProviderError::ApiError(e.to_string()))?;

        if body.embeddings.len() != texts.len() {
            return Err(EmbeddingProviderError::ApiError(format!(
                "Expected {} embeddings, got {}",
                texts.len(),
                body.embeddings.len()
            )));
        }

        Ok(body.embeddings)
    }
}

#[async_trait]
impl EmbeddingProvider for HttpEmbeddingProvider {
    async fn embed_text(&self, text: &str) -> Result<Vec<f32>, EmbeddingProviderError> {
        if text.trim().is_empty() {
            return Err(EmbeddingProviderError::InvalidInput(
                "Cannot embed empty text".to_string(),
            ));
        }

        let embeddings = self.request_embeddings(&[text.to_string()]).await?;
        embeddings.into_iter().next().ok_or_else(|| {
            EmbeddingProviderError::ApiError("Embedding service returned no vectors".to_string())
        })
    }

    async fn embed_batch(
        &self,
        texts: &[String],
    ) -> Result<Vec<Vec<f32>>, EmbeddingProviderError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        self.request_embeddings(texts).await
    }

    fn embedding_dimension(&self) -> usize {
        self.config.dimension
    }
}
