use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::env;
use std::time::Duration;
use uuid::Uuid;

use crate::application::ports::vector_index::{
    ChunkRecord, RetrievedChunk, VectorIndex, VectorIndexError,
};
use crate::domain::value_objects::{ChunkMetadata, DocumentType, ScopePredicate};

#[derive(Debug, Serialize, Deserialize)]
struct VectorMetadata {
    document_id: Uuid,
    session_id: Option<String>,
    document_type: String,
    text: String,
    sequence_index: i32,
}

#[derive(Serialize)]
struct VectorPayload {
    id: Uuid,
    values: Vec<f32>,
    metadata: VectorMetadata,
}

#[derive(Serialize)]
struct UpsertRequest {
    index: String,
    vectors: Vec<VectorPayload>,
}

#[derive(Deserialize)]
struct UpsertResponse {
    upserted_count: usize,
}

#[derive(Serialize)]
struct SimilarityRequest {
    index: String,
    vector: Vec<f32>,
    top_k: usize,
    filter: serde_json::Value,
    include_metadata: bool,
}

#[derive(Deserialize)]
struct SimilarityMatch {
    id: Uuid,
    score: f32,
    metadata: VectorMetadata,
}

#[derive(Deserialize)]
struct SimilarityResponse {
    matches: Vec<SimilarityMatch>,
}

#[derive(Serialize)]
struct DeleteRequest {
    index: String,
    filter: serde_json::Value,
}

#[derive(Deserialize)]
struct DeleteResponse {
    deleted_count: usize,
}

#[derive(Debug, Clone)]
pub struct VectorIndexClientConfig {
    pub host: String,
    pub api_key: String,
    pub index_name: String,
    pub max_retries: u32,
    pub timeout_secs: u64,
    pub backoff_factor: f64,
}

impl VectorIndexClientConfig {
    pub fn from_env() -> Result<Self, String> {
        let host =
            env::var("VECTOR_INDEX_HOST").map_err(|_| "VECTOR_INDEX_HOST not set".to_string())?;
        let api_key = env::var("VECTOR_INDEX_API_KEY")
            .map_err(|_| "VECTOR_INDEX_API_KEY not set".to_string())?;
        let index_name =
            env::var("VECTOR_INDEX_NAME").map_err(|_| "VECTOR_INDEX_NAME not set".to_string())?;

        Ok(Self {
            host,
            api_key,
            index_name,
            max_retries: 3,
            timeout_secs: 30,
            backoff_factor: 1.5,
        })
    }
}

/// HTTP gateway to the external vector store. The scope predicate is
/// translated into the store's metadata filter syntax, so the filtering
/// happens server-side before similarity ranking.
pub struct HttpVectorIndex {
    client: Client,
    config: VectorIndexClientConfig,
}

impl HttpVectorIndex {
    pub fn new(config: VectorIndexClientConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        let config = VectorIndexClientConfig::from_env()?;
        Ok(Self::new(config)?)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.host.trim_end_matches('/'), path)
    }

    fn filter_for(predicate: &ScopePredicate) -> serde_json::Value {
        match predicate {
            ScopePredicate::Document(document_id) => {
                json!({ "document_id": { "$eq": document_id } })
            }
            ScopePredicate::Session(session_id) => {
                json!({ "session_id": { "$eq": session_id } })
            }
            ScopePredicate::Type(document_type) => {
                json!({ "document_type": { "$eq": document_type.as_str() } })
            }
            ScopePredicate::Unscoped => json!({}),
        }
    }

    async fn post_with_retry<Req, Res>(
        &self,
        path: &str,
        request: &Req,
    ) -> Result<Res, VectorIndexError>
    where
        Req: Serialize,
        Res: for<'de> Deserialize<'de>,
    {
        let mut attempts = 0;

        loop {
            attempts += 1;

            match self.execute_post(path, request).await {
                Ok(response) => return Ok(response),
                Err(error) => {
                    if attempts > self.config.max_retries {
                        return Err(error);
                    }
                    let backoff = Duration::from_millis(
                        (self.config.backoff_factor.powi(attempts as i32 - 1) * 1000.0) as u64,
                    );
                    tracing::warn!(
                        "Vector index call '{}' failed (attempt {}): {}; retrying in {:?}",
                        path,
                        attempts,
                        error,
                        backoff
                    );
                    tokio::time::sleep(backoff).await;
                }
            }
        }
    }

    async fn execute_post<Req, Res>(&self, path: &str, request: &Req) -> Result<Res, VectorIndexError>
    where
        Req: Serialize,
        Res: for<'de> Deserialize<'de>,
    {
        let response = self
            .client
            .post(self.endpoint(path))
            .header("Api-Key", &self.config.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    VectorIndexError::Timeout(e.to_string())
                } else {
                    VectorIndexError::NetworkError(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            return Err(VectorIndexError::ApiError(format!(
                "Vector index returned {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| VectorIndexError::ApiError(e.to_string()))
    }
}

#[async_trait]
impl VectorIndex for HttpVectorIndex {
    async fn upsert_chunks(&self, records: &[ChunkRecord]) -> Result<usize, VectorIndexError> {
        if records.is_empty() {
            return Ok(0);
        }

        let vectors: Vec<VectorPayload> = records
            .iter()
            .map(|record| VectorPayload {
                id: record.chunk.id(),
                values: record.embedding.clone(),
                metadata: VectorMetadata {
                    document_id: record.chunk.document_id(),
                    session_id: record.chunk.session_id().map(|s| s.to_string()),
                    document_type: record.chunk.document_type().as_str().to_string(),
                    text: record.chunk.chunk_text().to_string(),
                    sequence_index: record.chunk.sequence_index(),
                },
            })
            .collect();

        let request = UpsertRequest {
            index: self.config.index_name.clone(),
            vectors,
        };

        let response: UpsertResponse = self.post_with_retry("vectors/upsert", &request).await?;
        Ok(response.upserted_count)
    }

    async fn query(
        &self,
        embedding: &[f32],
        predicate: &ScopePredicate,
        top_k: usize,
    ) -> Result<Vec<RetrievedChunk>, VectorIndexError> {
        let request = SimilarityRequest {
            index: self.config.index_name.clone(),
            vector: embedding.to_vec(),
            top_k,
            filter: Self::filter_for(predicate),
            include_metadata: true,
        };

        let response: SimilarityResponse = self.post_with_retry("query", &request).await?;

        Ok(response
            .matches
            .into_iter()
            .map(|m| RetrievedChunk {
                chunk_id: m.id,
                text: m.metadata.text.clone(),
                similarity: m.score,
                metadata: ChunkMetadata {
                    document_id: m.metadata.document_id,
                    session_id: m.metadata.session_id,
                    document_type: DocumentType::parse(&m.metadata.document_type)
                        .unwrap_or_default(),
                },
            })
            .collect())
    }

    async fn delete_by_session(&self, session_id: &str) -> Result<usize, VectorIndexError> {
        let request = DeleteRequest {
            index: self.config.index_name.clone(),
            filter: json!({ "session_id": { "$eq": session_id } }),
        };

        let response: DeleteResponse = self.post_with_retry("vectors/delete", &request).await?;
        Ok(response.deleted_count)
    }

    async fn delete_by_document(&self, document_id: Uuid) -> Result<usize, VectorIndexError> {
        let request = DeleteRequest {
            index: self.config.index_name.clone(),
            filter: json!({ "document_id": { "$eq": document_id } }),
        };

        let response: DeleteResponse = self.post_with_retry("vectors/delete", &request).await?;
        Ok(response.deleted_count)
    }

    async fn health_check(&self) -> Result<bool, VectorIndexError> {
        let response = self
            .client
            .get(self.endpoint("health"))
            .header("Api-Key", &self.config.api_key)
            .send()
            .await
            .map_err(|e| VectorIndexError::NetworkError(e.to_string()))?;

        Ok(response.status().is_success())
    }
}
