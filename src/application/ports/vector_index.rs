use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::DocumentChunk;
use crate::domain::value_objects::{ChunkMetadata, ScopePredicate};

#[derive(Debug)]
pub enum VectorIndexError {
    Timeout(String),
    NetworkError(String),
    ApiError(String),
    InvalidFilter(String),
}

impl std::fmt::Display for VectorIndexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VectorIndexError::Timeout(msg) => write!(f, "Vector index timeout: {}", msg),
            VectorIndexError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            VectorIndexError::ApiError(msg) => write!(f, "API error: {}", msg),
            VectorIndexError::InvalidFilter(msg) => write!(f, "Invalid filter: {}", msg),
        }
    }
}

impl std::error::Error for VectorIndexError {}

impl VectorIndexError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, VectorIndexError::Timeout(_))
    }
}

/// A chunk paired with its embedding, ready for storage.
#[derive(Debug, Clone)]
pub struct ChunkRecord {
    pub chunk: DocumentChunk,
    pub embedding: Vec<f32>,
}

/// A similarity match returned by the index. The metadata is echoed back
/// so the caller can re-check scope membership.
#[derive(Debug, Clone)]
pub struct RetrievedChunk {
    pub chunk_id: Uuid,
    pub text: String,
    pub similarity: f32,
    pub metadata: ChunkMetadata,
}

/// Gateway to the external vector store. Retrieval MUST honor the scope
/// predicate: returning a chunk whose metadata falls outside the predicate
/// is the cross-contamination bug class this engine exists to prevent.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Stores all records in one logical operation and returns the count
    /// stored.
    async fn upsert_chunks(&self, records: &[ChunkRecord]) -> Result<usize, VectorIndexError>;

    async fn query(
        &self,
        embedding: &[f32],
        predicate: &ScopePredicate,
        top_k: usize,
    ) -> Result<Vec<RetrievedChunk>, VectorIndexError>;

    /// Returns the number of vectors removed.
    async fn delete_by_session(&self, session_id: &str) -> Result<usize, VectorIndexError>;

    async fn delete_by_document(&self, document_id: Uuid) -> Result<usize, VectorIndexError>;

    async fn health_check(&self) -> Result<bool, VectorIndexError>;
}
