use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::DocumentChunk;
use crate::domain::value_objects::DocumentType;

#[derive(Debug)]
pub enum ChunkRepositoryError {
    DatabaseError(String),
    ValidationError(String),
}

impl std::fmt::Display for ChunkRepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChunkRepositoryError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            ChunkRepositoryError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
        }
    }
}

impl std::error::Error for ChunkRepositoryError {}

#[async_trait]
pub trait ChunkRepository: Send + Sync {
    async fn save_batch(&self, chunks: &[DocumentChunk]) -> Result<(), ChunkRepositoryError>;

    /// Chunks ordered by sequence index.
    async fn find_by_document(
        &self,
        document_id: Uuid,
    ) -> Result<Vec<DocumentChunk>, ChunkRepositoryError>;

    /// Keeps the denormalized type tag in sync with an explicit document
    /// type override.
    async fn update_document_type(
        &self,
        document_id: Uuid,
        document_type: DocumentType,
    ) -> Result<usize, ChunkRepositoryError>;

    async fn delete_by_document(&self, document_id: Uuid) -> Result<usize, ChunkRepositoryError>;

    async fn delete_by_session(&self, session_id: &str) -> Result<usize, ChunkRepositoryError>;
}
