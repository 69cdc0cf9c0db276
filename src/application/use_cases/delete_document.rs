use std::sync::Arc;
use uuid::Uuid;

use crate::application::ports::vector_index::{VectorIndex, VectorIndexError};
use crate::application::services::SessionLockRegistry;
use crate::domain::repositories::{
    ChunkRepository, DocumentRepository, chunk_repository::ChunkRepositoryError,
    document_repository::DocumentRepositoryError,
};

#[derive(Debug)]
pub enum DeleteDocumentError {
    NotFound(Uuid),
    UpstreamTimeout(String),
    UpstreamError(String),
    RepositoryError(String),
}

impl std::fmt::Display for DeleteDocumentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeleteDocumentError::NotFound(id) => write!(f, "Document not found: {}", id),
            DeleteDocumentError::UpstreamTimeout(msg) => write!(f, "Upstream timeout: {}", msg),
            DeleteDocumentError::UpstreamError(msg) => write!(f, "Upstream error: {}", msg),
            DeleteDocumentError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
        }
    }
}

impl std::error::Error for DeleteDocumentError {}

impl From<DocumentRepositoryError> for DeleteDocumentError {
    fn from(error: DocumentRepositoryError) -> Self {
        DeleteDocumentError::RepositoryError(error.to_string())
    }
}

impl From<ChunkRepositoryError> for DeleteDocumentError {
    fn from(error: ChunkRepositoryError) -> Self {
        DeleteDocumentError::RepositoryError(error.to_string())
    }
}

impl From<VectorIndexError> for DeleteDocumentError {
    fn from(error: VectorIndexError) -> Self {
        if error.is_timeout() {
            DeleteDocumentError::UpstreamTimeout(error.to_string())
        } else {
            DeleteDocumentError::UpstreamError(error.to_string())
        }
    }
}

#[derive(Debug, Clone)]
pub struct DeleteDocumentRequest {
    pub document_id: Uuid,
}

#[derive(Debug, Clone)]
pub struct DeleteDocumentResponse {
    pub document_id: Uuid,
    pub vectors_deleted: usize,
}

/// Removes a document, its chunk rows, and its vectors. Vectors go first
/// so a partial failure can never leave orphaned vectors behind a deleted
/// metadata row.
pub struct DeleteDocumentUseCase {
    document_repository: Arc<dyn DocumentRepository>,
    chunk_repository: Arc<dyn ChunkRepository>,
    vector_index: Arc<dyn VectorIndex>,
    session_locks: Arc<SessionLockRegistry>,
}

impl DeleteDocumentUseCase {
    pub fn new(
        document_repository: Arc<dyn DocumentRepository>,
        chunk_repository: Arc<dyn ChunkRepository>,
        vector_index: Arc<dyn VectorIndex>,
        session_locks: Arc<SessionLockRegistry>,
    ) -> Self {
        Self {
            document_repository,
            chunk_repository,
            vector_index,
            session_locks,
        }
    }

    pub async fn execute(
        &self,
        request: DeleteDocumentRequest,
    ) -> Result<DeleteDocumentResponse, DeleteDocumentError> {
        let document = self
            .document_repository
            .find_by_id(request.document_id)
            .await?
            .ok_or(DeleteDocumentError::NotFound(request.document_id))?;

        // Destructive operations serialize per session.
        let _session_guard = match document.session_id() {
            Some(session_id) => Some(self.session_locks.acquire(session_id).await),
            None => None,
        };

        let vectors_deleted = self.vector_index.delete_by_document(document.id()).await?;
        self.chunk_repository.delete_by_document(document.id()).await?;
        self.document_repository.delete(document.id()).await?;

        tracing::info!(
            "Deleted document {} and {} vector(s)",
            document.id(),
            vectors_deleted
        );

        Ok(DeleteDocumentResponse {
            document_id: document.id(),
            vectors_deleted,
        })
    }
}
