use std::sync::Arc;

use crate::application::ports::vector_index::{VectorIndex, VectorIndexError};
use crate::application::services::SessionLockRegistry;
use crate::domain::repositories::{
    ChunkRepository, DocumentRepository, SessionRepository,
    chunk_repository::ChunkRepositoryError, document_repository::DocumentRepositoryError,
    session_repository::SessionRepositoryError,
};

#[derive(Debug)]
pub enum DeleteSessionError {
    NotFound(String),
    UpstreamTimeout(String),
    UpstreamError(String),
    RepositoryError(String),
}

impl std::fmt::Display for DeleteSessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeleteSessionError::NotFound(id) => write!(f, "Session not found: {}", id),
            DeleteSessionError::UpstreamTimeout(msg) => write!(f, "Upstream timeout: {}", msg),
            DeleteSessionError::UpstreamError(msg) => write!(f, "Upstream error: {}", msg),
            DeleteSessionError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
        }
    }
}

impl std::error::Error for DeleteSessionError {}

impl From<SessionRepositoryError> for DeleteSessionError {
    fn from(error: SessionRepositoryError) -> Self {
        DeleteSessionError::RepositoryError(error.to_string())
    }
}

impl From<DocumentRepositoryError> for DeleteSessionError {
    fn from(error: DocumentRepositoryError) -> Self {
        DeleteSessionError::RepositoryError(error.to_string())
    }
}

impl From<ChunkRepositoryError> for DeleteSessionError {
    fn from(error: ChunkRepositoryError) -> Self {
        DeleteSessionError::RepositoryError(error.to_string())
    }
}

impl From<VectorIndexError> for DeleteSessionError {
    fn from(error: VectorIndexError) -> Self {
        if error.is_timeout() {
            DeleteSessionError::UpstreamTimeout(error.to_string())
        } else {
            DeleteSessionError::UpstreamError(error.to_string())
        }
    }
}

#[derive(Debug, Clone)]
pub struct DeleteSessionRequest {
    pub session_id: String,
}

#[derive(Debug, Clone)]
pub struct DeleteSessionResponse {
    pub session_id: String,
    pub vectors_deleted: usize,
    pub documents_deleted: usize,
}

/// Cascade-deletes a session: every vector carrying the session id, then
/// the chunk rows, the documents, and finally the session itself. This
/// cascade is the core isolation invariant; the advisory lock keeps any
/// concurrent session-scoped retrieval from observing it half done.
pub struct DeleteSessionUseCase {
    session_repository: Arc<dyn SessionRepository>,
    document_repository: Arc<dyn DocumentRepository>,
    chunk_repository: Arc<dyn ChunkRepository>,
    vector_index: Arc<dyn VectorIndex>,
    session_locks: Arc<SessionLockRegistry>,
}

impl DeleteSessionUseCase {
    pub fn new(
        session_repository: Arc<dyn SessionRepository>,
        document_repository: Arc<dyn DocumentRepository>,
        chunk_repository: Arc<dyn ChunkRepository>,
        vector_index: Arc<dyn VectorIndex>,
        session_locks: Arc<SessionLockRegistry>,
    ) -> Self {
        Self {
            session_repository,
            document_repository,
            chunk_repository,
            vector_index,
            session_locks,
        }
    }

    pub async fn execute(
        &self,
        request: DeleteSessionRequest,
    ) -> Result<DeleteSessionResponse, DeleteSessionError> {
        let session_id = request.session_id;

        if self.session_repository.find_by_id(&session_id).await?.is_none() {
            return Err(DeleteSessionError::NotFound(session_id));
        }

        let _guard = self.session_locks.acquire(&session_id).await;

        let vectors_deleted = self.vector_index.delete_by_session(&session_id).await?;
        self.chunk_repository.delete_by_session(&session_id).await?;
        let documents_deleted = self
            .document_repository
            .delete_by_session(&session_id)
            .await?;
        self.session_repository.delete(&session_id).await?;

        tracing::info!(
            "Deleted session '{}': {} vector(s), {} document(s)",
            session_id,
            vectors_deleted,
            documents_deleted
        );

        Ok(DeleteSessionResponse {
            session_id,
            vectors_deleted,
            documents_deleted,
        })
    }
}
