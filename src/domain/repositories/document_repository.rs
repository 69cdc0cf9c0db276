use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::Document;

#[derive(Debug)]
pub enum DocumentRepositoryError {
    NotFound(Uuid),
    DatabaseError(String),
    ValidationError(String),
}

impl std::fmt::Display for DocumentRepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentRepositoryError::NotFound(id) => write!(f, "Document not found: {}", id),
            DocumentRepositoryError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            DocumentRepositoryError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
        }
    }
}

impl std::error::Error for DocumentRepositoryError {}

#[async_trait]
pub trait DocumentRepository: Send + Sync {
    async fn save(&self, document: &Document) -> Result<(), DocumentRepositoryError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Document>, DocumentRepositoryError>;

    /// Duplicate detection is scoped: the same bytes may legitimately live
    /// in two different sessions.
    async fn find_by_hash(
        &self,
        hash: &str,
        session_id: Option<&str>,
    ) -> Result<Option<Document>, DocumentRepositoryError>;

    async fn find_all(
        &self,
        session_filter: Option<&str>,
    ) -> Result<Vec<Document>, DocumentRepositoryError>;

    async fn update(&self, document: &Document) -> Result<(), DocumentRepositoryError>;

    async fn delete(&self, id: Uuid) -> Result<bool, DocumentRepositoryError>;

    async fn delete_by_session(&self, session_id: &str) -> Result<usize, DocumentRepositoryError>;
}
