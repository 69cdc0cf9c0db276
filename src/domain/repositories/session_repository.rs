use async_trait::async_trait;

use crate::domain::entities::Session;

#[derive(Debug)]
pub enum SessionRepositoryError {
    NotFound(String),
    AlreadyExists(String),
    DatabaseError(String),
}

impl std::fmt::Display for SessionRepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionRepositoryError::NotFound(id) => write!(f, "Session not found: {}", id),
            SessionRepositoryError::AlreadyExists(id) => {
                write!(f, "Session already exists: {}", id)
            }
            SessionRepositoryError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
        }
    }
}

impl std::error::Error for SessionRepositoryError {}

#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn save(&self, session: &Session) -> Result<(), SessionRepositoryError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Session>, SessionRepositoryError>;

    async fn delete(&self, id: &str) -> Result<bool, SessionRepositoryError>;
}
