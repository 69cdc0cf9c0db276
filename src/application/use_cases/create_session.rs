use std::sync::Arc;

use crate::domain::entities::Session;
use crate::domain::repositories::{
    SessionRepository, session_repository::SessionRepositoryError,
};

#[derive(Debug)]
pub enum CreateSessionError {
    ValidationError(String),
    AlreadyExists(String),
    RepositoryError(String),
}

impl std::fmt::Display for CreateSessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CreateSessionError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            CreateSessionError::AlreadyExists(id) => write!(f, "Session already exists: {}", id),
            CreateSessionError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
        }
    }
}

impl std::error::Error for CreateSessionError {}

impl From<SessionRepositoryError> for CreateSessionError {
    fn from(error: SessionRepositoryError) -> Self {
        match error {
            SessionRepositoryError::AlreadyExists(id) => CreateSessionError::AlreadyExists(id),
            other => CreateSessionError::RepositoryError(other.to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateSessionRequest {
    pub session_id: String,
    pub description: String,
}

#[derive(Debug, Clone)]
pub struct CreateSessionResponse {
    pub session: Session,
}

pub struct CreateSessionUseCase {
    session_repository: Arc<dyn SessionRepository>,
}

impl CreateSessionUseCase {
    pub fn new(session_repository: Arc<dyn SessionRepository>) -> Self {
        Self { session_repository }
    }

    pub async fn execute(
        &self,
        request: CreateSessionRequest,
    ) -> Result<CreateSessionResponse, CreateSessionError> {
        let session = Session::new(request.session_id, request.description)
            .map_err(CreateSessionError::ValidationError)?;

        self.session_repository.save(&session).await?;

        tracing::info!("Created session '{}'", session.id());

        Ok(CreateSessionResponse { session })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::testing::InMemorySessionRepository;

    #[tokio::test]
    async fn test_create_session() {
        let use_case = CreateSessionUseCase::new(Arc::new(InMemorySessionRepository::new()));

        let response = use_case
            .execute(CreateSessionRequest {
                session_id: "claims-q3".to_string(),
                description: "Q3 claims batch".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(response.session.id(), "claims-q3");
    }

    #[tokio::test]
    async fn test_duplicate_session_rejected() {
        let use_case = CreateSessionUseCase::new(Arc::new(InMemorySessionRepository::new()));

        let request = CreateSessionRequest {
            session_id: "claims-q3".to_string(),
            description: String::new(),
        };
        use_case.execute(request.clone()).await.unwrap();

        let error = use_case.execute(request).await.unwrap_err();
        assert!(matches!(error, CreateSessionError::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn test_invalid_session_id_rejected() {
        let use_case = CreateSessionUseCase::new(Arc::new(InMemorySessionRepository::new()));

        let error = use_case
            .execute(CreateSessionRequest {
                session_id: "has spaces".to_string(),
                description: String::new(),
            })
            .await
            .unwrap_err();

        assert!(matches!(error, CreateSessionError::ValidationError(_)));
    }
}
