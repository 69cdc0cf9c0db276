use std::sync::Arc;

use crate::domain::entities::Document;
use crate::domain::repositories::{
    DocumentRepository, document_repository::DocumentRepositoryError,
};

#[derive(Debug)]
pub enum ListDocumentsError {
    RepositoryError(String),
}

impl std::fmt::Display for ListDocumentsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListDocumentsError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
        }
    }
}

impl std::error::Error for ListDocumentsError {}

impl From<DocumentRepositoryError> for ListDocumentsError {
    fn from(error: DocumentRepositoryError) -> Self {
        ListDocumentsError::RepositoryError(error.to_string())
    }
}

#[derive(Debug, Clone, Default)]
pub struct ListDocumentsRequest {
    pub session_id: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ListDocumentsResponse {
    pub documents: Vec<Document>,
    pub total: usize,
}

pub struct ListDocumentsUseCase {
    document_repository: Arc<dyn DocumentRepository>,
}

impl ListDocumentsUseCase {
    pub fn new(document_repository: Arc<dyn DocumentRepository>) -> Self {
        Self { document_repository }
    }

    pub async fn execute(
        &self,
        request: ListDocumentsRequest,
    ) -> Result<ListDocumentsResponse, ListDocumentsError> {
        let documents = self
            .document_repository
            .find_all(request.session_id.as_deref())
            .await?;

        Ok(ListDocumentsResponse {
            total: documents.len(),
            documents,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::testing::InMemoryDocumentRepository;
    use crate::domain::value_objects::{ContentHash, DocumentType};

    async fn seed(documents: &InMemoryDocumentRepository, session_id: Option<&str>) {
        let document = Document::new(
            "doc.pdf".to_string(),
            session_id.map(|s| s.to_string()),
            DocumentType::Unknown,
            ContentHash::from_bytes(session_id.unwrap_or("none").as_bytes()),
            1,
        );
        documents.save(&document).await.unwrap();
    }

    #[tokio::test]
    async fn test_list_all() {
        let documents = Arc::new(InMemoryDocumentRepository::new());
        seed(&documents, Some("s1")).await;
        seed(&documents, Some("s2")).await;
        seed(&documents, None).await;

        let response = ListDocumentsUseCase::new(documents)
            .execute(ListDocumentsRequest::default())
            .await
            .unwrap();

        assert_eq!(response.total, 3);
    }

    #[tokio::test]
    async fn test_list_filtered_by_session() {
        let documents = Arc::new(InMemoryDocumentRepository::new());
        seed(&documents, Some("s1")).await;
        seed(&documents, Some("s2")).await;

        let response = ListDocumentsUseCase::new(documents)
            .execute(ListDocumentsRequest {
                session_id: Some("s1".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(response.total, 1);
        assert_eq!(response.documents[0].session_id(), Some("s1"));
    }
}
