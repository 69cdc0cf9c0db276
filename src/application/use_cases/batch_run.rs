use std::sync::Arc;
use uuid::Uuid;

use crate::application::ports::remote_fetcher::RemoteFileFetcher;
use crate::application::use_cases::create_session::{CreateSessionRequest, CreateSessionUseCase};
use crate::application::use_cases::delete_session::{DeleteSessionRequest, DeleteSessionUseCase};
use crate::application::use_cases::embed_document::{EmbedDocumentRequest, EmbedDocumentUseCase};
use crate::application::use_cases::query_documents::{
    QueryDocumentsRequest, QueryDocumentsUseCase,
};
use crate::application::use_cases::upload_document::{
    UploadDocumentRequest, UploadDocumentUseCase,
};

#[derive(Debug)]
pub enum BatchRunError {
    ValidationError(String),
    FetchFailed(String),
    ProcessingFailed(String),
    QueryFailed(String),
}

impl std::fmt::Display for BatchRunError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BatchRunError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            BatchRunError::FetchFailed(msg) => write!(f, "Fetch failed: {}", msg),
            BatchRunError::ProcessingFailed(msg) => write!(f, "Processing failed: {}", msg),
            BatchRunError::QueryFailed(msg) => write!(f, "Query failed: {}", msg),
        }
    }
}

impl std::error::Error for BatchRunError {}

#[derive(Debug, Clone)]
pub struct BatchRunRequest {
    pub document_url: String,
    pub questions: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct BatchAnswer {
    pub question: String,
    pub answer: String,
    pub confidence: f64,
}

#[derive(Debug, Clone)]
pub struct BatchRunResponse {
    pub answers: Vec<BatchAnswer>,
}

/// One-shot flow: download a remote document into a fresh ephemeral
/// session, answer every question against it, then tear the session down
/// so nothing leaks into later queries. The last question runs with the
/// ephemeral flag so the orchestrator's cleanup path is exercised on
/// every batch; the final cascade removes the metadata and anything the
/// inline cleanup missed.
pub struct BatchRunUseCase {
    remote_fetcher: Arc<dyn RemoteFileFetcher>,
    create_session: Arc<CreateSessionUseCase>,
    upload_document: Arc<UploadDocumentUseCase>,
    embed_document: Arc<EmbedDocumentUseCase>,
    query_documents: Arc<QueryDocumentsUseCase>,
    delete_session: Arc<DeleteSessionUseCase>,
}

impl BatchRunUseCase {
    pub fn new(
        remote_fetcher: Arc<dyn RemoteFileFetcher>,
        create_session: Arc<CreateSessionUseCase>,
        upload_document: Arc<UploadDocumentUseCase>,
        embed_document: Arc<EmbedDocumentUseCase>,
        query_documents: Arc<QueryDocumentsUseCase>,
        delete_session: Arc<DeleteSessionUseCase>,
    ) -> Self {
        Self {
            remote_fetcher,
            create_session,
            upload_document,
            embed_document,
            query_documents,
            delete_session,
        }
    }

    pub async fn execute(&self, request: BatchRunRequest) -> Result<BatchRunResponse, BatchRunError> {
        if request.document_url.trim().is_empty() {
            return Err(BatchRunError::ValidationError(
                "Document URL cannot be empty".to_string(),
            ));
        }
        if request.questions.is_empty() {
            return Err(BatchRunError::ValidationError(
                "At least one question is required".to_string(),
            ));
        }

        let session_id = format!("oneshot-{}", Uuid::new_v4());

        self.create_session
            .execute(CreateSessionRequest {
                session_id: session_id.clone(),
                description: format!("One-shot processing of {}", request.document_url),
            })
            .await
            .map_err(|e| BatchRunError::ProcessingFailed(e.to_string()))?;

        let result = self.run_in_session(&session_id, &request).await;

        // The session is torn down whether the batch succeeded or not; a
        // failure here is logged, the answers were already computed.
        if let Err(error) = self
            .delete_session
            .execute(DeleteSessionRequest {
                session_id: session_id.clone(),
            })
            .await
        {
            tracing::warn!(
                "Teardown of one-shot session '{}' failed: {}",
                session_id,
                error
            );
        }

        result
    }

    async fn run_in_session(
        &self,
        session_id: &str,
        request: &BatchRunRequest,
    ) -> Result<BatchRunResponse, BatchRunError> {
        let fetched = self
            .remote_fetcher
            .fetch(&request.document_url)
            .await
            .map_err(|e| BatchRunError::FetchFailed(e.to_string()))?;

        let uploaded = self
            .upload_document
            .execute(UploadDocumentRequest {
                filename: fetched.filename,
                data: fetched.bytes,
                session_id: Some(session_id.to_string()),
            })
            .await
            .map_err(|e| BatchRunError::ProcessingFailed(e.to_string()))?;

        self.embed_document
            .execute(EmbedDocumentRequest {
                document_id: uploaded.document_id,
                document_type_override: None,
            })
            .await
            .map_err(|e| BatchRunError::ProcessingFailed(e.to_string()))?;

        tracing::info!(
            "One-shot session '{}': document {} embedded, answering {} question(s)",
            session_id,
            uploaded.document_id,
            request.questions.len()
        );

        let mut answers = Vec::with_capacity(request.questions.len());
        let last = request.questions.len() - 1;

        for (index, question) in request.questions.iter().enumerate() {
            let response = self
                .query_documents
                .execute(QueryDocumentsRequest {
                    question: question.clone(),
                    session_id: Some(session_id.to_string()),
                    ephemeral: index == last,
                    ..Default::default()
                })
                .await
                .map_err(|e| BatchRunError::QueryFailed(e.to_string()))?;

            answers.push(BatchAnswer {
                question: question.clone(),
                answer: response.answer,
                confidence: response.score.confidence,
            });
        }

        Ok(BatchRunResponse { answers })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::{
        Classifier, Scorer, SessionLockRegistry, TextSplitter,
    };
    use crate::application::use_cases::testing::{
        FixedEmbeddingProvider, FixedExtractor, FixedFetcher, InMemoryChunkRepository,
        InMemoryDocumentRepository, InMemorySessionRepository, InMemoryVectorIndex,
        RecordingCleanupQueue, ScriptedSynthesizer, SynthesizerScript,
    };
    use crate::domain::repositories::SessionRepository;

    struct Harness {
        sessions: Arc<InMemorySessionRepository>,
        index: Arc<InMemoryVectorIndex>,
        use_case: BatchRunUseCase,
    }

    fn harness() -> Harness {
        let documents = Arc::new(InMemoryDocumentRepository::new());
        let chunks = Arc::new(InMemoryChunkRepository::new());
        let sessions = Arc::new(InMemorySessionRepository::new());
        let index = Arc::new(InMemoryVectorIndex::new());
        let locks = Arc::new(SessionLockRegistry::new());
        let embeddings = Arc::new(FixedEmbeddingProvider::new(8));

        let text = "This policy sets out the coverage available to the insured, \
                    the premium payable, and every exclusion that applies to a claim.";

        let upload = Arc::new(UploadDocumentUseCase::new(
            documents.clone(),
            chunks.clone(),
            sessions.clone(),
            Arc::new(FixedExtractor::new(text)),
            Classifier::default(),
            TextSplitter::default(),
        ));
        let embed = Arc::new(EmbedDocumentUseCase::new(
            documents.clone(),
            chunks.clone(),
            embeddings.clone(),
            index.clone(),
        ));
        let query = Arc::new(QueryDocumentsUseCase::new(
            documents.clone(),
            embeddings,
            index.clone(),
            Arc::new(ScriptedSynthesizer::new(SynthesizerScript::AlwaysSucceed)),
            Arc::new(RecordingCleanupQueue::new()),
            locks.clone(),
            Scorer::default(),
        ));
        let create_session = Arc::new(CreateSessionUseCase::new(sessions.clone()));
        let delete_session = Arc::new(DeleteSessionUseCase::new(
            sessions.clone(),
            documents,
            chunks,
            index.clone(),
            locks,
        ));

        let use_case = BatchRunUseCase::new(
            Arc::new(FixedFetcher {
                filename: "policy.pdf".to_string(),
                bytes: b"%PDF-1.4 remote".to_vec(),
            }),
            create_session,
            upload,
            embed,
            query,
            delete_session,
        );

        Harness {
            sessions,
            index,
            use_case,
        }
    }

    #[tokio::test]
    async fn test_batch_answers_every_question_and_cleans_up() {
        let harness = harness();

        let response = harness
            .use_case
            .execute(BatchRunRequest {
                document_url: "https://example.com/policy.pdf".to_string(),
                questions: vec![
                    "Does this policy cover knee surgery?".to_string(),
                    "What is the premium amount?".to_string(),
                ],
            })
            .await
            .unwrap();

        assert_eq!(response.answers.len(), 2);
        assert_eq!(
            response.answers[0].question,
            "Does this policy cover knee surgery?"
        );

        // Nothing survives the run: vectors, session, all gone.
        assert_eq!(harness.index.stored_count(), 0);
        let deleted_sessions = harness.index.session_delete_calls();
        assert_eq!(deleted_sessions.len(), 2);
        let leftover = harness
            .sessions
            .find_by_id(&deleted_sessions[0])
            .await
            .unwrap();
        assert!(leftover.is_none());
    }

    #[tokio::test]
    async fn test_empty_questions_rejected() {
        let harness = harness();

        let error = harness
            .use_case
            .execute(BatchRunRequest {
                document_url: "https://example.com/policy.pdf".to_string(),
                questions: vec![],
            })
            .await
            .unwrap_err();

        assert!(matches!(error, BatchRunError::ValidationError(_)));
    }
}
