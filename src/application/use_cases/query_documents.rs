use std::sync::Arc;
use uuid::Uuid;

use crate::application::ports::answer_synthesizer::{
    AnswerSynthesisError, AnswerSynthesizer, SynthesisPromptStyle, SynthesizedAnswer,
};
use crate::application::ports::cleanup_queue::{CleanupJob, CleanupQueue};
use crate::application::ports::embedding_provider::{EmbeddingProvider, EmbeddingProviderError};
use crate::application::ports::vector_index::{RetrievedChunk, VectorIndex, VectorIndexError};
use crate::application::services::{
    ScopeError, ScopeRequest, Scorer, SessionLockRegistry, resolve_scope, scoring::ScoreResult,
};
use crate::domain::entities::Document;
use crate::domain::repositories::{
    DocumentRepository, document_repository::DocumentRepositoryError,
};
use crate::domain::value_objects::{DocumentType, ScopePredicate};

const DEFAULT_TOP_K: usize = 5;

#[derive(Debug)]
pub enum QueryDocumentsError {
    ValidationError(String),
    ScopeConflict(String),
    NotFound(String),
    UpstreamTimeout(String),
    UpstreamError(String),
    SynthesisFailed(String),
    RepositoryError(String),
}

impl std::fmt::Display for QueryDocumentsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueryDocumentsError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            QueryDocumentsError::ScopeConflict(msg) => write!(f, "Scope conflict: {}", msg),
            QueryDocumentsError::NotFound(msg) => write!(f, "Not found: {}", msg),
            QueryDocumentsError::UpstreamTimeout(msg) => write!(f, "Upstream timeout: {}", msg),
            QueryDocumentsError::UpstreamError(msg) => write!(f, "Upstream error: {}", msg),
            QueryDocumentsError::SynthesisFailed(msg) => write!(f, "Synthesis failed: {}", msg),
            QueryDocumentsError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
        }
    }
}

impl std::error::Error for QueryDocumentsError {}

impl From<DocumentRepositoryError> for QueryDocumentsError {
    fn from(error: DocumentRepositoryError) -> Self {
        QueryDocumentsError::RepositoryError(error.to_string())
    }
}

impl From<EmbeddingProviderError> for QueryDocumentsError {
    fn from(error: EmbeddingProviderError) -> Self {
        if error.is_timeout() {
            QueryDocumentsError::UpstreamTimeout(error.to_string())
        } else {
            QueryDocumentsError::UpstreamError(error.to_string())
        }
    }
}

impl From<VectorIndexError> for QueryDocumentsError {
    fn from(error: VectorIndexError) -> Self {
        if error.is_timeout() {
            QueryDocumentsError::UpstreamTimeout(error.to_string())
        } else {
            QueryDocumentsError::UpstreamError(error.to_string())
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct QueryDocumentsRequest {
    pub question: String,
    pub session_id: Option<String>,
    pub document_id: Option<Uuid>,
    pub document_type: Option<DocumentType>,
    pub top_k: Option<usize>,
    /// Session-scoped callers set this for one-shot flows: the session's
    /// vectors are deleted once the answer is computed.
    pub ephemeral: bool,
    /// Unscoped search must be an explicit caller decision, never a
    /// silent default.
    pub allow_unscoped: bool,
}

#[derive(Debug, Clone)]
pub struct QueryDocumentsResponse {
    pub answer: String,
    pub justification: String,
    pub matched_clauses: Vec<String>,
    pub score: ScoreResult,
}

/// The per-query orchestration: resolve scope, retrieve, synthesize,
/// score, and clean up ephemeral session artifacts. This is the only
/// path allowed to hand a filter to the vector index for retrieval.
pub struct QueryDocumentsUseCase {
    document_repository: Arc<dyn DocumentRepository>,
    embedding_provider: Arc<dyn EmbeddingProvider>,
    vector_index: Arc<dyn VectorIndex>,
    answer_synthesizer: Arc<dyn AnswerSynthesizer>,
    cleanup_queue: Arc<dyn CleanupQueue>,
    session_locks: Arc<SessionLockRegistry>,
    scorer: Scorer,
}

impl QueryDocumentsUseCase {
    pub fn new(
        document_repository: Arc<dyn DocumentRepository>,
        embedding_provider: Arc<dyn EmbeddingProvider>,
        vector_index: Arc<dyn VectorIndex>,
        answer_synthesizer: Arc<dyn AnswerSynthesizer>,
        cleanup_queue: Arc<dyn CleanupQueue>,
        session_locks: Arc<SessionLockRegistry>,
        scorer: Scorer,
    ) -> Self {
        Self {
            document_repository,
            embedding_provider,
            vector_index,
            answer_synthesizer,
            cleanup_queue,
            session_locks,
            scorer,
        }
    }

    pub async fn execute(
        &self,
        request: QueryDocumentsRequest,
    ) -> Result<QueryDocumentsResponse, QueryDocumentsError> {
        if request.question.trim().is_empty() {
            return Err(QueryDocumentsError::ValidationError(
                "Question cannot be empty".to_string(),
            ));
        }

        let document = self.fetch_scoped_document(&request).await?;

        let scope_request = ScopeRequest {
            session_id: request.session_id.clone(),
            document_id: request.document_id,
            document_type: request.document_type,
            allow_unscoped: request.allow_unscoped,
        };
        let predicate = resolve_scope(&scope_request, document.as_ref()).map_err(|error| {
            match error {
                ScopeError::Conflict { .. } => {
                    QueryDocumentsError::ScopeConflict(error.to_string())
                }
                ScopeError::MissingDocument(id) => {
                    QueryDocumentsError::NotFound(format!("Document {}", id))
                }
                ScopeError::UnscopedNotAllowed => {
                    QueryDocumentsError::ValidationError(error.to_string())
                }
            }
        })?;

        // A delete-in-flight for the same session must not interleave
        // with this retrieval, so the advisory lock spans resolve+read
        // (and the ephemeral cleanup, when requested).
        let _session_guard = match predicate.session_id() {
            Some(session_id) => Some(self.session_locks.acquire(session_id).await),
            None => None,
        };

        let retrieved = self.retrieve(&request, &predicate).await?;
        if retrieved.is_empty() {
            return Err(QueryDocumentsError::NotFound(format!(
                "No chunks matched scope {}",
                predicate
            )));
        }

        let effective_type = self.effective_document_type(&request, document.as_ref());
        let context: Vec<String> = retrieved.iter().map(|c| c.text.clone()).collect();

        let synthesized = self
            .synthesize_with_retry(&request.question, &context, effective_type)
            .await?;

        let score = self.scorer.score(effective_type, &request.question);

        if request.ephemeral {
            if let Some(session_id) = predicate.session_id() {
                self.cleanup_ephemeral_session(session_id).await;
            }
        }

        Ok(QueryDocumentsResponse {
            answer: synthesized.answer,
            justification: synthesized.justification,
            matched_clauses: synthesized.matched_clauses,
            score,
        })
    }

    async fn fetch_scoped_document(
        &self,
        request: &QueryDocumentsRequest,
    ) -> Result<Option<Document>, QueryDocumentsError> {
        match request.document_id {
            Some(document_id) => {
                let document = self
                    .document_repository
                    .find_by_id(document_id)
                    .await?
                    .ok_or_else(|| {
                        QueryDocumentsError::NotFound(format!("Document {}", document_id))
                    })?;
                Ok(Some(document))
            }
            None => Ok(None),
        }
    }

    async fn retrieve(
        &self,
        request: &QueryDocumentsRequest,
        predicate: &ScopePredicate,
    ) -> Result<Vec<RetrievedChunk>, QueryDocumentsError> {
        let question_embedding = self.embedding_provider.embed_text(&request.question).await?;

        let top_k = request.top_k.unwrap_or(DEFAULT_TOP_K).clamp(1, 50);
        let mut retrieved = self
            .vector_index
            .query(&question_embedding, predicate, top_k)
            .await?;

        // The index is contractually bound to the predicate, but a chunk
        // leaking across the boundary is exactly the bug class this
        // engine exists to prevent. Re-check and drop rather than trust.
        let before = retrieved.len();
        retrieved.retain(|chunk| predicate.matches(&chunk.metadata));
        if retrieved.len() != before {
            tracing::warn!(
                "Vector index returned {} chunk(s) outside scope {}; dropped",
                before - retrieved.len(),
                predicate
            );
        }

        Ok(retrieved)
    }

    fn effective_document_type(
        &self,
        request: &QueryDocumentsRequest,
        document: Option<&Document>,
    ) -> DocumentType {
        match document {
            Some(document) => document.document_type(),
            None => request.document_type.unwrap_or_default(),
        }
    }

    async fn synthesize_with_retry(
        &self,
        question: &str,
        context: &[String],
        document_type: DocumentType,
    ) -> Result<SynthesizedAnswer, QueryDocumentsError> {
        let first_attempt = self
            .answer_synthesizer
            .synthesize(question, context, document_type, SynthesisPromptStyle::Standard)
            .await;

        let error = match first_attempt {
            Ok(answer) => return Ok(answer),
            Err(error) if error.is_unparsable() => error,
            Err(error) => return Err(Self::map_synthesis_error(error)),
        };

        tracing::warn!(
            "Answer synthesis returned an unparsable response, retrying with strict prompt: {}",
            error
        );

        self.answer_synthesizer
            .synthesize(question, context, document_type, SynthesisPromptStyle::Strict)
            .await
            .map_err(Self::map_synthesis_error)
    }

    fn map_synthesis_error(error: AnswerSynthesisError) -> QueryDocumentsError {
        match error {
            AnswerSynthesisError::Timeout(msg) => QueryDocumentsError::UpstreamTimeout(msg),
            AnswerSynthesisError::UnparsableResponse(msg) => {
                QueryDocumentsError::SynthesisFailed(msg)
            }
            other => QueryDocumentsError::UpstreamError(other.to_string()),
        }
    }

    /// Best effort: the answer is already computed, so a cleanup failure
    /// is logged and queued for background retry instead of failing the
    /// query.
    async fn cleanup_ephemeral_session(&self, session_id: &str) {
        match self.vector_index.delete_by_session(session_id).await {
            Ok(deleted) => {
                tracing::info!(
                    "Ephemeral cleanup removed {} vector(s) for session '{}'",
                    deleted,
                    session_id
                );
            }
            Err(error) => {
                tracing::warn!(
                    "Ephemeral cleanup failed for session '{}', queueing retry: {}",
                    session_id,
                    error
                );
                if let Err(enqueue_error) = self
                    .cleanup_queue
                    .enqueue(CleanupJob::new(session_id.to_string()))
                    .await
                {
                    tracing::error!(
                        "Could not queue cleanup retry for session '{}': {}",
                        session_id,
                        enqueue_error
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::vector_index::ChunkRecord;
    use crate::application::use_cases::testing::{
        FixedEmbeddingProvider, InMemoryDocumentRepository, InMemoryVectorIndex,
        RecordingCleanupQueue, ScriptedSynthesizer, SynthesizerScript,
    };
    use crate::domain::entities::DocumentChunk;
    use crate::domain::value_objects::ContentHash;

    struct Harness {
        documents: Arc<InMemoryDocumentRepository>,
        index: Arc<InMemoryVectorIndex>,
        cleanup: Arc<RecordingCleanupQueue>,
        synthesizer: Arc<ScriptedSynthesizer>,
        use_case: QueryDocumentsUseCase,
    }

    fn harness(script: SynthesizerScript) -> Harness {
        let documents = Arc::new(InMemoryDocumentRepository::new());
        let index = Arc::new(InMemoryVectorIndex::new());
        let cleanup = Arc::new(RecordingCleanupQueue::new());
        let synthesizer = Arc::new(ScriptedSynthesizer::new(script));

        let use_case = QueryDocumentsUseCase::new(
            documents.clone(),
            Arc::new(FixedEmbeddingProvider::new(8)),
            index.clone(),
            synthesizer.clone(),
            cleanup.clone(),
            Arc::new(SessionLockRegistry::new()),
            Scorer::default(),
        );

        Harness {
            documents,
            index,
            cleanup,
            synthesizer,
            use_case,
        }
    }

    async fn seed_chunk(
        harness: &Harness,
        session_id: Option<&str>,
        document_type: DocumentType,
        text: &str,
    ) -> DocumentChunk {
        let chunk = DocumentChunk::new(
            Uuid::new_v4(),
            session_id.map(|s| s.to_string()),
            document_type,
            text.to_string(),
            0,
        );
        harness
            .index
            .upsert_chunks(&[ChunkRecord {
                chunk: chunk.clone(),
                embedding: vec![1.0; 8],
            }])
            .await
            .unwrap();
        chunk
    }

    fn session_query(session_id: &str, question: &str) -> QueryDocumentsRequest {
        QueryDocumentsRequest {
            question: question.to_string(),
            session_id: Some(session_id.to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_session_query_never_sees_other_sessions() {
        let harness = harness(SynthesizerScript::AlwaysSucceed);
        seed_chunk(&harness, Some("s1"), DocumentType::Unknown, "s1 clause").await;
        seed_chunk(&harness, Some("s2"), DocumentType::Unknown, "s2 clause").await;

        let response = harness
            .use_case
            .execute(session_query("s1", "Does the cover apply?"))
            .await
            .unwrap();

        assert_eq!(response.matched_clauses, vec!["s1 clause".to_string()]);
    }

    #[tokio::test]
    async fn test_document_query_is_exact() {
        let harness = harness(SynthesizerScript::AlwaysSucceed);
        let chunk = seed_chunk(&harness, Some("s1"), DocumentType::Legal, "target clause").await;
        seed_chunk(&harness, Some("s1"), DocumentType::Legal, "other clause").await;

        let document = Document::restore(
            chunk.document_id(),
            Some("s1".to_string()),
            "contract.pdf".to_string(),
            DocumentType::Legal,
            ContentHash::from_bytes(b"contract"),
            1,
            crate::domain::value_objects::EmbeddingStatus::Embedded,
            chrono::Utc::now(),
            chrono::Utc::now(),
        );
        harness.documents.save(&document).await.unwrap();

        let response = harness
            .use_case
            .execute(QueryDocumentsRequest {
                question: "What does the contract say?".to_string(),
                document_id: Some(document.id()),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(response.matched_clauses, vec!["target clause".to_string()]);
        // Document scope uses the document's own classification.
        assert_eq!(response.score.document_type, DocumentType::Legal);
        assert_eq!(response.score.document_weight, 0.5);
    }

    #[tokio::test]
    async fn test_scope_conflict_is_surfaced() {
        let harness = harness(SynthesizerScript::AlwaysSucceed);
        let chunk = seed_chunk(&harness, Some("s2"), DocumentType::Legal, "clause").await;

        let document = Document::restore(
            chunk.document_id(),
            Some("s2".to_string()),
            "contract.pdf".to_string(),
            DocumentType::Legal,
            ContentHash::from_bytes(b"contract"),
            1,
            crate::domain::value_objects::EmbeddingStatus::Embedded,
            chrono::Utc::now(),
            chrono::Utc::now(),
        );
        harness.documents.save(&document).await.unwrap();

        let error = harness
            .use_case
            .execute(QueryDocumentsRequest {
                question: "Question".to_string(),
                document_id: Some(document.id()),
                session_id: Some("s1".to_string()),
                ..Default::default()
            })
            .await
            .unwrap_err();

        assert!(matches!(error, QueryDocumentsError::ScopeConflict(_)));
    }

    #[tokio::test]
    async fn test_empty_scope_is_not_found() {
        let harness = harness(SynthesizerScript::AlwaysSucceed);
        seed_chunk(&harness, Some("s2"), DocumentType::Unknown, "clause").await;

        let error = harness
            .use_case
            .execute(session_query("s1", "Does the cover apply?"))
            .await
            .unwrap_err();

        assert!(matches!(error, QueryDocumentsError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_unscoped_needs_opt_in() {
        let harness = harness(SynthesizerScript::AlwaysSucceed);
        seed_chunk(&harness, None, DocumentType::Unknown, "clause").await;

        let denied = harness
            .use_case
            .execute(QueryDocumentsRequest {
                question: "Question".to_string(),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(denied, QueryDocumentsError::ValidationError(_)));

        let allowed = harness
            .use_case
            .execute(QueryDocumentsRequest {
                question: "Question".to_string(),
                allow_unscoped: true,
                ..Default::default()
            })
            .await;
        assert!(allowed.is_ok());
    }

    #[tokio::test]
    async fn test_score_attached_to_answer() {
        let harness = harness(SynthesizerScript::AlwaysSucceed);
        seed_chunk(&harness, Some("s1"), DocumentType::Unknown, "clause").await;

        let response = harness
            .use_case
            .execute(session_query("s1", "Does this policy cover knee surgery?"))
            .await
            .unwrap();

        assert_eq!(response.score.question_weight, 1.5);
        assert_eq!(response.score.document_weight, 2.0);
        assert_eq!(response.score.score, 3.0);
        assert_eq!(response.score.confidence, 0.75);
    }

    #[tokio::test]
    async fn test_parse_failure_retries_once_with_strict_prompt() {
        let harness = harness(SynthesizerScript::UnparsableUntilStrict);
        seed_chunk(&harness, Some("s1"), DocumentType::Unknown, "clause").await;

        let response = harness
            .use_case
            .execute(session_query("s1", "Does the cover apply?"))
            .await
            .unwrap();

        assert!(!response.answer.is_empty());
        let styles = harness.synthesizer.styles_seen.lock().unwrap().clone();
        assert_eq!(
            styles,
            vec![SynthesisPromptStyle::Standard, SynthesisPromptStyle::Strict]
        );
    }

    #[tokio::test]
    async fn test_still_unparsable_is_synthesis_failure() {
        let harness = harness(SynthesizerScript::AlwaysUnparsable);
        seed_chunk(&harness, Some("s1"), DocumentType::Unknown, "clause").await;

        let error = harness
            .use_case
            .execute(session_query("s1", "Does the cover apply?"))
            .await
            .unwrap_err();

        assert!(matches!(error, QueryDocumentsError::SynthesisFailed(_)));
        assert_eq!(harness.synthesizer.styles_seen.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_ephemeral_session_query_cleans_up() {
        let harness = harness(SynthesizerScript::AlwaysSucceed);
        seed_chunk(&harness, Some("s1"), DocumentType::Unknown, "clause").await;
        seed_chunk(&harness, Some("s2"), DocumentType::Unknown, "other").await;

        let mut request = session_query("s1", "Does the cover apply?");
        request.ephemeral = true;

        harness.use_case.execute(request).await.unwrap();

        assert_eq!(harness.index.session_delete_calls(), vec!["s1".to_string()]);
        // Only the ephemeral session's vectors are gone.
        assert_eq!(harness.index.stored_count(), 1);
    }

    #[tokio::test]
    async fn test_non_ephemeral_query_leaves_vectors() {
        let harness = harness(SynthesizerScript::AlwaysSucceed);
        seed_chunk(&harness, Some("s1"), DocumentType::Unknown, "clause").await;

        harness
            .use_case
            .execute(session_query("s1", "Does the cover apply?"))
            .await
            .unwrap();

        assert!(harness.index.session_delete_calls().is_empty());
        assert_eq!(harness.index.stored_count(), 1);
    }

    #[tokio::test]
    async fn test_failed_cleanup_is_queued_not_surfaced() {
        let harness = harness(SynthesizerScript::AlwaysSucceed);
        seed_chunk(&harness, Some("s1"), DocumentType::Unknown, "clause").await;
        harness.index.fail_deletes(true);

        let mut request = session_query("s1", "Does the cover apply?");
        request.ephemeral = true;

        // The answer still comes back.
        let response = harness.use_case.execute(request).await.unwrap();
        assert!(!response.answer.is_empty());

        let queued = harness.cleanup.jobs.lock().unwrap().clone();
        assert_eq!(queued.len(), 1);
        assert_eq!(queued[0].session_id, "s1");
    }

    #[tokio::test]
    async fn test_empty_question_rejected() {
        let harness = harness(SynthesizerScript::AlwaysSucceed);

        let error = harness
            .use_case
            .execute(session_query("s1", "   "))
            .await
            .unwrap_err();

        assert!(matches!(error, QueryDocumentsError::ValidationError(_)));
    }
}
