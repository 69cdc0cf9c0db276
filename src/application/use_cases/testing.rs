//! Hand-rolled in-memory fakes for exercising use cases without Postgres
//! or any external service.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use uuid::Uuid;

use crate::application::ports::answer_synthesizer::{
    AnswerSynthesisError, AnswerSynthesizer, SynthesisPromptStyle, SynthesizedAnswer,
};
use crate::application::ports::cleanup_queue::{CleanupJob, CleanupQueue, CleanupQueueError};
use crate::application::ports::document_extractor::{
    DocumentExtractionError, DocumentExtractor, ExtractedText,
};
use crate::application::ports::embedding_provider::{EmbeddingProvider, EmbeddingProviderError};
use crate::application::ports::remote_fetcher::{FetchedFile, RemoteFetchError, RemoteFileFetcher};
use crate::application::ports::vector_index::{
    ChunkRecord, RetrievedChunk, VectorIndex, VectorIndexError,
};
use crate::domain::entities::{Document, DocumentChunk, Session};
use crate::domain::repositories::chunk_repository::{ChunkRepository, ChunkRepositoryError};
use crate::domain::repositories::document_repository::{
    DocumentRepository, DocumentRepositoryError,
};
use crate::domain::repositories::session_repository::{
    SessionRepository, SessionRepositoryError,
};
use crate::domain::value_objects::{ChunkMetadata, DocumentType, ScopePredicate};

#[derive(Default)]
pub struct InMemoryDocumentRepository {
    documents: Mutex<HashMap<Uuid, Document>>,
}

impl InMemoryDocumentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentRepository for InMemoryDocumentRepository {
    async fn save(&self, document: &Document) -> Result<(), DocumentRepositoryError> {
        self.documents
            .lock()
            .unwrap()
            .insert(document.id(), document.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Document>, DocumentRepositoryError> {
        Ok(self.documents.lock().unwrap().get(&id).cloned())
    }

    async fn find_by_hash(
        &self,
        hash: &str,
        session_id: Option<&str>,
    ) -> Result<Option<Document>, DocumentRepositoryError> {
        Ok(self
            .documents
            .lock()
            .unwrap()
            .values()
            .find(|d| d.content_hash().as_str() == hash && d.session_id() == session_id)
            .cloned())
    }

    async fn find_all(
        &self,
        session_filter: Option<&str>,
    ) -> Result<Vec<Document>, DocumentRepositoryError> {
        let documents = self.documents.lock().unwrap();
        Ok(documents
            .values()
            .filter(|d| session_filter.is_none() || d.session_id() == session_filter)
            .cloned()
            .collect())
    }

    async fn update(&self, document: &Document) -> Result<(), DocumentRepositoryError> {
        let mut documents = self.documents.lock().unwrap();
        if !documents.contains_key(&document.id()) {
            return Err(DocumentRepositoryError::NotFound(document.id()));
        }
        documents.insert(document.id(), document.clone());
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DocumentRepositoryError> {
        Ok(self.documents.lock().unwrap().remove(&id).is_some())
    }

    async fn delete_by_session(
        &self,
        session_id: &str,
    ) -> Result<usize, DocumentRepositoryError> {
        let mut documents = self.documents.lock().unwrap();
        let before = documents.len();
        documents.retain(|_, d| d.session_id() != Some(session_id));
        Ok(before - documents.len())
    }
}

#[derive(Default)]
pub struct InMemorySessionRepository {
    sessions: Mutex<HashMap<String, Session>>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn save(&self, session: &Session) -> Result<(), SessionRepositoryError> {
        let mut sessions = self.sessions.lock().unwrap();
        if sessions.contains_key(session.id()) {
            return Err(SessionRepositoryError::AlreadyExists(
                session.id().to_string(),
            ));
        }
        sessions.insert(session.id().to_string(), session.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Session>, SessionRepositoryError> {
        Ok(self.sessions.lock().unwrap().get(id).cloned())
    }

    async fn delete(&self, id: &str) -> Result<bool, SessionRepositoryError> {
        Ok(self.sessions.lock().unwrap().remove(id).is_some())
    }
}

#[derive(Default)]
pub struct InMemoryChunkRepository {
    chunks: Mutex<Vec<DocumentChunk>>,
}

impl InMemoryChunkRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ChunkRepository for InMemoryChunkRepository {
    async fn save_batch(&self, chunks: &[DocumentChunk]) -> Result<(), ChunkRepositoryError> {
        self.chunks.lock().unwrap().extend_from_slice(chunks);
        Ok(())
    }

    async fn find_by_document(
        &self,
        document_id: Uuid,
    ) -> Result<Vec<DocumentChunk>, ChunkRepositoryError> {
        let mut found: Vec<DocumentChunk> = self
            .chunks
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.document_id() == document_id)
            .cloned()
            .collect();
        found.sort_by_key(|c| c.sequence_index());
        Ok(found)
    }

    async fn update_document_type(
        &self,
        document_id: Uuid,
        document_type: DocumentType,
    ) -> Result<usize, ChunkRepositoryError> {
        let mut chunks = self.chunks.lock().unwrap();
        let mut updated = 0;
        for chunk in chunks.iter_mut() {
            if chunk.document_id() == document_id {
                chunk.retag(document_type);
                updated += 1;
            }
        }
        Ok(updated)
    }

    async fn delete_by_document(&self, document_id: Uuid) -> Result<usize, ChunkRepositoryError> {
        let mut chunks = self.chunks.lock().unwrap();
        let before = chunks.len();
        chunks.retain(|c| c.document_id() != document_id);
        Ok(before - chunks.len())
    }

    async fn delete_by_session(&self, session_id: &str) -> Result<usize, ChunkRepositoryError> {
        let mut chunks = self.chunks.lock().unwrap();
        let before = chunks.len();
        chunks.retain(|c| c.session_id() != Some(session_id));
        Ok(before - chunks.len())
    }
}

#[derive(Debug, Clone)]
pub struct StoredVector {
    pub chunk_id: Uuid,
    pub text: String,
    pub embedding: Vec<f32>,
    pub metadata: ChunkMetadata,
}

/// In-memory vector index that honors scope predicates exactly, so tests
/// can assert isolation properties end to end.
#[derive(Default)]
pub struct InMemoryVectorIndex {
    vectors: Mutex<Vec<StoredVector>>,
    session_deletes: Mutex<Vec<String>>,
    fail_deletes: AtomicBool,
    fail_upserts: AtomicBool,
}

impl InMemoryVectorIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    pub fn fail_upserts(&self, fail: bool) {
        self.fail_upserts.store(fail, Ordering::SeqCst);
    }

    pub fn stored_count(&self) -> usize {
        self.vectors.lock().unwrap().len()
    }

    pub fn session_delete_calls(&self) -> Vec<String> {
        self.session_deletes.lock().unwrap().clone()
    }
}

#[async_trait]
impl VectorIndex for InMemoryVectorIndex {
    async fn upsert_chunks(&self, records: &[ChunkRecord]) -> Result<usize, VectorIndexError> {
        if self.fail_upserts.load(Ordering::SeqCst) {
            return Err(VectorIndexError::ApiError("upsert refused".to_string()));
        }

        let mut vectors = self.vectors.lock().unwrap();
        for record in records {
            vectors.retain(|v| v.chunk_id != record.chunk.id());
            vectors.push(StoredVector {
                chunk_id: record.chunk.id(),
                text: record.chunk.chunk_text().to_string(),
                embedding: record.embedding.clone(),
                metadata: record.chunk.metadata(),
            });
        }
        Ok(records.len())
    }

    async fn query(
        &self,
        embedding: &[f32],
        predicate: &ScopePredicate,
        top_k: usize,
    ) -> Result<Vec<RetrievedChunk>, VectorIndexError> {
        let vectors = self.vectors.lock().unwrap();
        let mut matches: Vec<RetrievedChunk> = vectors
            .iter()
            .filter(|v| predicate.matches(&v.metadata))
            .map(|v| RetrievedChunk {
                chunk_id: v.chunk_id,
                text: v.text.clone(),
                similarity: dot(embedding, &v.embedding),
                metadata: v.metadata.clone(),
            })
            .collect();
        matches.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
        matches.truncate(top_k);
        Ok(matches)
    }

    async fn delete_by_session(&self, session_id: &str) -> Result<usize, VectorIndexError> {
        self.session_deletes
            .lock()
            .unwrap()
            .push(session_id.to_string());

        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(VectorIndexError::ApiError("delete refused".to_string()));
        }

        let mut vectors = self.vectors.lock().unwrap();
        let before = vectors.len();
        vectors.retain(|v| v.metadata.session_id.as_deref() != Some(session_id));
        Ok(before - vectors.len())
    }

    async fn delete_by_document(&self, document_id: Uuid) -> Result<usize, VectorIndexError> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(VectorIndexError::ApiError("delete refused".to_string()));
        }

        let mut vectors = self.vectors.lock().unwrap();
        let before = vectors.len();
        vectors.retain(|v| v.metadata.document_id != document_id);
        Ok(before - vectors.len())
    }

    async fn health_check(&self) -> Result<bool, VectorIndexError> {
        Ok(true)
    }
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Deterministic embeddings; optionally fails from the nth batch onward
/// to exercise all-or-nothing behavior.
pub struct FixedEmbeddingProvider {
    dimension: usize,
    batches_served: AtomicUsize,
    fail_from_batch: Option<usize>,
}

impl FixedEmbeddingProvider {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            batches_served: AtomicUsize::new(0),
            fail_from_batch: None,
        }
    }

    pub fn failing_from_batch(dimension: usize, batch: usize) -> Self {
        Self {
            dimension,
            batches_served: AtomicUsize::new(0),
            fail_from_batch: Some(batch),
        }
    }

    fn embed(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0; self.dimension];
        for (i, byte) in text.bytes().enumerate() {
            vector[i % self.dimension] += byte as f32 / 255.0;
        }
        vector
    }
}

#[async_trait]
impl EmbeddingProvider for FixedEmbeddingProvider {
    async fn embed_text(&self, text: &str) -> Result<Vec<f32>, EmbeddingProviderError> {
        Ok(self.embed(text))
    }

    async fn embed_batch(
        &self,
        texts: &[String],
    ) -> Result<Vec<Vec<f32>>, EmbeddingProviderError> {
        let batch = self.batches_served.fetch_add(1, Ordering::SeqCst);
        if let Some(fail_from) = self.fail_from_batch {
            if batch >= fail_from {
                return Err(EmbeddingProviderError::ApiError(
                    "embedding service unavailable".to_string(),
                ));
            }
        }
        Ok(texts.iter().map(|t| self.embed(t)).collect())
    }

    fn embedding_dimension(&self) -> usize {
        self.dimension
    }
}

/// Extractor that ignores the payload and returns preset text.
pub struct FixedExtractor {
    text: String,
}

impl FixedExtractor {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
        }
    }
}

#[async_trait]
impl DocumentExtractor for FixedExtractor {
    async fn extract_text_from_bytes(
        &self,
        _data: &[u8],
        _file_type: &str,
    ) -> Result<ExtractedText, DocumentExtractionError> {
        Ok(ExtractedText {
            text: self.text.clone(),
            page_count: Some(1),
        })
    }

    fn supported_formats(&self) -> Vec<String> {
        vec!["pdf".to_string(), "docx".to_string(), "eml".to_string()]
    }

    fn can_extract(&self, _file_type: &str) -> bool {
        true
    }
}

pub enum SynthesizerScript {
    AlwaysSucceed,
    UnparsableUntilStrict,
    AlwaysUnparsable,
}

/// Synthesizer with scripted behavior; records the prompt styles it was
/// called with.
pub struct ScriptedSynthesizer {
    script: SynthesizerScript,
    pub styles_seen: Mutex<Vec<SynthesisPromptStyle>>,
}

impl ScriptedSynthesizer {
    pub fn new(script: SynthesizerScript) -> Self {
        Self {
            script,
            styles_seen: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl AnswerSynthesizer for ScriptedSynthesizer {
    async fn synthesize(
        &self,
        question: &str,
        context_chunks: &[String],
        _document_type: DocumentType,
        style: SynthesisPromptStyle,
    ) -> Result<SynthesizedAnswer, AnswerSynthesisError> {
        self.styles_seen.lock().unwrap().push(style);

        let unparsable = || {
            Err(AnswerSynthesisError::UnparsableResponse(
                "free-form prose".to_string(),
            ))
        };

        match self.script {
            SynthesizerScript::AlwaysSucceed => {}
            SynthesizerScript::AlwaysUnparsable => return unparsable(),
            SynthesizerScript::UnparsableUntilStrict => {
                if style == SynthesisPromptStyle::Standard {
                    return unparsable();
                }
            }
        }

        Ok(SynthesizedAnswer {
            answer: format!("Answer to '{}'", question),
            justification: "Derived from the retrieved clauses.".to_string(),
            matched_clauses: context_chunks.to_vec(),
        })
    }
}

#[derive(Default)]
pub struct RecordingCleanupQueue {
    pub jobs: Mutex<Vec<CleanupJob>>,
}

impl RecordingCleanupQueue {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CleanupQueue for RecordingCleanupQueue {
    async fn enqueue(&self, job: CleanupJob) -> Result<(), CleanupQueueError> {
        self.jobs.lock().unwrap().push(job);
        Ok(())
    }
}

pub struct FixedFetcher {
    pub filename: String,
    pub bytes: Vec<u8>,
}

#[async_trait]
impl RemoteFileFetcher for FixedFetcher {
    async fn fetch(&self, _url: &str) -> Result<FetchedFile, RemoteFetchError> {
        Ok(FetchedFile {
            bytes: self.bytes.clone(),
            filename: self.filename.clone(),
            content_type: Some("application/pdf".to_string()),
        })
    }
}
