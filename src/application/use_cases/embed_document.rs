use std::sync::Arc;
use uuid::Uuid;

use crate::application::ports::embedding_provider::{EmbeddingProvider, EmbeddingProviderError};
use crate::application::ports::vector_index::{ChunkRecord, VectorIndex, VectorIndexError};
use crate::domain::entities::{Document, DocumentChunk};
use crate::domain::repositories::{
    ChunkRepository, DocumentRepository, chunk_repository::ChunkRepositoryError,
    document_repository::DocumentRepositoryError,
};
use crate::domain::value_objects::DocumentType;

const EMBEDDING_BATCH_SIZE: usize = 32;

#[derive(Debug)]
pub enum EmbedDocumentError {
    NotFound(String),
    ValidationError(String),
    UpstreamTimeout(String),
    UpstreamError(String),
    RepositoryError(String),
}

impl std::fmt::Display for EmbedDocumentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EmbedDocumentError::NotFound(msg) => write!(f, "Not found: {}", msg),
            EmbedDocumentError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            EmbedDocumentError::UpstreamTimeout(msg) => write!(f, "Upstream timeout: {}", msg),
            EmbedDocumentError::UpstreamError(msg) => write!(f, "Upstream error: {}", msg),
            EmbedDocumentError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
        }
    }
}

impl std::error::Error for EmbedDocumentError {}

impl From<DocumentRepositoryError> for EmbedDocumentError {
    fn from(error: DocumentRepositoryError) -> Self {
        EmbedDocumentError::RepositoryError(error.to_string())
    }
}

impl From<ChunkRepositoryError> for EmbedDocumentError {
    fn from(error: ChunkRepositoryError) -> Self {
        EmbedDocumentError::RepositoryError(error.to_string())
    }
}

impl From<EmbeddingProviderError> for EmbedDocumentError {
    fn from(error: EmbeddingProviderError) -> Self {
        if error.is_timeout() {
            EmbedDocumentError::UpstreamTimeout(error.to_string())
        } else {
            EmbedDocumentError::UpstreamError(error.to_string())
        }
    }
}

impl From<VectorIndexError> for EmbedDocumentError {
    fn from(error: VectorIndexError) -> Self {
        if error.is_timeout() {
            EmbedDocumentError::UpstreamTimeout(error.to_string())
        } else {
            EmbedDocumentError::UpstreamError(error.to_string())
        }
    }
}

#[derive(Debug, Clone)]
pub struct EmbedDocumentRequest {
    pub document_id: Uuid,
    pub document_type_override: Option<DocumentType>,
}

#[derive(Debug, Clone)]
pub struct EmbedDocumentResponse {
    pub document_id: Uuid,
    pub document_type: DocumentType,
    pub chunks_processed: usize,
    pub vectors_stored: usize,
}

/// Embeds a document's chunks into the vector index. All-or-nothing per
/// document: every embedding is generated before a single batch upsert,
/// so a mid-flight failure stores no vectors at all and `total_chunks`
/// stays truthful.
pub struct EmbedDocumentUseCase {
    document_repository: Arc<dyn DocumentRepository>,
    chunk_repository: Arc<dyn ChunkRepository>,
    embedding_provider: Arc<dyn EmbeddingProvider>,
    vector_index: Arc<dyn VectorIndex>,
}

impl EmbedDocumentUseCase {
    pub fn new(
        document_repository: Arc<dyn DocumentRepository>,
        chunk_repository: Arc<dyn ChunkRepository>,
        embedding_provider: Arc<dyn EmbeddingProvider>,
        vector_index: Arc<dyn VectorIndex>,
    ) -> Self {
        Self {
            document_repository,
            chunk_repository,
            embedding_provider,
            vector_index,
        }
    }

    pub async fn execute(
        &self,
        request: EmbedDocumentRequest,
    ) -> Result<EmbedDocumentResponse, EmbedDocumentError> {
        let mut document = self
            .document_repository
            .find_by_id(request.document_id)
            .await?
            .ok_or_else(|| {
                EmbedDocumentError::NotFound(format!("Document {}", request.document_id))
            })?;

        let mut chunks = self.chunk_repository.find_by_document(document.id()).await?;
        if chunks.is_empty() {
            return Err(EmbedDocumentError::NotFound(format!(
                "Document {} has no chunks to embed",
                document.id()
            )));
        }

        if let Some(document_type) = request.document_type_override {
            document.override_type(document_type);
            self.chunk_repository
                .update_document_type(document.id(), document_type)
                .await?;
            for chunk in &mut chunks {
                chunk.retag(document_type);
            }
        }

        document
            .start_embedding()
            .map_err(EmbedDocumentError::ValidationError)?;
        self.document_repository.update(&document).await?;

        match self.embed_and_store(&document, &chunks).await {
            Ok(vectors_stored) => {
                document
                    .complete_embedding()
                    .map_err(EmbedDocumentError::ValidationError)?;
                self.document_repository.update(&document).await?;

                tracing::info!(
                    "Embedded document {}: {} chunks, {} vectors stored",
                    document.id(),
                    chunks.len(),
                    vectors_stored
                );

                Ok(EmbedDocumentResponse {
                    document_id: document.id(),
                    document_type: document.document_type(),
                    chunks_processed: chunks.len(),
                    vectors_stored,
                })
            }
            Err(error) => {
                if document.fail_embedding(error.to_string()).is_ok() {
                    let _ = self.document_repository.update(&document).await;
                }
                Err(error)
            }
        }
    }

    async fn embed_and_store(
        &self,
        document: &Document,
        chunks: &[DocumentChunk],
    ) -> Result<usize, EmbedDocumentError> {
        let batches = chunks
            .chunks(EMBEDDING_BATCH_SIZE)
            .map(|batch| {
                let texts: Vec<String> =
                    batch.iter().map(|c| c.chunk_text().to_string()).collect();
                async move { self.embedding_provider.embed_batch(&texts).await }
            })
            .collect::<Vec<_>>();

        // Every embedding must exist before anything is written.
        let embedded_batches = futures::future::try_join_all(batches).await?;
        let embeddings: Vec<Vec<f32>> = embedded_batches.into_iter().flatten().collect();

        if embeddings.len() != chunks.len() {
            return Err(EmbedDocumentError::UpstreamError(format!(
                "Embedding count mismatch for document {}: {} chunks, {} vectors",
                document.id(),
                chunks.len(),
                embeddings.len()
            )));
        }

        let records: Vec<ChunkRecord> = chunks
            .iter()
            .cloned()
            .zip(embeddings)
            .map(|(chunk, embedding)| ChunkRecord { chunk, embedding })
            .collect();

        Ok(self.vector_index.upsert_chunks(&records).await?)
    }
}
