use std::sync::Arc;
use uuid::Uuid;

use crate::application::ports::DocumentExtractor;
use crate::application::services::{Classification, Classifier, TextSplitter};
use crate::domain::entities::{Document, DocumentChunk};
use crate::domain::repositories::{
    ChunkRepository, DocumentRepository, SessionRepository,
    chunk_repository::ChunkRepositoryError, document_repository::DocumentRepositoryError,
    session_repository::SessionRepositoryError,
};
use crate::domain::value_objects::{ContentHash, DocumentType};

const ALLOWED_EXTENSIONS: [&str; 5] = ["pdf", "docx", "doc", "eml", "txt"];
const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

#[derive(Debug)]
pub enum UploadDocumentError {
    ValidationError(String),
    SessionNotFound(String),
    DuplicateDocument(Uuid),
    ExtractionError(String),
    RepositoryError(String),
}

impl std::fmt::Display for UploadDocumentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UploadDocumentError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            UploadDocumentError::SessionNotFound(id) => write!(f, "Session not found: {}", id),
            UploadDocumentError::DuplicateDocument(id) => {
                write!(f, "Document already uploaded as {}", id)
            }
            UploadDocumentError::ExtractionError(msg) => write!(f, "Extraction error: {}", msg),
            UploadDocumentError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
        }
    }
}

impl std::error::Error for UploadDocumentError {}

impl From<DocumentRepositoryError> for UploadDocumentError {
    fn from(error: DocumentRepositoryError) -> Self {
        UploadDocumentError::RepositoryError(error.to_string())
    }
}

impl From<ChunkRepositoryError> for UploadDocumentError {
    fn from(error: ChunkRepositoryError) -> Self {
        UploadDocumentError::RepositoryError(error.to_string())
    }
}

impl From<SessionRepositoryError> for UploadDocumentError {
    fn from(error: SessionRepositoryError) -> Self {
        UploadDocumentError::RepositoryError(error.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct UploadDocumentRequest {
    pub filename: String,
    pub data: Vec<u8>,
    pub session_id: Option<String>,
}

#[derive(Debug, Clone)]
pub struct UploadDocumentResponse {
    pub document_id: Uuid,
    pub filename: String,
    pub document_type: DocumentType,
    pub match_count: u32,
    pub total_chunks: i32,
}

pub struct UploadDocumentUseCase {
    document_repository: Arc<dyn DocumentRepository>,
    chunk_repository: Arc<dyn ChunkRepository>,
    session_repository: Arc<dyn SessionRepository>,
    document_extractor: Arc<dyn DocumentExtractor>,
    classifier: Classifier,
    text_splitter: TextSplitter,
}

impl UploadDocumentUseCase {
    pub fn new(
        document_repository: Arc<dyn DocumentRepository>,
        chunk_repository: Arc<dyn ChunkRepository>,
        session_repository: Arc<dyn SessionRepository>,
        document_extractor: Arc<dyn DocumentExtractor>,
        classifier: Classifier,
        text_splitter: TextSplitter,
    ) -> Self {
        Self {
            document_repository,
            chunk_repository,
            session_repository,
            document_extractor,
            classifier,
            text_splitter,
        }
    }

    pub async fn execute(
        &self,
        request: UploadDocumentRequest,
    ) -> Result<UploadDocumentResponse, UploadDocumentError> {
        let extension = Self::validate(&request)?;

        if let Some(session_id) = &request.session_id {
            if self.session_repository.find_by_id(session_id).await?.is_none() {
                return Err(UploadDocumentError::SessionNotFound(session_id.clone()));
            }
        }

        let content_hash = ContentHash::from_bytes(&request.data);
        if let Some(existing) = self
            .document_repository
            .find_by_hash(content_hash.as_str(), request.session_id.as_deref())
            .await?
        {
            return Err(UploadDocumentError::DuplicateDocument(existing.id()));
        }

        let extracted = self
            .document_extractor
            .extract_text_from_bytes(&request.data, &extension)
            .await
            .map_err(|e| UploadDocumentError::ExtractionError(e.to_string()))?;

        if extracted.text.trim().is_empty() {
            return Err(UploadDocumentError::ExtractionError(
                "No text could be extracted from the document".to_string(),
            ));
        }

        let Classification {
            document_type,
            match_count,
        } = self.classifier.classify(&extracted.text, &request.filename);

        let spans = self.text_splitter.split(&extracted.text);

        let document = Document::new(
            request.filename.clone(),
            request.session_id.clone(),
            document_type,
            content_hash,
            spans.len() as i32,
        );

        let chunks: Vec<DocumentChunk> = spans
            .into_iter()
            .enumerate()
            .map(|(index, text)| {
                DocumentChunk::new(
                    document.id(),
                    request.session_id.clone(),
                    document_type,
                    text,
                    index as i32,
                )
            })
            .collect();

        self.document_repository.save(&document).await?;
        self.chunk_repository.save_batch(&chunks).await?;

        tracing::info!(
            "Uploaded document {} ({}, {} chunks, classified as {})",
            document.id(),
            request.filename,
            document.total_chunks(),
            document_type
        );

        Ok(UploadDocumentResponse {
            document_id: document.id(),
            filename: request.filename,
            document_type,
            match_count,
            total_chunks: document.total_chunks(),
        })
    }

    fn validate(request: &UploadDocumentRequest) -> Result<String, UploadDocumentError> {
        if request.filename.trim().is_empty() {
            return Err(UploadDocumentError::ValidationError(
                "Filename cannot be empty".to_string(),
            ));
        }

        if request.data.is_empty() {
            return Err(UploadDocumentError::ValidationError(
                "File data cannot be empty".to_string(),
            ));
        }

        if request.data.len() > MAX_UPLOAD_BYTES {
            return Err(UploadDocumentError::ValidationError(format!(
                "File exceeds the {} byte upload limit",
                MAX_UPLOAD_BYTES
            )));
        }

        let extension = request
            .filename
            .rsplit('.')
            .next()
            .map(|ext| ext.to_lowercase())
            .unwrap_or_default();

        if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
            return Err(UploadDocumentError::ValidationError(format!(
                "Unsupported file type '{}'; allowed: {}",
                extension,
                ALLOWED_EXTENSIONS.join(", ")
            )));
        }

        Ok(extension)
    }
}
