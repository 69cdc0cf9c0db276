use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::use_cases::embed_document::EmbedDocumentResponse;
use crate::application::use_cases::upload_document::UploadDocumentResponse;
use crate::domain::entities::Document;

#[derive(Debug, Serialize)]
pub struct UploadResponseDto {
    pub document_id: Uuid,
    pub filename: String,
    pub status: String,
    pub message: String,
}

impl From<UploadDocumentResponse> for UploadResponseDto {
    fn from(response: UploadDocumentResponse) -> Self {
        Self {
            document_id: response.document_id,
            filename: response.filename,
            status: "success".to_string(),
            message: format!(
                "Document processed successfully. {} chunks created, detected type: {} ({} keyword matches).",
                response.total_chunks, response.document_type, response.match_count
            ),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct EmbedRequestDto {
    pub document_id: Uuid,
    pub document_type: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EmbedResponseDto {
    pub document_id: Uuid,
    pub status: String,
    pub chunks_processed: usize,
    pub vectors_stored: usize,
    pub message: String,
}

impl From<EmbedDocumentResponse> for EmbedResponseDto {
    fn from(response: EmbedDocumentResponse) -> Self {
        Self {
            document_id: response.document_id,
            status: "success".to_string(),
            chunks_processed: response.chunks_processed,
            vectors_stored: response.vectors_stored,
            message: format!(
                "Embeddings generated successfully as type '{}'.",
                response.document_type
            ),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListDocumentsQueryDto {
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DocumentSummaryDto {
    pub document_id: Uuid,
    pub filename: String,
    pub document_type: String,
    pub session_id: Option<String>,
    pub total_chunks: i32,
    pub embedding_status: String,
    pub upload_time: DateTime<Utc>,
}

impl From<Document> for DocumentSummaryDto {
    fn from(document: Document) -> Self {
        Self {
            document_id: document.id(),
            filename: document.filename().to_string(),
            document_type: document.document_type().as_str().to_string(),
            session_id: document.session_id().map(|s| s.to_string()),
            total_chunks: document.total_chunks(),
            embedding_status: document.embedding_status().as_str().to_string(),
            upload_time: document.created_at(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DocumentListResponseDto {
    pub documents: Vec<DocumentSummaryDto>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct DeleteDocumentResponseDto {
    pub document_id: Uuid,
    pub vectors_deleted: usize,
    pub message: String,
}
