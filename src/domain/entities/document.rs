use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::{ContentHash, DocumentType, EmbeddingStatus};

/// An uploaded document. The type is assigned once by the classifier at
/// upload and only changes through an explicit override on re-embed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    id: Uuid,
    session_id: Option<String>,
    filename: String,
    document_type: DocumentType,
    content_hash: ContentHash,
    total_chunks: i32,
    embedding_status: EmbeddingStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Document {
    pub fn new(
        filename: String,
        session_id: Option<String>,
        document_type: DocumentType,
        content_hash: ContentHash,
        total_chunks: i32,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            session_id,
            filename,
            document_type,
            content_hash,
            total_chunks,
            embedding_status: EmbeddingStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuild an entity from persisted state without minting a new id.
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        id: Uuid,
        session_id: Option<String>,
        filename: String,
        document_type: DocumentType,
        content_hash: ContentHash,
        total_chunks: i32,
        embedding_status: EmbeddingStatus,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            session_id,
            filename,
            document_type,
            content_hash,
            total_chunks,
            embedding_status,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn document_type(&self) -> DocumentType {
        self.document_type
    }

    pub fn content_hash(&self) -> &ContentHash {
        &self.content_hash
    }

    pub fn total_chunks(&self) -> i32 {
        self.total_chunks
    }

    pub fn embedding_status(&self) -> &EmbeddingStatus {
        &self.embedding_status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn belongs_to_session(&self, session_id: &str) -> bool {
        self.session_id.as_deref() == Some(session_id)
    }

    /// Explicit type override, only meaningful together with a re-embed of
    /// the document's chunks.
    pub fn override_type(&mut self, document_type: DocumentType) {
        self.document_type = document_type;
        self.updated_at = Utc::now();
    }

    pub fn start_embedding(&mut self) -> Result<(), String> {
        let next = EmbeddingStatus::Embedding;
        if !self.embedding_status.can_transition_to(&next) {
            return Err(format!(
                "Cannot start embedding from state '{}'",
                self.embedding_status
            ));
        }
        self.embedding_status = next;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn complete_embedding(&mut self) -> Result<(), String> {
        let next = EmbeddingStatus::Embedded;
        if !self.embedding_status.can_transition_to(&next) {
            return Err("Document is not being embedded".to_string());
        }
        self.embedding_status = next;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn fail_embedding(&mut self, error: String) -> Result<(), String> {
        let next = EmbeddingStatus::Failed(error);
        if !self.embedding_status.can_transition_to(&next) {
            return Err("Document is not being embedded".to_string());
        }
        self.embedding_status = next;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn is_embedded(&self) -> bool {
        self.embedding_status.is_embedded()
    }
}
