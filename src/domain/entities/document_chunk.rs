use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::{ChunkMetadata, DocumentType};

/// A contiguous span of a document's text, independently embedded and
/// retrievable. `session_id` and `document_type` are denormalized from the
/// owning document so scope filters never need a join.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentChunk {
    id: Uuid,
    document_id: Uuid,
    session_id: Option<String>,
    document_type: DocumentType,
    chunk_text: String,
    sequence_index: i32,
}

impl DocumentChunk {
    pub fn new(
        document_id: Uuid,
        session_id: Option<String>,
        document_type: DocumentType,
        chunk_text: String,
        sequence_index: i32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            document_id,
            session_id,
            document_type,
            chunk_text,
            sequence_index,
        }
    }

    pub fn restore(
        id: Uuid,
        document_id: Uuid,
        session_id: Option<String>,
        document_type: DocumentType,
        chunk_text: String,
        sequence_index: i32,
    ) -> Self {
        Self {
            id,
            document_id,
            session_id,
            document_type,
            chunk_text,
            sequence_index,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn document_id(&self) -> Uuid {
        self.document_id
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn document_type(&self) -> DocumentType {
        self.document_type
    }

    pub fn chunk_text(&self) -> &str {
        &self.chunk_text
    }

    pub fn sequence_index(&self) -> i32 {
        self.sequence_index
    }

    pub fn metadata(&self) -> ChunkMetadata {
        ChunkMetadata {
            document_id: self.document_id,
            session_id: self.session_id.clone(),
            document_type: self.document_type,
        }
    }

    pub fn retag(&mut self, document_type: DocumentType) {
        self.document_type = document_type;
    }

    pub fn is_empty(&self) -> bool {
        self.chunk_text.trim().is_empty()
    }

    pub fn word_count(&self) -> usize {
        self.chunk_text.split_whitespace().count()
    }

    pub fn has_meaningful_content(&self) -> bool {
        !self.is_empty() && self.word_count() >= 3
    }

    pub fn belongs_to_document(&self, document_id: Uuid) -> bool {
        self.document_id == document_id
    }
}
