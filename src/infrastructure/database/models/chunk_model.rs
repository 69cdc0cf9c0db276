use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::DocumentChunk;
use crate::domain::value_objects::DocumentType;
use crate::infrastructure::database::schema::document_chunks;

#[derive(Debug, Clone, Queryable, Selectable, Serialize, Identifiable)]
#[diesel(table_name = document_chunks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ChunkModel {
    pub id: Uuid,
    pub document_id: Uuid,
    pub session_id: Option<String>,
    pub document_type: String,
    pub chunk_text: String,
    pub sequence_index: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable, Deserialize)]
#[diesel(table_name = document_chunks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewChunkModel {
    pub id: Uuid,
    pub document_id: Uuid,
    pub session_id: Option<String>,
    pub document_type: String,
    pub chunk_text: String,
    pub sequence_index: i32,
}

impl From<&DocumentChunk> for NewChunkModel {
    fn from(chunk: &DocumentChunk) -> Self {
        Self {
            id: chunk.id(),
            document_id: chunk.document_id(),
            session_id: chunk.session_id().map(|s| s.to_string()),
            document_type: chunk.document_type().as_str().to_string(),
            chunk_text: chunk.chunk_text().to_string(),
            sequence_index: chunk.sequence_index(),
        }
    }
}

impl TryFrom<ChunkModel> for DocumentChunk {
    type Error = String;

    fn try_from(model: ChunkModel) -> Result<Self, Self::Error> {
        let document_type = DocumentType::parse(&model.document_type)?;

        Ok(DocumentChunk::restore(
            model.id,
            model.document_id,
            model.session_id,
            document_type,
            model.chunk_text,
            model.sequence_index,
        ))
    }
}
