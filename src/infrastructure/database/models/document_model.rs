use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::Document;
use crate::domain::value_objects::{ContentHash, DocumentType, EmbeddingStatus};
use crate::infrastructure::database::schema::documents;

#[derive(Debug, Clone, Queryable, Selectable, Serialize, Identifiable)]
#[diesel(table_name = documents)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DocumentModel {
    pub id: Uuid,
    pub session_id: Option<String>,
    pub filename: String,
    pub document_type: String,
    pub content_hash: String,
    pub total_chunks: i32,
    pub embedding_status: String,
    pub embedding_error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// treat_none_as_null so clearing embedding_error on a re-embed actually
// writes NULL instead of skipping the column.
#[derive(Debug, Insertable, AsChangeset, Deserialize)]
#[diesel(table_name = documents)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub struct NewDocumentModel {
    pub id: Uuid,
    pub session_id: Option<String>,
    pub filename: String,
    pub document_type: String,
    pub content_hash: String,
    pub total_chunks: i32,
    pub embedding_status: String,
    pub embedding_error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Document> for NewDocumentModel {
    fn from(document: &Document) -> Self {
        Self {
            id: document.id(),
            session_id: document.session_id().map(|s| s.to_string()),
            filename: document.filename().to_string(),
            document_type: document.document_type().as_str().to_string(),
            content_hash: document.content_hash().as_str().to_string(),
            total_chunks: document.total_chunks(),
            embedding_status: document.embedding_status().as_str().to_string(),
            embedding_error: document
                .embedding_status()
                .error_message()
                .map(|e| e.to_string()),
            created_at: document.created_at(),
            updated_at: document.updated_at(),
        }
    }
}

impl TryFrom<DocumentModel> for Document {
    type Error = String;

    fn try_from(model: DocumentModel) -> Result<Self, Self::Error> {
        let document_type = DocumentType::parse(&model.document_type)?;
        let content_hash =
            ContentHash::new(model.content_hash).map_err(|e| format!("Invalid hash: {}", e))?;
        let embedding_status =
            EmbeddingStatus::from_parts(&model.embedding_status, model.embedding_error)?;

        Ok(Document::restore(
            model.id,
            model.session_id,
            model.filename,
            document_type,
            content_hash,
            model.total_chunks,
            embedding_status,
            model.created_at,
            model.updated_at,
        ))
    }
}
