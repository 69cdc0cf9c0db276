use async_trait::async_trait;
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::entities::Document;
use crate::domain::repositories::document_repository::{
    DocumentRepository, DocumentRepositoryError,
};
use crate::infrastructure::database::models::{DocumentModel, NewDocumentModel};
use crate::infrastructure::database::schema::documents::dsl::*;
use crate::infrastructure::database::{DbPool, get_connection_from_pool};

pub struct PostgresDocumentRepository {
    pool: DbPool,
}

impl PostgresDocumentRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn connection(
        &self,
    ) -> Result<crate::infrastructure::database::DbConnection, DocumentRepositoryError> {
        get_connection_from_pool(&self.pool)
            .map_err(|e| DocumentRepositoryError::DatabaseError(e.to_string()))
    }
}

#[async_trait]
impl DocumentRepository for PostgresDocumentRepository {
    async fn save(&self, document: &Document) -> Result<(), DocumentRepositoryError> {
        let mut conn = self.connection()?;
        let new_document = NewDocumentModel::from(document);

        diesel::insert_into(documents)
            .values(&new_document)
            .execute(&mut conn)
            .map_err(|e| DocumentRepositoryError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    async fn find_by_id(
        &self,
        document_id: Uuid,
    ) -> Result<Option<Document>, DocumentRepositoryError> {
        let mut conn = self.connection()?;

        let result = documents
            .find(document_id)
            .first::<DocumentModel>(&mut conn)
            .optional()
            .map_err(|e| DocumentRepositoryError::DatabaseError(e.to_string()))?;

        match result {
            Some(model) => Ok(Some(
                Document::try_from(model).map_err(DocumentRepositoryError::ValidationError)?,
            )),
            None => Ok(None),
        }
    }

    async fn find_by_hash(
        &self,
        hash: &str,
        scope_session: Option<&str>,
    ) -> Result<Option<Document>, DocumentRepositoryError> {
        let mut conn = self.connection()?;

        let mut query = documents.filter(content_hash.eq(hash)).into_boxed();
        query = match scope_session {
            Some(scope) => query.filter(session_id.eq(scope)),
            None => query.filter(session_id.is_null()),
        };

        let result = query
            .first::<DocumentModel>(&mut conn)
            .optional()
            .map_err(|e| DocumentRepositoryError::DatabaseError(e.to_string()))?;

        match result {
            Some(model) => Ok(Some(
                Document::try_from(model).map_err(DocumentRepositoryError::ValidationError)?,
            )),
            None => Ok(None),
        }
    }

    async fn find_all(
        &self,
        session_filter: Option<&str>,
    ) -> Result<Vec<Document>, DocumentRepositoryError> {
        let mut conn = self.connection()?;

        let mut query = documents.order(created_at.desc()).into_boxed();
        if let Some(scope) = session_filter {
            query = query.filter(session_id.eq(scope));
        }

        let models = query
            .load::<DocumentModel>(&mut conn)
            .map_err(|e| DocumentRepositoryError::DatabaseError(e.to_string()))?;

        let mut results = Vec::with_capacity(models.len());
        for model in models {
            results.push(
                Document::try_from(model).map_err(DocumentRepositoryError::ValidationError)?,
            );
        }

        Ok(results)
    }

    async fn update(&self, document: &Document) -> Result<(), DocumentRepositoryError> {
        let mut conn = self.connection()?;
        let changes = NewDocumentModel::from(document);

        let updated = diesel::update(documents.find(document.id()))
            .set(&changes)
            .execute(&mut conn)
            .map_err(|e| DocumentRepositoryError::DatabaseError(e.to_string()))?;

        if updated == 0 {
            return Err(DocumentRepositoryError::NotFound(document.id()));
        }

        Ok(())
    }

    async fn delete(&self, document_id: Uuid) -> Result<bool, DocumentRepositoryError> {
        let mut conn = self.connection()?;

        let deleted = diesel::delete(documents.find(document_id))
            .execute(&mut conn)
            .map_err(|e| DocumentRepositoryError::DatabaseError(e.to_string()))?;

        Ok(deleted > 0)
    }

    async fn delete_by_session(
        &self,
        scope_session: &str,
    ) -> Result<usize, DocumentRepositoryError> {
        let mut conn = self.connection()?;

        diesel::delete(documents.filter(session_id.eq(scope_session)))
            .execute(&mut conn)
            .map_err(|e| DocumentRepositoryError::DatabaseError(e.to_string()))
    }
}
