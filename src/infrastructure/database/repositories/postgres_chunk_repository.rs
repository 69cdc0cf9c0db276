use async_trait::async_trait;
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::entities::DocumentChunk;
use crate::domain::repositories::chunk_repository::{ChunkRepository, ChunkRepositoryError};
use crate::domain::value_objects::DocumentType;
use crate::infrastructure::database::models::{ChunkModel, NewChunkModel};
use crate::infrastructure::database::schema::document_chunks::dsl::*;
use crate::infrastructure::database::{DbPool, get_connection_from_pool};

pub struct PostgresChunkRepository {
    pool: DbPool,
}

impl PostgresChunkRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn connection(
        &self,
    ) -> Result<crate::infrastructure::database::DbConnection, ChunkRepositoryError> {
        get_connection_from_pool(&self.pool)
            .map_err(|e| ChunkRepositoryError::DatabaseError(e.to_string()))
    }
}

#[async_trait]
impl ChunkRepository for PostgresChunkRepository {
    async fn save_batch(&self, chunks: &[DocumentChunk]) -> Result<(), ChunkRepositoryError> {
        if chunks.is_empty() {
            return Ok(());
        }

        let mut conn = self.connection()?;
        let rows: Vec<NewChunkModel> = chunks.iter().map(NewChunkModel::from).collect();

        diesel::insert_into(document_chunks)
            .values(&rows)
            .execute(&mut conn)
            .map_err(|e| ChunkRepositoryError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    async fn find_by_document(
        &self,
        owning_document: Uuid,
    ) -> Result<Vec<DocumentChunk>, ChunkRepositoryError> {
        let mut conn = self.connection()?;

        let models = document_chunks
            .filter(document_id.eq(owning_document))
            .order(sequence_index.asc())
            .load::<ChunkModel>(&mut conn)
            .map_err(|e| ChunkRepositoryError::DatabaseError(e.to_string()))?;

        let mut results = Vec::with_capacity(models.len());
        for model in models {
            results.push(
                DocumentChunk::try_from(model).map_err(ChunkRepositoryError::ValidationError)?,
            );
        }

        Ok(results)
    }

    async fn update_document_type(
        &self,
        owning_document: Uuid,
        new_type: DocumentType,
    ) -> Result<usize, ChunkRepositoryError> {
        let mut conn = self.connection()?;

        diesel::update(document_chunks.filter(document_id.eq(owning_document)))
            .set(document_type.eq(new_type.as_str()))
            .execute(&mut conn)
            .map_err(|e| ChunkRepositoryError::DatabaseError(e.to_string()))
    }

    async fn delete_by_document(
        &self,
        owning_document: Uuid,
    ) -> Result<usize, ChunkRepositoryError> {
        let mut conn = self.connection()?;

        diesel::delete(document_chunks.filter(document_id.eq(owning_document)))
            .execute(&mut conn)
            .map_err(|e| ChunkRepositoryError::DatabaseError(e.to_string()))
    }

    async fn delete_by_session(
        &self,
        scope_session: &str,
    ) -> Result<usize, ChunkRepositoryError> {
        let mut conn = self.connection()?;

        diesel::delete(document_chunks.filter(session_id.eq(scope_session)))
            .execute(&mut conn)
            .map_err(|e| ChunkRepositoryError::DatabaseError(e.to_string()))
    }
}
