use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

use crate::domain::entities::Session;
use crate::domain::repositories::session_repository::{
    SessionRepository, SessionRepositoryError,
};
use crate::infrastructure::database::models::{NewSessionModel, SessionModel};
use crate::infrastructure::database::schema::sessions::dsl::*;
use crate::infrastructure::database::{DbPool, get_connection_from_pool};

pub struct PostgresSessionRepository {
    pool: DbPool,
}

impl PostgresSessionRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn connection(
        &self,
    ) -> Result<crate::infrastructure::database::DbConnection, SessionRepositoryError> {
        get_connection_from_pool(&self.pool)
            .map_err(|e| SessionRepositoryError::DatabaseError(e.to_string()))
    }
}

#[async_trait]
impl SessionRepository for PostgresSessionRepository {
    async fn save(&self, session: &Session) -> Result<(), SessionRepositoryError> {
        let mut conn = self.connection()?;
        let new_session = NewSessionModel::from(session);

        diesel::insert_into(sessions)
            .values(&new_session)
            .execute(&mut conn)
            .map_err(|e| match e {
                DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                    SessionRepositoryError::AlreadyExists(session.id().to_string())
                }
                other => SessionRepositoryError::DatabaseError(other.to_string()),
            })?;

        Ok(())
    }

    async fn find_by_id(&self, session_id: &str) -> Result<Option<Session>, SessionRepositoryError> {
        let mut conn = self.connection()?;

        let result = sessions
            .find(session_id)
            .first::<SessionModel>(&mut conn)
            .optional()
            .map_err(|e| SessionRepositoryError::DatabaseError(e.to_string()))?;

        Ok(result.map(Session::from))
    }

    async fn delete(&self, session_id: &str) -> Result<bool, SessionRepositoryError> {
        let mut conn = self.connection()?;

        let deleted = diesel::delete(sessions.find(session_id))
            .execute(&mut conn)
            .map_err(|e| SessionRepositoryError::DatabaseError(e.to_string()))?;

        Ok(deleted > 0)
    }
}
