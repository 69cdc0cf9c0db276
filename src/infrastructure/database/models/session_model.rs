use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain::entities::Session;
use crate::infrastructure::database::schema::sessions;

#[derive(Debug, Clone, Queryable, Selectable, Serialize, Identifiable)]
#[diesel(table_name = sessions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SessionModel {
    pub id: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable, Deserialize)]
#[diesel(table_name = sessions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewSessionModel {
    pub id: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Session> for NewSessionModel {
    fn from(session: &Session) -> Self {
        Self {
            id: session.id().to_string(),
            description: session.description().to_string(),
            created_at: session.created_at(),
        }
    }
}

impl From<SessionModel> for Session {
    fn from(model: SessionModel) -> Self {
        Session::restore(model.id, model.description, model.created_at)
    }
}
