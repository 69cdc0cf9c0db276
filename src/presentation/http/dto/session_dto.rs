use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::application::use_cases::create_session::CreateSessionResponse;
use crate::application::use_cases::delete_session::DeleteSessionResponse;

#[derive(Debug, Deserialize)]
pub struct CreateSessionRequestDto {
    pub session_id: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponseDto {
    pub session_id: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl From<CreateSessionResponse> for SessionResponseDto {
    fn from(response: CreateSessionResponse) -> Self {
        Self {
            session_id: response.session.id().to_string(),
            description: response.session.description().to_string(),
            created_at: response.session.created_at(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteSessionResponseDto {
    pub session_id: String,
    pub vectors_deleted: usize,
    pub documents_deleted: usize,
    pub message: String,
}

impl From<DeleteSessionResponse> for DeleteSessionResponseDto {
    fn from(response: DeleteSessionResponse) -> Self {
        Self {
            message: format!(
                "Session '{}' deleted with {} vector(s) removed.",
                response.session_id, response.vectors_deleted
            ),
            session_id: response.session_id,
            vectors_deleted: response.vectors_deleted,
            documents_deleted: response.documents_deleted,
        }
    }
}
