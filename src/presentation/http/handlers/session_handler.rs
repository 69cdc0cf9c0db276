use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;

use crate::application::use_cases::create_session::{CreateSessionError, CreateSessionRequest};
use crate::application::use_cases::delete_session::{DeleteSessionError, DeleteSessionRequest};
use crate::application::use_cases::{CreateSessionUseCase, DeleteSessionUseCase};
use crate::presentation::http::dto::{
    ApiResponse, CreateSessionRequestDto, DeleteSessionResponseDto, SessionResponseDto,
};

pub struct SessionHandler {
    create_use_case: Arc<CreateSessionUseCase>,
    delete_use_case: Arc<DeleteSessionUseCase>,
}

impl SessionHandler {
    pub fn new(
        create_use_case: Arc<CreateSessionUseCase>,
        delete_use_case: Arc<DeleteSessionUseCase>,
    ) -> Self {
        Self {
            create_use_case,
            delete_use_case,
        }
    }

    pub async fn create_session(
        State(handler): State<Arc<SessionHandler>>,
        Json(request): Json<CreateSessionRequestDto>,
    ) -> Result<impl IntoResponse, StatusCode> {
        let create_request = CreateSessionRequest {
            session_id: request.session_id,
            description: request.description,
        };

        match handler.create_use_case.execute(create_request).await {
            Ok(response) => Ok((
                StatusCode::CREATED,
                Json(ApiResponse::success(SessionResponseDto::from(response))),
            )),
            Err(e) => {
                let (status, code) = match &e {
                    CreateSessionError::ValidationError(_) => {
                        (StatusCode::BAD_REQUEST, "VALIDATION_ERROR")
                    }
                    CreateSessionError::AlreadyExists(_) => {
                        (StatusCode::CONFLICT, "SESSION_EXISTS")
                    }
                    CreateSessionError::RepositoryError(_) => {
                        (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
                    }
                };
                Ok((status, Json(ApiResponse::error(code, e.to_string(), None))))
            }
        }
    }

    pub async fn delete_session(
        State(handler): State<Arc<SessionHandler>>,
        Path(session_id): Path<String>,
    ) -> Result<impl IntoResponse, StatusCode> {
        let request = DeleteSessionRequest { session_id };

        match handler.delete_use_case.execute(request).await {
            Ok(response) => Ok((
                StatusCode::OK,
                Json(ApiResponse::success(DeleteSessionResponseDto::from(
                    response,
                ))),
            )),
            Err(e) => {
                let (status, code) = match &e {
                    DeleteSessionError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
                    DeleteSessionError::UpstreamTimeout(_) => {
                        (StatusCode::GATEWAY_TIMEOUT, "UPSTREAM_TIMEOUT")
                    }
                    DeleteSessionError::UpstreamError(_) => {
                        (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR")
                    }
                    DeleteSessionError::RepositoryError(_) => {
                        (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
                    }
                };
                Ok((status, Json(ApiResponse::error(code, e.to_string(), None))))
            }
        }
    }
}
