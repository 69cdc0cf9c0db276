use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use std::sync::Arc;

use crate::application::use_cases::QueryDocumentsUseCase;
use crate::application::use_cases::query_documents::{
    QueryDocumentsError, QueryDocumentsRequest,
};
use crate::domain::value_objects::DocumentType;
use crate::presentation::http::dto::{ApiResponse, QueryRequestDto, QueryResponseDto};

pub struct QueryHandler {
    query_use_case: Arc<QueryDocumentsUseCase>,
}

impl QueryHandler {
    pub fn new(query_use_case: Arc<QueryDocumentsUseCase>) -> Self {
        Self { query_use_case }
    }

    pub async fn query_documents(
        State(handler): State<Arc<QueryHandler>>,
        Json(request): Json<QueryRequestDto>,
    ) -> Result<impl IntoResponse, StatusCode> {
        let document_type = match request.document_type.as_deref() {
            Some(raw) => match DocumentType::parse(raw) {
                Ok(document_type) => Some(document_type),
                Err(e) => {
                    return Ok((
                        StatusCode::BAD_REQUEST,
                        Json(ApiResponse::<QueryResponseDto>::error(
                            "INVALID_DOCUMENT_TYPE",
                            e,
                            None,
                        )),
                    ));
                }
            },
            None => None,
        };

        // HTTP callers may search across everything when they provide no
        // scope at all; session-bound isolation still applies the moment
        // any scope input is present.
        let query_request = QueryDocumentsRequest {
            question: request.question,
            session_id: request.session_id,
            document_id: request.document_id,
            document_type,
            top_k: request.top_k,
            ephemeral: false,
            allow_unscoped: true,
        };

        match handler.query_use_case.execute(query_request).await {
            Ok(response) => Ok((
                StatusCode::OK,
                Json(ApiResponse::success(QueryResponseDto::from(response))),
            )),
            Err(e) => {
                let (status, code) = match &e {
                    QueryDocumentsError::ValidationError(_) => {
                        (StatusCode::BAD_REQUEST, "VALIDATION_ERROR")
                    }
                    QueryDocumentsError::ScopeConflict(_) => {
                        (StatusCode::CONFLICT, "SCOPE_CONFLICT")
                    }
                    QueryDocumentsError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
                    QueryDocumentsError::UpstreamTimeout(_) => {
                        (StatusCode::GATEWAY_TIMEOUT, "UPSTREAM_TIMEOUT")
                    }
                    QueryDocumentsError::UpstreamError(_) => {
                        (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR")
                    }
                    QueryDocumentsError::SynthesisFailed(_) => {
                        (StatusCode::BAD_GATEWAY, "SYNTHESIS_FAILED")
                    }
                    QueryDocumentsError::RepositoryError(_) => {
                        (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
                    }
                };
                Ok((status, Json(ApiResponse::error(code, e.to_string(), None))))
            }
        }
    }
}
