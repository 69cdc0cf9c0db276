use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use std::sync::Arc;

use crate::application::use_cases::BatchRunUseCase;
use crate::application::use_cases::batch_run::{BatchRunError, BatchRunRequest};
use crate::presentation::http::dto::{ApiResponse, BatchRunRequestDto, BatchRunResponseDto};

pub struct BatchHandler {
    batch_use_case: Arc<BatchRunUseCase>,
}

impl BatchHandler {
    pub fn new(batch_use_case: Arc<BatchRunUseCase>) -> Self {
        Self { batch_use_case }
    }

    pub async fn run_batch(
        State(handler): State<Arc<BatchHandler>>,
        Json(request): Json<BatchRunRequestDto>,
    ) -> Result<impl IntoResponse, StatusCode> {
        let batch_request = BatchRunRequest {
            document_url: request.documents,
            questions: request.questions,
        };

        match handler.batch_use_case.execute(batch_request).await {
            Ok(response) => Ok((
                StatusCode::OK,
                Json(ApiResponse::success(BatchRunResponseDto::from(response))),
            )),
            Err(e) => {
                let (status, code) = match &e {
                    BatchRunError::ValidationError(_) => {
                        (StatusCode::BAD_REQUEST, "VALIDATION_ERROR")
                    }
                    BatchRunError::FetchFailed(_) => (StatusCode::BAD_GATEWAY, "FETCH_FAILED"),
                    BatchRunError::ProcessingFailed(_) => {
                        (StatusCode::UNPROCESSABLE_ENTITY, "PROCESSING_FAILED")
                    }
                    BatchRunError::QueryFailed(_) => (StatusCode::BAD_GATEWAY, "QUERY_FAILED"),
                };
                Ok((status, Json(ApiResponse::error(code, e.to_string(), None))))
            }
        }
    }
}
