use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::application::use_cases::delete_document::{
    DeleteDocumentError, DeleteDocumentRequest,
};
use crate::application::use_cases::embed_document::{EmbedDocumentError, EmbedDocumentRequest};
use crate::application::use_cases::list_documents::ListDocumentsRequest;
use crate::application::use_cases::upload_document::{
    UploadDocumentError, UploadDocumentRequest,
};
use crate::application::use_cases::{
    DeleteDocumentUseCase, EmbedDocumentUseCase, ListDocumentsUseCase, UploadDocumentUseCase,
};
use crate::domain::value_objects::DocumentType;
use crate::presentation::http::dto::{
    ApiResponse, DeleteDocumentResponseDto, DocumentListResponseDto, DocumentSummaryDto,
    EmbedRequestDto, EmbedResponseDto, ListDocumentsQueryDto, UploadResponseDto,
};

pub struct DocumentHandler {
    upload_use_case: Arc<UploadDocumentUseCase>,
    embed_use_case: Arc<EmbedDocumentUseCase>,
    list_use_case: Arc<ListDocumentsUseCase>,
    delete_use_case: Arc<DeleteDocumentUseCase>,
}

impl DocumentHandler {
    pub fn new(
        upload_use_case: Arc<UploadDocumentUseCase>,
        embed_use_case: Arc<EmbedDocumentUseCase>,
        list_use_case: Arc<ListDocumentsUseCase>,
        delete_use_case: Arc<DeleteDocumentUseCase>,
    ) -> Self {
        Self {
            upload_use_case,
            embed_use_case,
            list_use_case,
            delete_use_case,
        }
    }

    pub async fn upload_document(
        State(handler): State<Arc<DocumentHandler>>,
        mut multipart: Multipart,
    ) -> Result<impl IntoResponse, StatusCode> {
        let mut filename: Option<String> = None;
        let mut data: Option<Vec<u8>> = None;
        let mut session_id: Option<String> = None;

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|_| StatusCode::BAD_REQUEST)?
        {
            match field.name() {
                Some("session_id") => {
                    let value = field.text().await.map_err(|_| StatusCode::BAD_REQUEST)?;
                    if !value.trim().is_empty() {
                        session_id = Some(value.trim().to_string());
                    }
                }
                _ => {
                    if let Some(name) = field.file_name() {
                        filename = Some(name.to_string());
                        data = Some(
                            field
                                .bytes()
                                .await
                                .map_err(|_| StatusCode::BAD_REQUEST)?
                                .to_vec(),
                        );
                    }
                }
            }
        }

        let (filename, data) = match (filename, data) {
            (Some(filename), Some(data)) => (filename, data),
            _ => {
                return Ok((
                    StatusCode::BAD_REQUEST,
                    Json(ApiResponse::<UploadResponseDto>::error(
                        "NO_FILE_PROVIDED",
                        "No file provided in the request".to_string(),
                        None,
                    )),
                ));
            }
        };

        let request = UploadDocumentRequest {
            filename,
            data,
            session_id,
        };

        match handler.upload_use_case.execute(request).await {
            Ok(response) => Ok((
                StatusCode::CREATED,
                Json(ApiResponse::success(UploadResponseDto::from(response))),
            )),
            Err(e) => {
                let (status, code) = match &e {
                    UploadDocumentError::ValidationError(_) => {
                        (StatusCode::BAD_REQUEST, "VALIDATION_ERROR")
                    }
                    UploadDocumentError::SessionNotFound(_) => {
                        (StatusCode::NOT_FOUND, "SESSION_NOT_FOUND")
                    }
                    UploadDocumentError::DuplicateDocument(_) => {
                        (StatusCode::CONFLICT, "DUPLICATE_DOCUMENT")
                    }
                    UploadDocumentError::ExtractionError(_) => {
                        (StatusCode::UNPROCESSABLE_ENTITY, "EXTRACTION_FAILED")
                    }
                    UploadDocumentError::RepositoryError(_) => {
                        (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
                    }
                };
                Ok((status, Json(ApiResponse::error(code, e.to_string(), None))))
            }
        }
    }

    pub async fn embed_document(
        State(handler): State<Arc<DocumentHandler>>,
        Json(request): Json<EmbedRequestDto>,
    ) -> Result<impl IntoResponse, StatusCode> {
        let document_type_override = match request.document_type.as_deref() {
            Some(raw) => match DocumentType::parse(raw) {
                Ok(document_type) => Some(document_type),
                Err(e) => {
                    return Ok((
                        StatusCode::BAD_REQUEST,
                        Json(ApiResponse::<EmbedResponseDto>::error(
                            "INVALID_DOCUMENT_TYPE",
                            e,
                            None,
                        )),
                    ));
                }
            },
            None => None,
        };

        let embed_request = EmbedDocumentRequest {
            document_id: request.document_id,
            document_type_override,
        };

        match handler.embed_use_case.execute(embed_request).await {
            Ok(response) => Ok((
                StatusCode::OK,
                Json(ApiResponse::success(EmbedResponseDto::from(response))),
            )),
            Err(e) => {
                let (status, code) = match &e {
                    EmbedDocumentError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
                    EmbedDocumentError::ValidationError(_) => {
                        (StatusCode::BAD_REQUEST, "VALIDATION_ERROR")
                    }
                    EmbedDocumentError::UpstreamTimeout(_) => {
                        (StatusCode::GATEWAY_TIMEOUT, "UPSTREAM_TIMEOUT")
                    }
                    EmbedDocumentError::UpstreamError(_) => {
                        (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR")
                    }
                    EmbedDocumentError::RepositoryError(_) => {
                        (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
                    }
                };
                Ok((status, Json(ApiResponse::error(code, e.to_string(), None))))
            }
        }
    }

    pub async fn list_documents(
        State(handler): State<Arc<DocumentHandler>>,
        Query(params): Query<ListDocumentsQueryDto>,
    ) -> Result<impl IntoResponse, StatusCode> {
        let request = ListDocumentsRequest {
            session_id: params.session_id,
        };

        match handler.list_use_case.execute(request).await {
            Ok(response) => {
                let dto = DocumentListResponseDto {
                    total: response.total,
                    documents: response
                        .documents
                        .into_iter()
                        .map(DocumentSummaryDto::from)
                        .collect(),
                };
                Ok((StatusCode::OK, Json(ApiResponse::success(dto))))
            }
            Err(e) => Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<DocumentListResponseDto>::error(
                    "LIST_FAILED",
                    e.to_string(),
                    None,
                )),
            )),
        }
    }

    pub async fn delete_document(
        State(handler): State<Arc<DocumentHandler>>,
        Path(document_id): Path<Uuid>,
    ) -> Result<impl IntoResponse, StatusCode> {
        let request = DeleteDocumentRequest { document_id };

        match handler.delete_use_case.execute(request).await {
            Ok(response) => {
                let dto = DeleteDocumentResponseDto {
                    document_id: response.document_id,
                    vectors_deleted: response.vectors_deleted,
                    message: "Document deleted successfully".to_string(),
                };
                Ok((StatusCode::OK, Json(ApiResponse::success(dto))))
            }
            Err(e) => {
                let (status, code) = match &e {
                    DeleteDocumentError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
                    DeleteDocumentError::UpstreamTimeout(_) => {
                        (StatusCode::GATEWAY_TIMEOUT, "UPSTREAM_TIMEOUT")
                    }
                    DeleteDocumentError::UpstreamError(_) => {
                        (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR")
                    }
                    DeleteDocumentError::RepositoryError(_) => {
                        (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
                    }
                };
                Ok((status, Json(ApiResponse::error(code, e.to_string(), None))))
            }
        }
    }
}
