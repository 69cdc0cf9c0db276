pub mod batch_dto;
pub mod document_dto;
pub mod query_dto;
pub mod response_dto;
pub mod session_dto;

pub use batch_dto::{BatchRunRequestDto, BatchRunResponseDto};
pub use document_dto::{
    DeleteDocumentResponseDto, DocumentListResponseDto, DocumentSummaryDto, EmbedRequestDto,
    EmbedResponseDto, ListDocumentsQueryDto, UploadResponseDto,
};
pub use query_dto::{QueryRequestDto, QueryResponseDto, ScoreDetailsDto};
pub use response_dto::{ApiError, ApiResponse, HealthResponseDto};
pub use session_dto::{CreateSessionRequestDto, DeleteSessionResponseDto, SessionResponseDto};
