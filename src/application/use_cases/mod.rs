pub mod batch_run;
pub mod create_session;
pub mod delete_document;
pub mod delete_session;
pub mod embed_document;
pub mod list_documents;
pub mod query_documents;
pub mod upload_document;

#[cfg(test)]
pub(crate) mod testing;

pub use batch_run::BatchRunUseCase;
pub use create_session::CreateSessionUseCase;
pub use delete_document::DeleteDocumentUseCase;
pub use delete_session::DeleteSessionUseCase;
pub use embed_document::EmbedDocumentUseCase;
pub use list_documents::ListDocumentsUseCase;
pub use query_documents::QueryDocumentsUseCase;
pub use upload_document::UploadDocumentUseCase;
