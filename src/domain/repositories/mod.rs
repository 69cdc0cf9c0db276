pub mod chunk_repository;
pub mod document_repository;
pub mod session_repository;

pub use chunk_repository::ChunkRepository;
pub use document_repository::DocumentRepository;
pub use session_repository::SessionRepository;
