pub mod chunk_model;
pub mod document_model;
pub mod session_model;

pub use chunk_model::{ChunkModel, NewChunkModel};
pub use document_model::{DocumentModel, NewDocumentModel};
pub use session_model::{NewSessionModel, SessionModel};
