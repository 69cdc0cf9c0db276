pub mod content_hash;
pub mod document_type;
pub mod embedding_status;
pub mod scope;

pub use content_hash::ContentHash;
pub use document_type::DocumentType;
pub use embedding_status::EmbeddingStatus;
pub use scope::{ChunkMetadata, ScopePredicate};
