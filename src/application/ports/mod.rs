pub mod answer_synthesizer;
pub mod cleanup_queue;
pub mod document_extractor;
pub mod embedding_provider;
pub mod remote_fetcher;
pub mod vector_index;

pub use answer_synthesizer::AnswerSynthesizer;
pub use cleanup_queue::CleanupQueue;
pub use document_extractor::DocumentExtractor;
pub use embedding_provider::EmbeddingProvider;
pub use remote_fetcher::RemoteFileFetcher;
pub use vector_index::VectorIndex;
