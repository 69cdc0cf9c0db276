pub mod document_extractors;
pub mod embedding_client;
pub mod llm_client;
pub mod remote_fetcher;
pub mod vector_index_client;

pub use document_extractors::CompositeDocumentExtractor;
pub use embedding_client::HttpEmbeddingProvider;
pub use llm_client::HttpAnswerSynthesizer;
pub use remote_fetcher::HttpRemoteFileFetcher;
pub use vector_index_client::HttpVectorIndex;
