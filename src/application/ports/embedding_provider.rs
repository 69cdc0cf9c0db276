use async_trait::async_trait;

#[derive(Debug)]
pub enum EmbeddingProviderError {
    Timeout(String),
    NetworkError(String),
    ApiError(String),
    InvalidInput(String),
}

impl std::fmt::Display for EmbeddingProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EmbeddingProviderError::Timeout(msg) => write!(f, "Embedding timeout: {}", msg),
            EmbeddingProviderError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            EmbeddingProviderError::ApiError(msg) => write!(f, "API error: {}", msg),
            EmbeddingProviderError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
        }
    }
}

impl std::error::Error for EmbeddingProviderError {}

impl EmbeddingProviderError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, EmbeddingProviderError::Timeout(_))
    }
}

/// External embedding model. The engine never computes vectors itself.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed_text(&self, text: &str) -> Result<Vec<f32>, EmbeddingProviderError>;

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingProviderError>;

    fn embedding_dimension(&self) -> usize;
}
