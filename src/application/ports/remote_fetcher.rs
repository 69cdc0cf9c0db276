use async_trait::async_trait;

#[derive(Debug)]
pub enum RemoteFetchError {
    Timeout(String),
    NetworkError(String),
    InvalidUrl(String),
    HttpStatus(u16),
}

impl std::fmt::Display for RemoteFetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RemoteFetchError::Timeout(msg) => write!(f, "Fetch timeout: {}", msg),
            RemoteFetchError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            RemoteFetchError::InvalidUrl(url) => write!(f, "Invalid URL: {}", url),
            RemoteFetchError::HttpStatus(status) => write!(f, "HTTP status: {}", status),
        }
    }
}

impl std::error::Error for RemoteFetchError {}

#[derive(Debug, Clone)]
pub struct FetchedFile {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub content_type: Option<String>,
}

/// Downloads a remote document for the one-shot batch flow.
#[async_trait]
pub trait RemoteFileFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchedFile, RemoteFetchError>;
}
