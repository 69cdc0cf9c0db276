use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use url::Url;

use crate::application::ports::remote_fetcher::{
    FetchedFile, RemoteFetchError, RemoteFileFetcher,
};

const FETCH_TIMEOUT_SECS: u64 = 60;
const FALLBACK_FILENAME: &str = "document.pdf";

pub struct HttpRemoteFileFetcher {
    client: Client,
}

impl HttpRemoteFileFetcher {
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
            .build()?;

        Ok(Self { client })
    }

    fn filename_from_url(url: &Url) -> String {
        url.path_segments()
            .and_then(|segments| segments.filter(|s| !s.is_empty()).next_back())
            .filter(|name| name.contains('.'))
            .map(|name| name.to_string())
            .unwrap_or_else(|| FALLBACK_FILENAME.to_string())
    }
}

#[async_trait]
impl RemoteFileFetcher for HttpRemoteFileFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedFile, RemoteFetchError> {
        let parsed = Url::parse(url).map_err(|_| RemoteFetchError::InvalidUrl(url.to_string()))?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(RemoteFetchError::InvalidUrl(url.to_string()));
        }

        let filename = Self::filename_from_url(&parsed);

        let response = self.client.get(parsed).send().await.map_err(|e| {
            if e.is_timeout() {
                RemoteFetchError::Timeout(e.to_string())
            } else {
                RemoteFetchError::NetworkError(e.to_string())
            }
        })?;

        if !response.status().is_success() {
            return Err(RemoteFetchError::HttpStatus(response.status().as_u16()));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());

        let bytes = response
            .bytes()
            .await
            .map_err(|e| RemoteFetchError::NetworkError(e.to_string()))?
            .to_vec();

        Ok(FetchedFile {
            bytes,
            filename,
            content_type,
        })
    }
}
