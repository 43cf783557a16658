//! Document fetching for catalog acquisition

/// Errors that can occur fetching the source document
#[derive(Debug, Clone, thiserror::Error)]
pub enum FetchError {
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("fetching {url} returned status {status}: {message}")]
    Status {
        url: String,
        status: u16,
        message: String,
    },
}

/// Trait for fetching the raw text of a remote document
#[async_trait::async_trait]
pub trait DocumentFetcher: Send + Sync {
    /// Fetch the document at `url` as text
    ///
    /// Non-success transport outcomes fail with [`FetchError`] carrying the
    /// status and message; they are never silently converted to empty text.
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// HTTP document fetcher
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Create a fetcher with a default client
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl DocumentFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Transport {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                message,
            });
        }

        response.text().await.map_err(|e| FetchError::Transport {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}
