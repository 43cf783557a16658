//! Mock fetcher and inference provider for testing
//!
//! Both record how often they were invoked, which is what the cache-first
//! tests assert on: a pre-populated store must leave the counters at zero.

use crate::fetch::{DocumentFetcher, FetchError};
use crate::inference::{InferenceError, InferenceProvider};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Document fetcher returning a canned outcome
pub struct MockFetcher {
    outcome: Result<String, FetchError>,
    calls: AtomicUsize,
}

impl MockFetcher {
    /// Fetcher that returns `body` for every URL
    pub fn returning(body: impl Into<String>) -> Self {
        Self {
            outcome: Ok(body.into()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Fetcher that fails every fetch with `error`
    pub fn failing(error: FetchError) -> Self {
        Self {
            outcome: Err(error),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of fetches performed
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl DocumentFetcher for MockFetcher {
    async fn fetch(&self, _url: &str) -> Result<String, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone()
    }
}

/// Inference provider returning a canned outcome
pub struct MockProvider {
    outcome: Result<String, InferenceError>,
    calls: AtomicUsize,
}

impl MockProvider {
    /// Provider that answers every prompt with `response`
    pub fn returning(response: impl Into<String>) -> Self {
        Self {
            outcome: Ok(response.into()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Provider that fails every call with `error`
    pub fn failing(error: InferenceError) -> Self {
        Self {
            outcome: Err(error),
            calls: AtomicUsize::new(0),
        }
    }

    /// Provider simulating an absent capability
    pub fn unavailable() -> Self {
        Self::failing(InferenceError::NoModelAvailable("mock".to_string()))
    }

    /// Number of inference calls performed
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl InferenceProvider for MockProvider {
    async fn infer(&self, _prompt: &str) -> Result<String, InferenceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_fetcher_counts_calls() {
        let fetcher = MockFetcher::returning("<html></html>");
        assert_eq!(fetcher.call_count(), 0);

        fetcher.fetch("https://example.com").await.unwrap();
        fetcher.fetch("https://example.com").await.unwrap();
        assert_eq!(fetcher.call_count(), 2);
    }

    #[tokio::test]
    async fn mock_fetcher_failure() {
        let fetcher = MockFetcher::failing(FetchError::Status {
            url: "https://example.com".to_string(),
            status: 503,
            message: "unavailable".to_string(),
        });

        let result = fetcher.fetch("https://example.com").await;
        assert!(matches!(result, Err(FetchError::Status { status: 503, .. })));
    }

    #[tokio::test]
    async fn mock_provider_unavailable() {
        let provider = MockProvider::unavailable();
        let result = provider.infer("prompt").await;
        assert!(matches!(result, Err(InferenceError::NoModelAvailable(_))));
        assert_eq!(provider.call_count(), 1);
    }
}
