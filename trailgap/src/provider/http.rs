//! HTTP client abstraction for testability

use std::time::Duration;

use super::types::ProviderError;

/// Trait for HTTP client operations.
///
/// This abstraction allows for dependency injection and easier testing
/// by enabling mock HTTP clients in tests.
pub trait HttpClient: Send + Sync {
    /// Performs an HTTP GET request.
    ///
    /// # Arguments
    ///
    /// * `url` - The URL to request
    ///
    /// # Returns
    ///
    /// The response body as bytes, [`ProviderError::NotFound`] for a 404,
    /// or another error for any other failure.
    fn get(&self, url: &str) -> Result<Vec<u8>, ProviderError>;
}

/// Real HTTP client implementation using reqwest.
///
/// Cloning is cheap and shares the connection pool.
#[derive(Clone)]
pub struct ReqwestClient {
    client: reqwest::blocking::Client,
}

impl ReqwestClient {
    /// Creates a new ReqwestClient with the given request timeout.
    pub fn new(timeout: Duration) -> Result<Self, ProviderError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("trailgap/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                ProviderError::HttpError(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { client })
    }
}

impl HttpClient for ReqwestClient {
    fn get(&self, url: &str) -> Result<Vec<u8>, ProviderError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| ProviderError::HttpError(format!("Request failed: {}", e)))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ProviderError::NotFound(url.to_string()));
        }
        if !status.is_success() {
            return Err(ProviderError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        response
            .bytes()
            .map(|b| b.to_vec())
            .map_err(|e| ProviderError::HttpError(format!("Failed to read response: {}", e)))
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Mock HTTP client for testing.
    ///
    /// Replays queued responses in order, then answers every further request
    /// with the fallback. Every requested URL is recorded.
    pub struct MockHttpClient {
        queued: Mutex<VecDeque<Result<Vec<u8>, ProviderError>>>,
        fallback: Result<Vec<u8>, ProviderError>,
        requests: Mutex<Vec<String>>,
    }

    impl MockHttpClient {
        pub fn new(fallback: Result<Vec<u8>, ProviderError>) -> Self {
            Self::with_sequence(Vec::new(), fallback)
        }

        pub fn with_sequence(
            queued: Vec<Result<Vec<u8>, ProviderError>>,
            fallback: Result<Vec<u8>, ProviderError>,
        ) -> Self {
            Self {
                queued: Mutex::new(queued.into()),
                fallback,
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn requests(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }

        pub fn request_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    impl HttpClient for MockHttpClient {
        fn get(&self, url: &str) -> Result<Vec<u8>, ProviderError> {
            self.requests.lock().unwrap().push(url.to_string());
            self.queued
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| self.fallback.clone())
        }
    }

    #[test]
    fn test_mock_client_success() {
        let mock = MockHttpClient::new(Ok(vec![1, 2, 3, 4]));

        let result = mock.get("http://example.com");
        assert_eq!(result.unwrap(), vec![1, 2, 3, 4]);
        assert_eq!(mock.requests(), vec!["http://example.com".to_string()]);
    }

    #[test]
    fn test_mock_client_sequence_then_fallback() {
        let mock = MockHttpClient::with_sequence(
            vec![Err(ProviderError::HttpError("Test error".to_string()))],
            Ok(vec![9]),
        );

        assert!(mock.get("http://example.com/a").is_err());
        assert_eq!(mock.get("http://example.com/b").unwrap(), vec![9]);
        assert_eq!(mock.request_count(), 2);
    }

    #[test]
    fn test_not_found_classification() {
        assert!(ProviderError::NotFound("x".to_string()).is_not_found());
        assert!(!ProviderError::HttpStatus {
            status: 503,
            url: "x".to_string()
        }
        .is_not_found());
    }

    #[test]
    fn test_reqwest_client_builds() {
        assert!(ReqwestClient::new(Duration::from_secs(5)).is_ok());
    }
}
