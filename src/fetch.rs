//! HTTP access for the fallback client.
//!
//! The [`Fetcher`] trait abstracts the two things a visitor's browser does:
//! download a text document (the manifest, a directory listing) and load an
//! image. Both take a path relative to the site root. A successful image
//! load is the only evidence of existence the heuristic tier gets.
//!
//! [`HttpFetcher`] is the `reqwest` implementation. Tests substitute the
//! recording mock in [`tests::MockFetcher`].

use crate::config::ClientConfig;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Url};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },
    #[error("invalid URL {url}: {message}")]
    InvalidUrl { url: String, message: String },
    #[error("timed out loading {url}")]
    Timeout { url: String },
    #[error("{url} is not an image ({content_type})")]
    NotAnImage { url: String, content_type: String },
}

impl FetchError {
    /// True if the server answered at all, even with an error status.
    pub fn server_responded(&self) -> bool {
        matches!(self, FetchError::Status { .. } | FetchError::NotAnImage { .. })
    }
}

/// Site access as seen from a visitor's browser.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// GET a text document. Non-2xx responses are errors.
    async fn fetch_text(&self, path: &str) -> Result<String, FetchError>;

    /// Load a path as an image. `Ok` means the image exists.
    async fn load_image(&self, path: &str) -> Result<(), FetchError>;
}

/// `reqwest`-backed fetcher rooted at the site's base URL.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    base: Url,
}

impl HttpFetcher {
    /// Create a fetcher for the site at `base_url`.
    ///
    /// The base is treated as a directory: `https://example.com/site` and
    /// `https://example.com/site/` resolve paths identically.
    pub fn new(base_url: &str, config: &ClientConfig) -> Result<Self, FetchError> {
        let mut normalized = base_url.trim().to_string();
        if !normalized.ends_with('/') {
            normalized.push('/');
        }
        let base = Url::parse(&normalized).map_err(|e| FetchError::InvalidUrl {
            url: base_url.to_string(),
            message: e.to_string(),
        })?;
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| FetchError::Transport {
                url: base_url.to_string(),
                message: e.to_string(),
            })?;
        Ok(Self { client, base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Resolve a site-relative path against the base URL.
    pub fn url_for(&self, path: &str) -> Result<Url, FetchError> {
        self.base.join(path).map_err(|e| FetchError::InvalidUrl {
            url: path.to_string(),
            message: e.to_string(),
        })
    }

    async fn get(&self, path: &str) -> Result<reqwest::Response, FetchError> {
        let url = self.url_for(path)?;
        debug!(url = %url, "GET");
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| transport_error(url.as_str(), e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response)
    }
}

fn transport_error(url: &str, e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Transport {
            url: url.to_string(),
            message: e.to_string(),
        }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch_text(&self, path: &str) -> Result<String, FetchError> {
        let response = self.get(path).await?;
        let url = response.url().to_string();
        response.text().await.map_err(|e| transport_error(&url, e))
    }

    async fn load_image(&self, path: &str) -> Result<(), FetchError> {
        let response = self.get(path).await?;
        // Servers that send no content type get the benefit of the doubt.
        if let Some(content_type) = response.headers().get(CONTENT_TYPE) {
            let content_type = content_type.to_str().unwrap_or_default().to_lowercase();
            if !content_type.starts_with("image/") {
                return Err(FetchError::NotAnImage {
                    url: response.url().to_string(),
                    content_type,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Recorded fetcher call.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum RecordedRequest {
        Text(String),
        Image(String),
    }

    /// In-memory site. Unknown paths answer 404; an offline mock fails
    /// every request with a transport error.
    #[derive(Default)]
    pub struct MockFetcher {
        pages: HashMap<String, String>,
        images: HashMap<String, Duration>,
        offline: bool,
        pub requests: Mutex<Vec<RecordedRequest>>,
    }

    impl MockFetcher {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn page(mut self, path: &str, body: &str) -> Self {
            self.pages.insert(path.to_string(), body.to_string());
            self
        }

        pub fn image(self, path: &str) -> Self {
            self.slow_image(path, Duration::ZERO)
        }

        /// An image that takes `delay` to load.
        pub fn slow_image(mut self, path: &str, delay: Duration) -> Self {
            self.images.insert(path.to_string(), delay);
            self
        }

        pub fn offline(mut self) -> Self {
            self.offline = true;
            self
        }

        pub fn get_requests(&self) -> Vec<RecordedRequest> {
            self.requests.lock().unwrap().clone()
        }

        pub fn text_requests(&self) -> Vec<String> {
            self.get_requests()
                .into_iter()
                .filter_map(|r| match r {
                    RecordedRequest::Text(p) => Some(p),
                    RecordedRequest::Image(_) => None,
                })
                .collect()
        }

        pub fn image_requests(&self) -> Vec<String> {
            self.get_requests()
                .into_iter()
                .filter_map(|r| match r {
                    RecordedRequest::Image(p) => Some(p),
                    RecordedRequest::Text(_) => None,
                })
                .collect()
        }

        fn check_online(&self, path: &str) -> Result<(), FetchError> {
            if self.offline {
                return Err(FetchError::Transport {
                    url: path.to_string(),
                    message: "connection refused".to_string(),
                });
            }
            Ok(())
        }

        fn not_found(path: &str) -> FetchError {
            FetchError::Status {
                url: path.to_string(),
                status: 404,
            }
        }
    }

    #[async_trait]
    impl Fetcher for MockFetcher {
        async fn fetch_text(&self, path: &str) -> Result<String, FetchError> {
            self.requests
                .lock()
                .unwrap()
                .push(RecordedRequest::Text(path.to_string()));
            self.check_online(path)?;
            self.pages
                .get(path)
                .cloned()
                .ok_or_else(|| Self::not_found(path))
        }

        async fn load_image(&self, path: &str) -> Result<(), FetchError> {
            self.requests
                .lock()
                .unwrap()
                .push(RecordedRequest::Image(path.to_string()));
            self.check_online(path)?;
            match self.images.get(path) {
                Some(delay) => {
                    if !delay.is_zero() {
                        tokio::time::sleep(*delay).await;
                    }
                    Ok(())
                }
                None => Err(Self::not_found(path)),
            }
        }
    }

    #[test]
    fn base_url_gets_trailing_slash() {
        let fetcher = HttpFetcher::new("https://example.com/site", &ClientConfig::default()).unwrap();
        assert_eq!(fetcher.base().as_str(), "https://example.com/site/");
        assert_eq!(
            fetcher.url_for("manifest.json").unwrap().as_str(),
            "https://example.com/site/manifest.json"
        );
    }

    #[test]
    fn url_for_encodes_spaces_and_arabic() {
        let fetcher = HttpFetcher::new("http://localhost:8000/", &ClientConfig::default()).unwrap();
        let url = fetcher.url_for("Gallery/Villa Compound-فيلا/1.jpg").unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8000/Gallery/Villa%20Compound-%D9%81%D9%8A%D9%84%D8%A7/1.jpg"
        );
    }

    #[test]
    fn url_for_keeps_existing_escapes() {
        let fetcher = HttpFetcher::new("http://localhost:8000", &ClientConfig::default()).unwrap();
        let url = fetcher.url_for("Gallery/Villa%20Two/").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/Gallery/Villa%20Two/");
    }

    #[test]
    fn invalid_base_url_is_error() {
        let result = HttpFetcher::new("not a url", &ClientConfig::default());
        assert!(matches!(result, Err(FetchError::InvalidUrl { .. })));
    }

    #[test]
    fn server_responded_classification() {
        let status = FetchError::Status {
            url: "x".into(),
            status: 404,
        };
        let refused = FetchError::Transport {
            url: "x".into(),
            message: "refused".into(),
        };
        let timeout = FetchError::Timeout { url: "x".into() };
        assert!(status.server_responded());
        assert!(!refused.server_responded());
        assert!(!timeout.server_responded());
    }

    #[tokio::test]
    async fn mock_records_requests_in_order() {
        let mock = MockFetcher::new().page("manifest.json", "{}").image("a.jpg");
        assert!(mock.fetch_text("manifest.json").await.is_ok());
        assert!(mock.load_image("b.jpg").await.is_err());
        assert!(mock.load_image("a.jpg").await.is_ok());
        assert_eq!(
            mock.get_requests(),
            vec![
                RecordedRequest::Text("manifest.json".into()),
                RecordedRequest::Image("b.jpg".into()),
                RecordedRequest::Image("a.jpg".into()),
            ]
        );
    }
}
