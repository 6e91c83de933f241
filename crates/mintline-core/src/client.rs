//! HTTP client for the Mintline API
//!
//! Thin wrapper over `reqwest::Client` that owns the base URL and the bearer
//! credential. Cheap to clone; clones share the connection pool.

use reqwest::{Client, Method, RequestBuilder};

use crate::config::Config;
use crate::error::Result;

#[derive(Clone)]
pub struct ApiClient {
    http_client: Client,
    base_url: String,
    api_key: String,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a new client
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Create from resolved configuration. Fails when no credential is set.
    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = config.require_api_key()?;
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http_client: builder.build()?,
            base_url: config.api_url.clone(),
            api_key: api_key.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for an API path (path must start with `/`)
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Start a request with the bearer credential attached
    pub fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.http_client
            .request(method, url)
            .bearer_auth(&self.api_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_url_joins_base_and_path() {
        let client = ApiClient::new("https://api.mintline.ai/", "key");
        assert_eq!(client.base_url(), "https://api.mintline.ai");
        assert_eq!(
            client.url("/api/receipts"),
            "https://api.mintline.ai/api/receipts"
        );
    }

    #[test]
    fn test_from_config_requires_key() {
        assert!(ApiClient::from_config(&Config::default()).is_err());

        let config = Config {
            api_key: Some("secret".into()),
            timeout: Some(Duration::from_secs(5)),
            ..Config::default()
        };
        let client = ApiClient::from_config(&config).unwrap();
        assert_eq!(client.base_url(), crate::config::DEFAULT_API_URL);
    }

    #[test]
    fn test_debug_hides_credential() {
        let client = ApiClient::new("http://localhost", "super-secret");
        let debug = format!("{:?}", client);
        assert!(!debug.contains("super-secret"));
    }
}
