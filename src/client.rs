//! Pixabay API client: the fetch primitive
//!
//! One call issues one parameterized request and either parses the body into
//! a [`SearchPage`] or absorbs the failure. Transport errors, non-2xx
//! statuses, and malformed bodies are all logged and collapsed into `None`,
//! which callers must treat as "zero hits this call". Retry policy lives
//! entirely in the caller; this layer never retries.

use crate::config::ApiConfig;
use crate::types::{SearchPage, SearchQuery};
use crate::{Error, Result};
use async_trait::async_trait;
use url::Url;

/// Request-executing capability injected into the acquisition engine.
///
/// The production implementation is [`PixabayClient`]; tests substitute
/// scripted implementations to exercise the engine without a network.
#[async_trait]
pub trait SearchApi: Send + Sync {
    /// Execute one search request.
    ///
    /// Returns `None` on any transport or response failure; failures are
    /// never propagated.
    async fn search(&self, query: &SearchQuery) -> Option<SearchPage>;
}

/// HTTP client for the Pixabay image search API.
///
/// Wraps a shared, connection-pooled [`reqwest::Client`], so a single
/// instance supports many concurrent in-flight requests — the per-color
/// fetch tasks all hold the same client.
#[derive(Debug, Clone)]
pub struct PixabayClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: String,
}

impl PixabayClient {
    /// Create a client from API configuration
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| Error::Config {
            message: format!("invalid API base URL '{}': {}", config.base_url, e),
            key: Some("api.base_url".to_string()),
        })?;

        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(Error::Network)?;

        Ok(Self {
            http,
            base_url,
            api_key: config.key.clone(),
        })
    }
}

#[async_trait]
impl SearchApi for PixabayClient {
    async fn search(&self, query: &SearchQuery) -> Option<SearchPage> {
        let per_page = query.per_page.to_string();
        let page = query.page.to_string();
        let editors_choice = if query.editors_choice { "true" } else { "false" };
        let params = [
            ("key", self.api_key.as_str()),
            ("colors", query.color.as_str()),
            ("image_type", query.content_mode.as_str()),
            ("per_page", per_page.as_str()),
            ("page", page.as_str()),
            ("editors_choice", editors_choice),
            ("lang", query.locale.as_str()),
        ];

        let response = match self
            .http
            .get(self.base_url.clone())
            .query(&params)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    color = %query.color,
                    page = query.page,
                    "HTTP client error for search request"
                );
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            tracing::error!(
                status = %status,
                color = %query.color,
                page = query.page,
                "search request rejected by API"
            );
            return None;
        }

        match response.json::<SearchPage>().await {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    color = %query.color,
                    page = query.page,
                    "failed to parse search response body"
                );
                None
            }
        }
    }
}
