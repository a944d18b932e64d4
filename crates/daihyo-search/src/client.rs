//! HTTP client for the ranked-link search provider.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::Deserialize;

use crate::error::SearchError;

const DEFAULT_BASE_URL: &str = "https://ecosia1-477268798017.europe-west1.run.app";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    links: Vec<String>,
}

/// Client for the search provider's `/search` endpoint.
///
/// Given a free-text query it returns a small ranked list of URLs. Use
/// [`SearchClient::new`] for production or [`SearchClient::with_base_url`]
/// to point at a mock server in tests.
pub struct SearchClient {
    client: Client,
    base_url: Url,
}

impl SearchClient {
    /// Creates a client pointed at the production search provider.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64) -> Result<Self, SearchError> {
        Self::with_base_url(timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`SearchError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn with_base_url(timeout_secs: u64, base_url: &str) -> Result<Self, SearchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("daihyo/0.1 (operator-identity)")
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| SearchError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self { client, base_url })
    }

    /// Runs one search and returns the ranked links, at most `top_n` of them.
    ///
    /// The provider already ranks and bounds its response; the local
    /// truncation only guards against an over-long reply.
    ///
    /// # Errors
    ///
    /// - [`SearchError::Http`] on network failure.
    /// - [`SearchError::UnexpectedStatus`] on a non-2xx response.
    /// - [`SearchError::Deserialize`] if the body is not the expected JSON.
    pub async fn search(&self, query: &str, top_n: usize) -> Result<Vec<String>, SearchError> {
        let url = self.build_url(query, top_n);
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        let parsed: SearchResponse =
            serde_json::from_str(&body).map_err(|e| SearchError::Deserialize {
                context: format!("search(q={query})"),
                source: e,
            })?;

        let mut links = parsed.links;
        links.truncate(top_n);
        Ok(links)
    }

    /// Builds `{base}/search?q=...&top_n=N` with percent-encoded parameters.
    fn build_url(&self, query: &str, top_n: usize) -> Url {
        let mut url = self.base_url.clone();
        url.set_path("search");
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("q", query);
            pairs.append_pair("top_n", &top_n.to_string());
        }
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(base_url: &str) -> SearchClient {
        SearchClient::with_base_url(10, base_url).expect("client construction should not fail")
    }

    #[test]
    fn build_url_constructs_correct_query_string() {
        let client = test_client("http://localhost:9000");
        let url = client.build_url("ramen", 3);
        assert_eq!(url.as_str(), "http://localhost:9000/search?q=ramen&top_n=3");
    }

    #[test]
    fn build_url_encodes_multibyte_query() {
        let client = test_client("http://localhost:9000");
        let url = client.build_url("麺や太郎 代表", 3);
        assert!(
            url.as_str().contains("top_n=3") && !url.as_str().contains(' '),
            "query must be percent-encoded: {url}"
        );
    }

    #[test]
    fn with_base_url_rejects_garbage() {
        let result = SearchClient::with_base_url(10, "not a url");
        assert!(matches!(result, Err(SearchError::InvalidBaseUrl { .. })));
    }
}
