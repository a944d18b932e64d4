//! Page fetcher: URL list in, cleaned bounded page texts out.

use std::time::Duration;

use reqwest::Client;
use serde::Serialize;

use crate::error::SearchError;
use crate::retry::retry_with_backoff;
use crate::text::{html_to_text, truncate_chars};

/// Upper bound on a page's cleaned text, in characters. Evidence beyond this
/// is cut before it reaches the oracle.
pub const PAGE_TEXT_MAX_CHARS: usize = 15_000;

/// One fetched evidence page: its URL and cleaned, bounded text.
///
/// Ephemeral — produced for a single pipeline stage and discarded with it.
#[derive(Debug, Clone, Serialize)]
pub struct PageDocument {
    pub url: String,
    pub text: String,
}

/// Fetches web pages and reduces them to plain text.
///
/// Identifies as a regular browser (some shop sites reject obvious bots).
/// Transient errors are retried with backoff; a page that still fails is
/// logged and dropped from the evidence set, never surfaced as an error.
pub struct PageFetcher {
    client: Client,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl PageFetcher {
    /// Creates a fetcher with the given timeout, user agent, and retry policy.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Result<Self, SearchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            max_retries,
            backoff_base_ms,
        })
    }

    /// Fetches every URL in order, skipping failures.
    ///
    /// Returns the pages that could be fetched, possibly empty. Each failure
    /// is logged with its URL and dropped — the stage proceeds with whatever
    /// evidence remains.
    pub async fn fetch_pages(&self, urls: &[String]) -> Vec<PageDocument> {
        let mut pages = Vec::with_capacity(urls.len());
        for url in urls {
            match self.fetch_page(url).await {
                Ok(page) => pages.push(page),
                Err(e) => {
                    tracing::warn!(url = %url, error = %e, "page fetch failed — dropping from evidence set");
                }
            }
        }
        pages
    }

    async fn fetch_page(&self, url: &str) -> Result<PageDocument, SearchError> {
        let body = retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            let url = url.to_owned();
            async move {
                let response = self.client.get(&url).send().await?;
                let status = response.status();
                if !status.is_success() {
                    return Err(SearchError::UnexpectedStatus {
                        status: status.as_u16(),
                        url,
                    });
                }
                Ok(response.text().await?)
            }
        })
        .await?;

        let text = truncate_chars(&html_to_text(&body), PAGE_TEXT_MAX_CHARS);
        Ok(PageDocument {
            url: url.to_owned(),
            text,
        })
    }
}

/// Concatenates pages into the numbered block the corporate prompts embed:
/// `[1] URL: ...` followed by the page text, pages separated by blank lines.
#[must_use]
pub fn format_pages_block(pages: &[PageDocument]) -> String {
    pages
        .iter()
        .enumerate()
        .map(|(i, p)| format!("[{}] URL: {}\n{}", i + 1, p.url, p.text))
        .collect::<Vec<_>>()
        .join("\n\n")
}
