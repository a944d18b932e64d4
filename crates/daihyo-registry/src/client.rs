//! HTTP client for the national corporate-number registry.

use std::time::Duration;

use regex::Regex;
use reqwest::{Client, Url};
use serde::Serialize;

use crate::error::RegistryError;

const DEFAULT_BASE_URL: &str = "https://www.houjin-bangou.nta.go.jp";

/// What the registry knows about one registration number.
///
/// `company_name: None` with a populated `registration_number` is a partial
/// success: the page loaded but its layout did not yield the name field.
#[derive(Debug, Clone, Serialize)]
pub struct RegistryRecord {
    pub company_name: Option<String>,
    pub registration_number: String,
    /// The registry page does not publish a representative; this stays
    /// `None` and exists so the record mirrors what callers consume.
    pub representative: Option<String>,
    pub source_url: String,
}

/// Derives the numeric registry key: every digit of `code`, in order.
///
/// `"T1234567890123"` becomes `"1234567890123"`. Returns `None` when the
/// code carries no digits at all.
#[must_use]
pub fn registry_key(code: &str) -> Option<String> {
    let digits: String = code.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        None
    } else {
        Some(digits)
    }
}

/// Client for the registry's change-history page, from which the current
/// entity name is read.
pub struct RegistryClient {
    client: Client,
    base_url: Url,
}

impl RegistryClient {
    /// Creates a client pointed at the production registry.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64) -> Result<Self, RegistryError> {
        Self::with_base_url(timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`RegistryError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn with_base_url(timeout_secs: u64, base_url: &str) -> Result<Self, RegistryError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("Mozilla/5.0")
            .build()?;

        let base_url =
            Url::parse(base_url).map_err(|e| RegistryError::InvalidBaseUrl {
                base_url: base_url.to_owned(),
                reason: e.to_string(),
            })?;

        Ok(Self { client, base_url })
    }

    /// Looks up a registration code in the registry.
    ///
    /// The code is reduced to its digits first; an all-non-digit code fails
    /// immediately without any network traffic.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::EmptyRegistryKey`] — no digits in `code`.
    /// - [`RegistryError::Http`] / [`RegistryError::UnexpectedStatus`] — the
    ///   page could not be fetched.
    pub async fn lookup(&self, code: &str) -> Result<RegistryRecord, RegistryError> {
        let Some(key) = registry_key(code) else {
            return Err(RegistryError::EmptyRegistryKey {
                code: code.to_owned(),
            });
        };

        let url = self.build_url(&key);
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RegistryError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let html = response.text().await?;
        let company_name = extract_company_name(&html);
        if company_name.is_none() {
            tracing::warn!(
                registration_number = %key,
                "registry page loaded but the entity-name field was not found"
            );
        }

        Ok(RegistryRecord {
            company_name,
            registration_number: key,
            representative: None,
            source_url: url.to_string(),
        })
    }

    fn build_url(&self, key: &str) -> Url {
        let mut url = self.base_url.clone();
        url.set_path("henkorireki-johoto.html");
        url.query_pairs_mut().append_pair("selHouzinNo", key);
        url
    }
}

/// Extracts the entity name from its fixed position on the registry page:
/// the second `<dd>` of the first definition list.
fn extract_company_name(html: &str) -> Option<String> {
    let dl_re = Regex::new(r"(?is)<dl\b[^>]*>(.*?)</dl>").expect("valid dl regex");
    let dd_re = Regex::new(r"(?is)<dd\b[^>]*>(.*?)</dd>").expect("valid dd regex");

    let first_dl = dl_re.captures(html)?.get(1)?.as_str();
    let second_dd = dd_re.captures_iter(first_dl).nth(1)?.get(1)?.as_str();

    let name = clean_fragment(second_dd);
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

/// Strips any nested markup from a field fragment and collapses whitespace.
fn clean_fragment(fragment: &str) -> String {
    let tag_re = Regex::new(r"(?s)<[^>]+>").expect("valid tag regex");
    let text = tag_re.replace_all(fragment, " ");
    let text = text
        .replace("&nbsp;", " ")
        .replace("&amp;", "&");
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_key_strips_prefix_preserving_digit_order() {
        assert_eq!(
            registry_key("T1234567890123").as_deref(),
            Some("1234567890123")
        );
    }

    #[test]
    fn registry_key_collects_scattered_digits_in_order() {
        assert_eq!(registry_key("a1b2c3").as_deref(), Some("123"));
    }

    #[test]
    fn registry_key_without_digits_is_none() {
        assert_eq!(registry_key("Unknown"), None);
        assert_eq!(registry_key(""), None);
    }

    #[test]
    fn extract_company_name_reads_second_dd_of_first_dl() {
        let html = "<html><body><main><dl>\
                    <dt>法人番号</dt><dd>1234567890123</dd>\
                    <dt>商号又は名称</dt><dd>株式会社太郎フーズ</dd>\
                    </dl>\
                    <dl><dt>other</dt><dd>ignored</dd><dt>x</dt><dd>also ignored</dd></dl>\
                    </main></body></html>";
        assert_eq!(
            extract_company_name(html).as_deref(),
            Some("株式会社太郎フーズ")
        );
    }

    #[test]
    fn extract_company_name_strips_nested_markup() {
        let html = "<dl><dt>a</dt><dd>1</dd><dt>b</dt><dd><span>株式会社</span> テスト</dd></dl>";
        assert_eq!(extract_company_name(html).as_deref(), Some("株式会社 テスト"));
    }

    #[test]
    fn extract_company_name_missing_field_is_none() {
        assert_eq!(extract_company_name("<dl><dd>only one</dd></dl>"), None);
        assert_eq!(extract_company_name("<p>no definition list</p>"), None);
        assert_eq!(extract_company_name("<dl><dd>1</dd><dd>   </dd></dl>"), None);
    }

    #[test]
    fn build_url_embeds_registry_key() {
        let client = RegistryClient::with_base_url(10, "http://localhost:9000").unwrap();
        let url = client.build_url("1234567890123");
        assert_eq!(
            url.as_str(),
            "http://localhost:9000/henkorireki-johoto.html?selHouzinNo=1234567890123"
        );
    }
}
