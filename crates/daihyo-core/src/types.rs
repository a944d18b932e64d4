use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Immutable input to one resolution run: the shop as listed.
///
/// Both fields are required and non-empty; [`ShopQuery::new`] rejects
/// missing input before the pipeline starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopQuery {
    pub name: String,
    pub address: String,
}

impl ShopQuery {
    /// Builds a validated query, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::MissingField`] if either field is empty after
    /// trimming.
    pub fn new(name: &str, address: &str) -> Result<Self, CoreError> {
        let name = name.trim();
        let address = address.trim();
        if name.is_empty() {
            return Err(CoreError::MissingField("shopname"));
        }
        if address.is_empty() {
            return Err(CoreError::MissingField("shopaddress"));
        }
        Ok(Self {
            name: name.to_owned(),
            address: address.to_owned(),
        })
    }
}

/// Which fallback stage produced the terminal result.
///
/// Closed set: every run ends with exactly one of these nine labels and the
/// wire format is the `snake_case` name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    /// Stage 1 found the shop's representative directly on a matched page.
    ShopDirect,
    /// The registry record for a found invoice number carried a representative.
    InvoiceOfficial,
    /// Registry gave only a company; the corporate search then found its representative.
    InvoiceCorpRepresentative,
    /// Registry gave a company but no representative could be found for it.
    InvoiceCorpOnly,
    /// No stage produced any company-identifying evidence.
    NoInfo,
    /// The company stage echoed the shop name: no distinct operator exists.
    ShopnameOnly,
    /// The resolved company string carries no legal-entity marker.
    NonCorporateCompanyName,
    /// A corporate operator was resolved but its representative was not.
    CorpWithoutRep,
    /// Both the corporate operator and its representative were resolved.
    CorpRepresentative,
}

impl Route {
    pub const ALL: [Route; 9] = [
        Route::ShopDirect,
        Route::InvoiceOfficial,
        Route::InvoiceCorpRepresentative,
        Route::InvoiceCorpOnly,
        Route::NoInfo,
        Route::ShopnameOnly,
        Route::NonCorporateCompanyName,
        Route::CorpWithoutRep,
        Route::CorpRepresentative,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Route::ShopDirect => "shop_direct",
            Route::InvoiceOfficial => "invoice_official",
            Route::InvoiceCorpRepresentative => "invoice_corp_representative",
            Route::InvoiceCorpOnly => "invoice_corp_only",
            Route::NoInfo => "no_info",
            Route::ShopnameOnly => "shopname_only",
            Route::NonCorporateCompanyName => "non_corporate_company_name",
            Route::CorpWithoutRep => "corp_without_rep",
            Route::CorpRepresentative => "corp_representative",
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A qualified-invoice-issuer registration number: `T` followed by exactly
/// 13 digits.
///
/// The only way to obtain one is [`InvoiceNumber::parse`], so a constructed
/// value is always lexically valid. Serialized as the bare string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvoiceNumber(String);

impl InvoiceNumber {
    /// Parses a raw candidate, returning `None` on any lexical mismatch.
    ///
    /// Surrounding whitespace is tolerated; anything else — wrong prefix,
    /// wrong digit count, embedded junk — is treated as absent evidence,
    /// as is the oracle's `"Unknown"` sentinel.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let digits = raw.strip_prefix('T')?;
        if digits.len() == 13 && digits.bytes().all(|b| b.is_ascii_digit()) {
            Some(Self(raw.to_owned()))
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The 13-digit registry key, with the `T` prefix stripped.
    #[must_use]
    pub fn registration_digits(&self) -> &str {
        &self.0[1..]
    }
}

impl std::fmt::Display for InvoiceNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The terminal record of one resolution run.
///
/// This is the only value that crosses the pipeline boundary outward. Field
/// names follow the public wire format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolutionResult {
    pub shopname: String,
    pub shopaddress: String,
    pub company_name: Option<String>,
    pub representative: Option<String>,
    pub representative_title: Option<String>,
    pub source_url: Option<String>,
    pub invoice_number: Option<InvoiceNumber>,
    pub route: Route,
}
