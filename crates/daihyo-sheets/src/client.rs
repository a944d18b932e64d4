//! HTTP client for the Sheets REST API.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::json;

use daihyo_core::ResolutionResult;

use crate::error::SheetsError;

const DEFAULT_BASE_URL: &str = "https://sheets.googleapis.com";

/// The single "not found" marker written in place of any null/unknown value.
pub const NOT_FOUND_SENTINEL: &str = "不明";

/// Where one record lands: spreadsheet, sheet title, 1-based row.
#[derive(Debug, Clone)]
pub struct SheetTarget {
    pub spreadsheet_id: String,
    pub sheet: String,
    pub row: u32,
}

/// Row highlight states of the write protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowHighlight {
    /// Light red: a resolution for this row is in flight.
    InProgress,
    /// White: the row has been written.
    Done,
}

impl RowHighlight {
    fn rgb(self) -> (f64, f64, f64) {
        match self {
            RowHighlight::InProgress => (1.0, 0.8, 0.8),
            RowHighlight::Done => (1.0, 1.0, 1.0),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetMeta>,
}

#[derive(Debug, Deserialize)]
struct SheetMeta {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
struct SheetProperties {
    #[serde(rename = "sheetId")]
    sheet_id: i64,
    title: String,
}

/// Coerces the six derived fields to their persisted strings, applying the
/// sentinel to anything absent or carrying an absence-marker value.
#[must_use]
pub fn record_values(result: &ResolutionResult) -> [String; 6] {
    [
        coerce(result.company_name.as_deref()),
        coerce(result.representative.as_deref()),
        coerce(result.representative_title.as_deref()),
        coerce(result.invoice_number.as_ref().map(|n| n.as_str())),
        result.route.as_str().to_owned(),
        coerce(result.source_url.as_deref()),
    ]
}

fn coerce(value: Option<&str>) -> String {
    match value {
        None => NOT_FOUND_SENTINEL.to_owned(),
        Some(raw) => {
            let trimmed = raw.trim();
            let lower = trimmed.to_lowercase();
            if trimmed.is_empty() || matches!(lower.as_str(), "unknown" | "false" | "none" | "null")
            {
                NOT_FOUND_SENTINEL.to_owned()
            } else {
                trimmed.to_owned()
            }
        }
    }
}

/// Client for the record store.
///
/// Auth is a caller-supplied OAuth2 access token passed per call; the client
/// holds no credentials.
pub struct SheetsClient {
    client: Client,
    base_url: Url,
}

impl SheetsClient {
    /// Creates a client pointed at the production API.
    ///
    /// # Errors
    ///
    /// Returns [`SheetsError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64) -> Result<Self, SheetsError> {
        Self::with_base_url(timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`SheetsError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`SheetsError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn with_base_url(timeout_secs: u64, base_url: &str) -> Result<Self, SheetsError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("daihyo/0.1 (operator-identity)")
            .build()?;

        let base_url = Url::parse(base_url).map_err(|e| SheetsError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self { client, base_url })
    }

    /// Writes the six derived fields to `C{row}:H{row}` of the target sheet.
    ///
    /// # Errors
    ///
    /// Returns [`SheetsError::Http`] / [`SheetsError::Api`] if the API call
    /// fails.
    pub async fn write_result(
        &self,
        access_token: &str,
        target: &SheetTarget,
        result: &ResolutionResult,
    ) -> Result<(), SheetsError> {
        let range = format!("{}!C{}:H{}", target.sheet, target.row, target.row);
        let mut url = self.base_url.clone();
        url.set_path(&format!(
            "v4/spreadsheets/{}/values/{range}",
            target.spreadsheet_id
        ));
        url.query_pairs_mut()
            .append_pair("valueInputOption", "RAW");

        let body = json!({
            "range": range,
            "majorDimension": "ROWS",
            "values": [record_values(result)],
        });

        let response = self
            .client
            .put(url.clone())
            .bearer_auth(access_token)
            .json(&body)
            .send()
            .await?;
        Self::check_status(response).await
    }

    /// Paints `A{row}:H{row}` with the highlight color for the given state.
    ///
    /// # Errors
    ///
    /// Returns [`SheetsError::SheetNotFound`] if the sheet title does not
    /// exist in the spreadsheet, or an API/transport error otherwise.
    pub async fn highlight_row(
        &self,
        access_token: &str,
        target: &SheetTarget,
        highlight: RowHighlight,
    ) -> Result<(), SheetsError> {
        let sheet_id = self
            .resolve_sheet_id(access_token, &target.spreadsheet_id, &target.sheet)
            .await?;

        let (red, green, blue) = highlight.rgb();
        let body = json!({
            "requests": [{
                "repeatCell": {
                    "range": {
                        "sheetId": sheet_id,
                        "startRowIndex": target.row - 1,
                        "endRowIndex": target.row,
                        "startColumnIndex": 0,
                        "endColumnIndex": 8,
                    },
                    "cell": {
                        "userEnteredFormat": {
                            "backgroundColor": { "red": red, "green": green, "blue": blue }
                        }
                    },
                    "fields": "userEnteredFormat.backgroundColor",
                }
            }]
        });

        let mut url = self.base_url.clone();
        url.set_path(&format!(
            "v4/spreadsheets/{}:batchUpdate",
            target.spreadsheet_id
        ));

        let response = self
            .client
            .post(url)
            .bearer_auth(access_token)
            .json(&body)
            .send()
            .await?;
        Self::check_status(response).await
    }

    /// Resolves a sheet title to its numeric sheet ID via the metadata
    /// endpoint (grid-range requests address sheets by ID, not title).
    async fn resolve_sheet_id(
        &self,
        access_token: &str,
        spreadsheet_id: &str,
        title: &str,
    ) -> Result<i64, SheetsError> {
        let mut url = self.base_url.clone();
        url.set_path(&format!("v4/spreadsheets/{spreadsheet_id}"));
        url.query_pairs_mut()
            .append_pair("fields", "sheets.properties");

        let response = self
            .client
            .get(url.clone())
            .bearer_auth(access_token)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(SheetsError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let meta: SpreadsheetMeta =
            serde_json::from_str(&body).map_err(|e| SheetsError::Deserialize {
                context: url.to_string(),
                source: e,
            })?;

        meta.sheets
            .into_iter()
            .map(|s| s.properties)
            .find(|p| p.title == title)
            .map(|p| p.sheet_id)
            .ok_or_else(|| SheetsError::SheetNotFound {
                title: title.to_owned(),
            })
    }

    async fn check_status(response: reqwest::Response) -> Result<(), SheetsError> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await?;
        Err(SheetsError::Api {
            status: status.as_u16(),
            body,
        })
    }
}
