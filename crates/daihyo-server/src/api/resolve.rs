//! Resolution handlers: plain JSON, and JSON plus a record-store write.

use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};

use daihyo_core::{CoreError, ResolutionResult, ShopQuery};
use daihyo_pipeline::Resolver;
use daihyo_sheets::{RowHighlight, SheetTarget, SheetsClient};

use super::{ApiError, AppState};
use crate::middleware::RequestId;

#[derive(Debug, Deserialize)]
pub(super) struct ResolveRequest {
    #[serde(default)]
    shopname: Option<String>,
    #[serde(default)]
    shopaddress: Option<String>,
    /// Oracle API key, caller-supplied per request.
    #[serde(default)]
    key: Option<String>,
    /// Optional oracle model override.
    #[serde(default)]
    model: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ResolveSheetRequest {
    #[serde(default)]
    shopname: Option<String>,
    #[serde(default)]
    shopaddress: Option<String>,
    #[serde(default)]
    key: Option<String>,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    spreadsheet_id: Option<String>,
    #[serde(default)]
    sheet: Option<String>,
    #[serde(default)]
    row: Option<u32>,
    /// OAuth2 access token for the record store.
    #[serde(default)]
    access_token: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct ResolveSheetResponse {
    #[serde(flatten)]
    result: ResolutionResult,
    sheet_write: SheetWriteStatus,
}

#[derive(Debug, Serialize)]
pub(super) struct SheetWriteStatus {
    status: &'static str,
    row: u32,
    range: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// `POST /api/v1/resolve` — run one resolution and return the record.
pub(super) async fn run_resolution(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<ResolveRequest>,
) -> Result<Json<ResolutionResult>, ApiError> {
    let (query, key) = validate_resolve_inputs(
        &req_id.0,
        body.shopname.as_deref(),
        body.shopaddress.as_deref(),
        body.key.as_deref(),
    )?;

    let resolver = build_resolver(&state, &req_id.0, &key, body.model.as_deref())?;
    let result = resolver.resolve(&query).await;
    log_summary(&result);
    Ok(Json(result))
}

/// `POST /api/v1/resolve/sheet` — resolve, then persist the six derived
/// fields at the caller-specified sheet coordinate.
///
/// A record-store failure after a completed resolution is reported in the
/// response body, not as an HTTP error: the resolution itself succeeded.
pub(super) async fn run_resolution_to_sheet(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<ResolveSheetRequest>,
) -> Result<Json<ResolveSheetResponse>, ApiError> {
    let (query, key) = validate_resolve_inputs(
        &req_id.0,
        body.shopname.as_deref(),
        body.shopaddress.as_deref(),
        body.key.as_deref(),
    )?;

    let spreadsheet_id = require_field(&req_id.0, body.spreadsheet_id.as_deref(), "spreadsheet_id")?;
    let sheet = require_field(&req_id.0, body.sheet.as_deref(), "sheet")?;
    let access_token = require_field(&req_id.0, body.access_token.as_deref(), "access_token")?;
    let row = match body.row {
        Some(row) if row >= 1 => row,
        _ => {
            return Err(ApiError::new(
                req_id.0,
                "validation_error",
                "row must be a positive row number",
            ))
        }
    };

    let sheets = SheetsClient::with_base_url(
        state.config.sheets_timeout_secs,
        &state.config.sheets_base_url,
    )
    .map_err(|e| {
        tracing::error!(error = %e, "sheets client construction failed");
        ApiError::new(&*req_id.0, "internal_error", "record store unavailable")
    })?;
    let target = SheetTarget {
        spreadsheet_id,
        sheet,
        row,
    };

    // Mark the row before the slow part so watchers see it in flight.
    if let Err(e) = sheets
        .highlight_row(&access_token, &target, RowHighlight::InProgress)
        .await
    {
        tracing::warn!(error = %e, row, "in-progress highlight failed — continuing");
    }

    let resolver = build_resolver(&state, &req_id.0, &key, body.model.as_deref())?;
    let result = resolver.resolve(&query).await;
    log_summary(&result);

    let range = format!("C{row}:H{row}");
    let sheet_write = match sheets.write_result(&access_token, &target, &result).await {
        Ok(()) => {
            if let Err(e) = sheets
                .highlight_row(&access_token, &target, RowHighlight::Done)
                .await
            {
                tracing::warn!(error = %e, row, "done highlight failed");
            }
            SheetWriteStatus {
                status: "success",
                row,
                range,
                error: None,
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, row, "record-store write failed");
            SheetWriteStatus {
                status: "failed",
                row,
                range,
                error: Some(e.to_string()),
            }
        }
    };

    Ok(Json(ResolveSheetResponse {
        result,
        sheet_write,
    }))
}

fn validate_resolve_inputs(
    req_id: &str,
    shopname: Option<&str>,
    shopaddress: Option<&str>,
    key: Option<&str>,
) -> Result<(ShopQuery, String), ApiError> {
    let query = ShopQuery::new(shopname.unwrap_or(""), shopaddress.unwrap_or("")).map_err(
        |e: CoreError| ApiError::new(req_id, "validation_error", e.to_string()),
    )?;
    let key = require_field(req_id, key, "key")?;
    Ok((query, key))
}

fn require_field(req_id: &str, value: Option<&str>, field: &str) -> Result<String, ApiError> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
        .ok_or_else(|| {
            ApiError::new(
                req_id,
                "validation_error",
                format!("missing required field: {field}"),
            )
        })
}

fn build_resolver(
    state: &AppState,
    req_id: &str,
    key: &str,
    model: Option<&str>,
) -> Result<Resolver, ApiError> {
    Resolver::from_app_config(&state.config, key, model).map_err(|e| {
        tracing::error!(error = %e, "resolver construction failed");
        ApiError::new(req_id, "internal_error", "resolver construction failed")
    })
}

fn log_summary(result: &ResolutionResult) {
    tracing::info!(
        shopname = %result.shopname,
        shopaddress = %result.shopaddress,
        company_name = result.company_name.as_deref().unwrap_or("-"),
        representative = result.representative.as_deref().unwrap_or("-"),
        representative_title = result.representative_title.as_deref().unwrap_or("-"),
        invoice_number = result.invoice_number.as_ref().map_or("-", |n| n.as_str()),
        route = %result.route,
        source_url = result.source_url.as_deref().unwrap_or("-"),
        "resolution summary"
    );
}
