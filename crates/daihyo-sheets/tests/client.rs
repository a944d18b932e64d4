//! Integration tests for `SheetsClient` using wiremock HTTP mocks.

use daihyo_core::{ResolutionResult, Route};
use daihyo_sheets::{RowHighlight, SheetTarget, SheetsClient, SheetsError, NOT_FOUND_SENTINEL};
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> SheetsClient {
    SheetsClient::with_base_url(10, base_url).expect("client construction should not fail")
}

fn target() -> SheetTarget {
    SheetTarget {
        spreadsheet_id: "sheet-abc".to_owned(),
        sheet: "Research".to_owned(),
        row: 7,
    }
}

fn no_info_result() -> ResolutionResult {
    ResolutionResult {
        shopname: "麺や太郎".to_owned(),
        shopaddress: "東京都新宿区1-2-3".to_owned(),
        company_name: None,
        representative: None,
        representative_title: None,
        source_url: None,
        invoice_number: None,
        route: Route::NoInfo,
    }
}

#[tokio::test]
async fn write_result_puts_six_coerced_values() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/v4/spreadsheets/sheet-abc/values/Research!C7:H7"))
        .and(query_param("valueInputOption", "RAW"))
        .and(header("authorization", "Bearer token-123"))
        .and(body_partial_json(serde_json::json!({
            "majorDimension": "ROWS",
            "values": [[
                NOT_FOUND_SENTINEL,
                NOT_FOUND_SENTINEL,
                NOT_FOUND_SENTINEL,
                NOT_FOUND_SENTINEL,
                "no_info",
                NOT_FOUND_SENTINEL,
            ]]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    client
        .write_result("token-123", &target(), &no_info_result())
        .await
        .expect("write should succeed");
}

#[tokio::test]
async fn write_result_surfaces_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client
        .write_result("token-123", &target(), &no_info_result())
        .await;
    assert!(matches!(result, Err(SheetsError::Api { status: 403, .. })));
}

#[tokio::test]
async fn highlight_row_resolves_sheet_id_then_formats() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v4/spreadsheets/sheet-abc"))
        .and(query_param("fields", "sheets.properties"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "sheets": [
                { "properties": { "sheetId": 0, "title": "Sheet1" } },
                { "properties": { "sheetId": 417, "title": "Research" } }
            ]
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v4/spreadsheets/sheet-abc:batchUpdate"))
        .and(body_partial_json(serde_json::json!({
            "requests": [{
                "repeatCell": {
                    "range": {
                        "sheetId": 417,
                        "startRowIndex": 6,
                        "endRowIndex": 7,
                        "startColumnIndex": 0,
                        "endColumnIndex": 8
                    },
                    "fields": "userEnteredFormat.backgroundColor"
                }
            }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    client
        .highlight_row("token-123", &target(), RowHighlight::InProgress)
        .await
        .expect("highlight should succeed");
}

#[tokio::test]
async fn highlight_row_unknown_sheet_is_typed_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v4/spreadsheets/sheet-abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "sheets": [ { "properties": { "sheetId": 0, "title": "Sheet1" } } ]
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let missing = SheetTarget {
        sheet: "研究".to_owned(),
        ..target()
    };
    let result = client.highlight_row("token-123", &missing, RowHighlight::Done).await;
    assert!(matches!(
        result,
        Err(SheetsError::SheetNotFound { ref title }) if title == "研究"
    ));
}
