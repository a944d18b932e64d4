//! The four extraction contracts.
//!
//! Each submodule owns one instruction/schema pair: the instruction text the
//! oracle receives, the serde types its JSON reply must match, and a parser
//! that maps the reply — including its sentinel vocabulary — into typed
//! values. Parsers never fail: anything that does not match the contract is
//! absent evidence.

pub mod company;
pub mod corp_representative;
pub mod invoice;
pub mod representative;

use serde_json::Value;

/// Extracts the `result` string from a single-field reply object.
///
/// Returns `None` when the reply is not JSON, is not an object with a string
/// `result`, or when the trimmed result is empty. Sentinel interpretation
/// (e.g. `"Unknown"`, `"False"`) is each contract's own business.
pub(crate) fn result_field(raw: &str) -> Option<String> {
    let value: Value = serde_json::from_str(raw.trim()).ok()?;
    let result = value.get("result")?.as_str()?.trim();
    if result.is_empty() {
        None
    } else {
        Some(result.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_field_extracts_trimmed_string() {
        assert_eq!(
            result_field(r#"{"result": " 株式会社テスト "}"#),
            Some("株式会社テスト".to_owned())
        );
    }

    #[test]
    fn result_field_rejects_non_json() {
        assert_eq!(result_field("the company is probably Test Inc."), None);
    }

    #[test]
    fn result_field_rejects_missing_or_empty() {
        assert_eq!(result_field(r#"{"answer": "x"}"#), None);
        assert_eq!(result_field(r#"{"result": ""}"#), None);
        assert_eq!(result_field(r#"{"result": 42}"#), None);
    }
}
