//! Corporate-representative contract: the current representative of one
//! named company.
//!
//! The reply is a single `result` string: a person's full name, or the
//! sentinel `"Unknown"` when no current representative can be identified.
//! [`parse_name`] maps the sentinel (case-insensitively) and malformed
//! output to `None`.

use super::result_field;

/// Sentinel the instruction mandates when no representative is identifiable.
const UNKNOWN_SENTINEL: &str = "unknown";

/// Builds the instruction, embedding the company name and the evidence block.
#[must_use]
pub fn build_instruction(company_name: &str, pages_block: &str) -> String {
    format!(
        r#"あなたは日本の法人情報を精密に解析するAIエージェントです。

以下には、法人「{company}」に関する複数のWebページから抽出されたテキストが含まれています。
これらには、会社概要・代表者挨拶・採用情報・ニュース記事・取引先の紹介など、
さまざまな情報が混在している可能性があります。

あなたの最重要ミッションは、
「法人 {company} の現在の代表者（代表取締役・代表社員・代表理事など）の氏名」を
できる限り正確に1名だけ特定することです。

---

【全体ルール（絶対遵守）】

- 想像で名前を作らないこと（補完・創作は禁止）
- 法人 {company} と無関係な人物名はすべて無視すること
- 過去の役職者・創業者・相談役・顧問が出てきても、
  現在の代表者と明確に書かれていない場合は採用しないこと
- 他社の代表者名・取引先の担当者名・インタビュー対象者の名前は採用してはいけない

---

【重要】
明らかに企業名が {company} でないページは無視すること。その代表者名も対象外である。

【代表者として採用してよい記述の例】

- 「代表取締役社長　山田太郎」
- 「代表取締役　山田太郎」
- 「代表者名：山田太郎」
- 「代表社員　山田太郎」
- 「代表理事　山田太郎」
- 「法人 {company}　代表　山田太郎」

【出力仕様】

- 代表者が特定できる場合
  → 代表者のフルネームだけを result に入れる（例："山田太郎"）
- 特定できない／情報がない場合
  → "Unknown" を result に入れる

【出力形式（必ずこのJSONだけを返す）】

{{
  "result": "string"
}}

---

【ページ内容】
{pages_block}"#,
        company = company_name,
        pages_block = pages_block,
    )
}

/// Parses the reply into the representative's name, if one was identified.
#[must_use]
pub fn parse_name(raw: &str) -> Option<String> {
    result_field(raw).filter(|name| !name.eq_ignore_ascii_case(UNKNOWN_SENTINEL))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_instruction_embeds_company_and_pages() {
        let instruction =
            build_instruction("株式会社太郎フーズ", "[1] URL: https://a.example.com\n会社概要");
        assert!(instruction.contains("法人「株式会社太郎フーズ」"));
        assert!(instruction.contains("[1] URL: https://a.example.com"));
    }

    #[test]
    fn full_name_is_returned() {
        assert_eq!(
            parse_name(r#"{"result": "山田太郎"}"#),
            Some("山田太郎".to_owned())
        );
    }

    #[test]
    fn unknown_sentinel_is_none_case_insensitively() {
        assert_eq!(parse_name(r#"{"result": "Unknown"}"#), None);
        assert_eq!(parse_name(r#"{"result": "unknown"}"#), None);
        assert_eq!(parse_name(r#"{"result": "UNKNOWN"}"#), None);
    }

    #[test]
    fn malformed_reply_is_none() {
        assert_eq!(parse_name("no structured output"), None);
        assert_eq!(parse_name(r#"{"result": "  "}"#), None);
    }
}
