//! Invoice-number contract: the qualified-invoice-issuer registration number
//! for the target shop or its operating company.
//!
//! The reply is a single `result` string expected to match the fixed lexical
//! form `T` + 13 digits, or the sentinel `"Unknown"`. Lexical validation is
//! [`daihyo_core::InvoiceNumber::parse`], so the sentinel, malformed output,
//! and near-miss strings all uniformly parse to `None`.

use daihyo_core::{InvoiceNumber, ShopQuery};

use super::result_field;

/// Builds the instruction, embedding the shop, the optional company hint,
/// and the evidence block.
#[must_use]
pub fn build_instruction(
    shop: &ShopQuery,
    company_hint: Option<&str>,
    pages_block: &str,
) -> String {
    format!(
        r#"あなたは日本の税務情報・インボイス制度に詳しいAIエージェントです。

以下には、店舗およびその運営法人に関する複数のWebページから抽出されたテキストが含まれています。
あなたのミッションは、指定された店舗/法人に対応する
「適格請求書発行事業者の登録番号（インボイス番号）」を、誤検出なく特定することです。

【対象店舗】
- 店名: {name}
- 住所: {address}

【運営法人候補】
- 法人名候補: {company}

【探すべき情報】

- 適格請求書発行事業者の登録番号
- 一般的には「T」+ 13桁の数字の形式（例：T1234567890123）
- 「登録番号」「インボイス」「適格請求書発行事業者」などの語の近くに書かれていることが多い

【絶対にやってはいけないこと】

- 店名や法人名だけから、番号を推測・創作してはいけない
- 他社のインボイス番号を、この店舗/法人の番号として流用してはいけない
- 決済代行会社・グルメサイト運営会社・不動産会社など、
  関係のない第三者企業のインボイス番号を採用してはいけない

【採用してよい例】

- 「適格請求書発行事業者登録番号：T1234567890123」
- 「登録番号 T1234567890123」
- 「当社（株式会社◯◯）のインボイス登録番号は T1234567890123 です。」

このとき、文脈上その会社が法人名候補である、
または対象店舗（{name}）を運営している会社であると判断できる場合にのみ、
その番号を result に採用してください。

【あいまいな場合の扱い】

- 複数のインボイス番号候補があり、どれが対象法人かわからない場合
- 店名・住所・法人名との対応関係がはっきりしない場合

→ 無理に番号を選ばず、"Unknown" を result にしてください。

【出力形式（必ずこのJSONだけを返す）】

{{
  "result": "string"
}}

---

【ページ内容】
{pages_block}"#,
        name = shop.name,
        address = shop.address,
        company = company_hint.unwrap_or("（不明）"),
        pages_block = pages_block,
    )
}

/// Parses the reply into a lexically valid invoice number, if present.
#[must_use]
pub fn parse_number(raw: &str) -> Option<InvoiceNumber> {
    result_field(raw).and_then(|result| InvoiceNumber::parse(&result))
}
