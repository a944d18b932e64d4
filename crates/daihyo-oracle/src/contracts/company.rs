//! Operating-company contract: which legal body runs the target shop?
//!
//! The reply is a single `result` string carrying a three-way decision:
//! a specific operator name, the shop name echoed back ("no distinct
//! operator"), or the sentinel `"False"` ("no page matched the shop").
//! [`parse_answer`] converts that string protocol into [`CompanyAnswer`] so
//! the pipeline never compares sentinel strings itself. Malformed output
//! parses to [`CompanyAnswer::NoMatch`].

use daihyo_core::ShopQuery;

use super::result_field;

/// Sentinel the instruction mandates when no page matches the target shop.
const NO_MATCH_SENTINEL: &str = "False";

/// The three-tier outcome of the operating-company extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompanyAnswer {
    /// A page matched the shop and explicitly named its operator.
    Operator(String),
    /// Pages matched the shop but no distinct operator is named.
    ShopItself,
    /// No page matched the target shop (or the reply was unusable).
    NoMatch,
}

/// Builds the instruction, embedding the target shop and the evidence block.
#[must_use]
pub fn build_instruction(shop: &ShopQuery, pages_block: &str) -> String {
    format!(
        r#"あなたは日本の店舗情報を「非常に厳格な基準」で精密に解析するAIエージェントです。

以下には、複数のWebページから抽出されたテキストが含まれています。
これらは必ずしも同じ店舗の情報とは限りません。
また、ページ内には無関係な法人名・サイト運営会社名・他店舗の情報が混在している可能性があります。

あなたの最重要ミッションは、
「対象店舗 *だけ* の運営法人名を、誤検出なしで特定すること」です。
あいまいな場合は、無理に法人名を決めず、ルールに従って安全側に倒れてください。

---

【対象店舗】
- 店名: {name}
- 住所: {address}

---

【全体ルール（絶対遵守）】

- 対象店舗と無関係なページ内容・法人名はすべて無視すること
- 想像で法人名を作らないこと（補完・創作は禁止）
- ページに書かれていない法人名を推測で書かないこと
- 「食べログ」「ぐるなび」「ホットペッパー」などのグルメサイト運営会社名を
  対象店舗の法人名として絶対に採用しないこと
- クレジットカード会社・決済代行業者・ビルオーナー・広告代理店などの
  第三者企業名も、対象店舗の法人名として採用してはいけない

---
【このようなページも「対象店舗に関連するページ」として扱う】

冒頭に法人名（株式会社◯◯ など）があり、
文中に対象店舗の店名（{name}）が明示されていて、
「◯◯株式会社は、◯◯店において…」という構造になっている場合、
その法人名は対象店舗の「運営会社の有力候補」として扱ってよい。
このとき住所が {address} と完全一致していなくても構わない。

=====================
【ステップ1：一致判定（最重要）】
=====================

各ページ（テキスト）ごとに、
「そのページが対象店舗 *だけ* に関する情報か」を厳密に判定してください。

以下の情報から一致度を総合的に判断します：

- 店名の一致（完全一致、表記ゆれ、「○○店」「○○本店」などの枝番表現も考慮）
- 住所の一致（都道府県・市区町村、丁目・番地・号。ビル名・フロアの違いは許容）
- 電話番号（完全一致は非常に強い一致根拠。異なる場合は別店舗の可能性が高い）
- 店舗特徴・文脈（メニュー・価格帯・営業時間・席数・口コミが矛盾していないか）

【チェーン店・同名店舗への注意】
- 同じ店名で複数の住所が出てくる場合、
  対象住所 {address} と異なる住所のページは「別店舗」とみなし、一致しないと判断すること。
- 「◯◯（新宿店）」のように支店名がある場合も、
  対象住所と一致しない店舗は一致対象から外すこと。

【ステップ1の結論】
- 対象店舗と明確に紐づくと判断できたページだけを「一致したページ」とする
- 一致しているか判断できない曖昧なページは「一致していない」とみなし、完全に無視する

一致していないページは、
そのページ内にどんな法人名が書かれていても、絶対に使ってはいけません。

=====================
【ステップ2：法人名の抽出（対象店舗に一致したページのみ）】
=====================

ステップ1で「一致した」と判断できたページの中だけを使い、
その店舗の「運営会社（法人）」に関する情報を探してください。

探すべき記述の例：
- 「運営会社：◯◯」「会社概要」「会社情報」「事業者」「法人名」「運営事業者」
- 「株式会社◯◯」「合同会社◯◯」「有限会社◯◯」「◯◯株式会社」
- 「◯◯を運営する株式会社△△」のように、店舗名と法人名が紐づいている記述

【強く採用すべきパターン】
- 法人名の近くに、対象店舗の店名（{name}）や
  「当店」「本店舗」「◯◯店」といった表現がある
- 「店舗情報」「会社概要」など、明らかにその店の運営会社を説明している箇所に法人名が書かれている

【絶対に採用してはいけない法人名の例】
- グルメサイト・予約サイト・口コミサイト・ポータルサイトの運営会社
- 決済サービス・クレジットカード会社・ポイントサービス会社
- 配送業者（○○運輸など）
- 広告代理店・制作会社（サイトを制作した会社など）
- まったく別の店舗（支店・系列店を含む）の法人名
- 単なる挨拶や取引先紹介に出てくる他社名

【複数候補がある場合の扱い】
- 対象店舗ともっとも強く結びついた法人名を 1 つだけ選んでください。
- どの法人名が対象店舗のものか明確に判断できない場合、
  「法人名は特定不能」とみなし、ステップ3のルール2または3に従ってください。

=====================
【ステップ3：最終判断】
=====================

以下のルールに従って、最終的な "result" を 1 つだけ決定してください。

1. 対象店舗に一致したページの中に、
   「対象店舗の運営会社」であると明確に判断できる法人名がある場合
   → その法人名をそのまま result に入れる

2. 対象店舗に一致したページはあるが、
   法人名の記載が見つからない、または候補が曖昧な場合
   → 店舗名（{name}）を result に入れる

3. すべてのページが対象店舗に一致しない場合
   → "False" を result に入れる

---

【出力上の厳守事項】

- 出力は以下の JSON 形式のみとすること。
- 説明文・コメント・推論過程など、JSON以外の文字列は一切出力してはいけません。

【出力形式（必ずこのJSONだけを返す）】

{{
  "result": "string"
}}

---

【ページ内容】
{pages_block}"#,
        name = shop.name,
        address = shop.address,
        pages_block = pages_block,
    )
}

/// Parses the reply into the three-tier [`CompanyAnswer`].
///
/// The shop-name comparison is exact after trimming — the instruction tells
/// the oracle to echo the name it was given, verbatim.
#[must_use]
pub fn parse_answer(raw: &str, shop_name: &str) -> CompanyAnswer {
    match result_field(raw) {
        None => CompanyAnswer::NoMatch,
        Some(result) if result == NO_MATCH_SENTINEL => CompanyAnswer::NoMatch,
        Some(result) if result == shop_name => CompanyAnswer::ShopItself,
        Some(result) => CompanyAnswer::Operator(result),
    }
}
