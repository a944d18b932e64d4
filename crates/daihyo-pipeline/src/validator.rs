//! Candidate validation: confidence gating and entity-type classification.

use daihyo_oracle::contracts::representative::{PageJudgment, Report};

/// Minimum confidence for a direct-representative page to be trusted.
///
/// The gate is monotonic: a judgment below the threshold is rejected no
/// matter how completely its other fields are populated.
pub const REPRESENTATIVE_CONFIDENCE_THRESHOLD: f64 = 0.80;

/// Legal-entity markers. A company string containing none of these is judged
/// to be a personal trade name rather than a registered entity.
pub const CORPORATE_MARKERS: &[&str] = &[
    "株式会社",
    "合同会社",
    "有限会社",
    "医療法人",
    "社会福祉法人",
    "学校法人",
    "NPO法人",
    "特定非営利活動法人",
];

/// A representative accepted from the direct-search stage.
#[derive(Debug, Clone)]
pub struct RepresentativeCandidate {
    pub name: String,
    pub title: Option<String>,
    pub company: Option<String>,
    pub url: Option<String>,
    pub confidence: f64,
}

/// Classifies a string as a registered legal entity.
///
/// True iff the string contains at least one marker; false for empty input.
/// Pure classification — the string is never mutated.
#[must_use]
pub fn is_corporate_name(name: &str) -> bool {
    if name.is_empty() {
        return false;
    }
    CORPORATE_MARKERS.iter().any(|marker| name.contains(marker))
}

/// The acceptance rule for one page judgment: matched business, declared
/// representative info, gated confidence, and a non-empty name.
fn accept_page(page: &PageJudgment) -> bool {
    page.is_match
        && page.has_representative_info
        && page.confidence >= REPRESENTATIVE_CONFIDENCE_THRESHOLD
        && page
            .representative_name
            .as_deref()
            .is_some_and(|name| !name.trim().is_empty())
}

/// Returns the first page (in the oracle's page order) that passes the
/// acceptance rule, as a candidate.
#[must_use]
pub fn first_accepted(report: &Report) -> Option<RepresentativeCandidate> {
    report.pages.iter().find(|p| accept_page(p)).map(|page| {
        RepresentativeCandidate {
            name: page
                .representative_name
                .as_deref()
                .unwrap_or_default()
                .trim()
                .to_owned(),
            title: page.representative_title.clone(),
            company: page.company_name.clone(),
            url: page.url.clone(),
            confidence: page.confidence,
        }
    })
}
