//! Scoring: aggregates findings into a score, a label and a confidence.
//!
//! Policy:
//!
//!   - score          = min(10, Σ weight), one decimal, no deduplication
//!   - ≤ 2.0 → VERY_LOW, ≤ 4.0 → LOW, ≤ 6.0 → MODERATE, ≤ 8.0 → HIGH,
//!     else VERY_HIGH
//!   - confidence     = 0.4·parsed/total + 0.3·matched/checked
//!                      + 0.3·min(1, parsed/max(5, total)), two decimals
//!
//! Every function here is pure; identical input gives identical output.

use crate::report::model::{Classification, DetectionMetadata, RiskDetectionResult};
use crate::rules::finding::RiskFinding;
use crate::util::deterministic::sort_findings_by_severity;

pub const MAX_RISK_SCORE: f64 = 10.0;

/// Confidence reported when there are no functions or no checked patterns.
pub const NEUTRAL_CONFIDENCE: f64 = 0.5;

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Capped sum of all finding weights.
pub fn risk_score(findings: &[RiskFinding]) -> f64 {
    let total: f64 = findings.iter().map(RiskFinding::weight).sum();
    round_to(total, 1).clamp(0.0, MAX_RISK_SCORE)
}

pub fn classify(score: f64) -> Classification {
    if score <= 2.0 {
        Classification::VeryLow
    } else if score <= 4.0 {
        Classification::Low
    } else if score <= 6.0 {
        Classification::Moderate
    } else if score <= 8.0 {
        Classification::High
    } else {
        Classification::VeryHigh
    }
}

pub fn confidence(meta: &DetectionMetadata) -> f64 {
    if meta.total_functions == 0 || meta.patterns_checked == 0 {
        return NEUTRAL_CONFIDENCE;
    }

    let parsed = meta.successfully_parsed as f64;
    let total = meta.total_functions as f64;
    let parse_ratio = parsed / total;
    let match_ratio = meta.patterns_matched as f64 / meta.patterns_checked as f64;
    let coverage = (parsed / total.max(5.0)).min(1.0);

    round_to(0.4 * parse_ratio + 0.3 * match_ratio + 0.3 * coverage, 2).clamp(0.0, 1.0)
}

/// Score, classify and canonically order a complete finding set.
pub fn score(mut findings: Vec<RiskFinding>, metadata: DetectionMetadata) -> RiskDetectionResult {
    sort_findings_by_severity(&mut findings);
    let risk_score = risk_score(&findings);

    RiskDetectionResult {
        risk_score,
        classification: classify(risk_score),
        confidence: confidence(&metadata),
        findings,
        metadata,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::catalog::{RiskType, Severity};

    fn f(t: RiskType) -> RiskFinding {
        RiskFinding::new(t, "s", 1, "r")
    }

    fn meta(total: usize, parsed: usize, checked: usize, matched: usize) -> DetectionMetadata {
        DetectionMetadata {
            total_functions: total,
            successfully_parsed: parsed,
            patterns_checked: checked,
            patterns_matched: matched,
        }
    }

    #[test]
    fn empty_findings_score_zero_very_low() {
        let r = score(vec![], meta(3, 3, 18, 0));
        assert_eq!(r.risk_score, 0.0);
        assert_eq!(r.classification, Classification::VeryLow);
    }

    #[test]
    fn repeated_types_add_up() {
        let findings = vec![f(RiskType::UncheckedCall); 3];
        assert_eq!(risk_score(&findings), 3.0);
    }

    #[test]
    fn score_is_capped_at_ten() {
        let findings = vec![f(RiskType::Selfdestruct); 4];
        assert_eq!(risk_score(&findings), 10.0);
        assert_eq!(classify(risk_score(&findings)), Classification::VeryHigh);
    }

    #[test]
    fn thresholds_are_inclusive() {
        assert_eq!(classify(0.0), Classification::VeryLow);
        assert_eq!(classify(2.0), Classification::VeryLow);
        assert_eq!(classify(2.1), Classification::Low);
        assert_eq!(classify(4.0), Classification::Low);
        assert_eq!(classify(6.0), Classification::Moderate);
        assert_eq!(classify(8.0), Classification::High);
        assert_eq!(classify(8.1), Classification::VeryHigh);
    }

    #[test]
    fn confidence_defaults_to_neutral() {
        assert_eq!(confidence(&meta(0, 0, 18, 0)), NEUTRAL_CONFIDENCE);
        assert_eq!(confidence(&meta(4, 4, 0, 0)), NEUTRAL_CONFIDENCE);
    }

    #[test]
    fn confidence_formula() {
        // 0.4·1 + 0.3·(3/18) + 0.3·min(1, 2/5) = 0.4 + 0.05 + 0.12
        assert_eq!(confidence(&meta(2, 2, 18, 3)), 0.57);
        // 0.4·(8/10) + 0.3·(9/18) + 0.3·(8/10) = 0.32 + 0.15 + 0.24
        assert_eq!(confidence(&meta(10, 8, 18, 9)), 0.71);
        assert_eq!(confidence(&meta(6, 6, 18, 18)), 1.0);
    }

    #[test]
    fn findings_are_ordered_by_severity_stably() {
        let findings = vec![
            f(RiskType::OwnershipTransfer),
            f(RiskType::TxOrigin),
            f(RiskType::Selfdestruct),
            RiskFinding::new(RiskType::TxOrigin, "s", 9, "second"),
        ];
        let r = score(findings, meta(1, 1, 18, 3));
        let sevs: Vec<Severity> = r.findings.iter().map(RiskFinding::severity).collect();
        assert_eq!(
            sevs,
            vec![Severity::Critical, Severity::High, Severity::High, Severity::Low]
        );
        assert_eq!(r.findings[1].line_number, 1);
        assert_eq!(r.findings[2].line_number, 9);
    }
}
