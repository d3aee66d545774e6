//! Deterministic ordering helpers.
//!
//! Ordering here is part of the report contract: identical inputs always
//! produce identical outputs, regardless of detector scheduling.

use crate::detectors::DetectorKind;
use crate::rules::finding::RiskFinding;

/// Stable sort by severity, most severe first.
///
/// Findings of equal severity keep their incoming order, which is detector
/// order followed by each detector's own emission order.
pub fn sort_findings_by_severity(findings: &mut [RiskFinding]) {
    findings.sort_by_key(RiskFinding::severity);
}

/// Put per-detector batches into canonical `DetectorKind` order and drop
/// repeated kinds, keeping the first batch seen for each.
pub fn order_batches<T>(batches: &mut Vec<(DetectorKind, T)>) {
    batches.sort_by_key(|(kind, _)| *kind);
    batches.dedup_by_key(|(kind, _)| *kind);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::catalog::RiskType;

    fn finding(t: RiskType, line: usize) -> RiskFinding {
        RiskFinding::new(t, "x", line, "r")
    }

    #[test]
    fn severity_sort_puts_critical_first() {
        let mut findings = vec![
            finding(RiskType::MaxTxLimit, 1),
            finding(RiskType::PausableContract, 2),
            finding(RiskType::BalanceManipulation, 3),
            finding(RiskType::TxOrigin, 4),
        ];

        sort_findings_by_severity(&mut findings);

        let lines: Vec<usize> = findings.iter().map(|f| f.line_number).collect();
        assert_eq!(lines, vec![3, 4, 2, 1]);
    }

    #[test]
    fn severity_sort_is_stable_within_a_level() {
        let mut findings = vec![
            finding(RiskType::UncheckedCall, 10),
            finding(RiskType::AdjustableFees, 5),
            finding(RiskType::UncheckedCall, 1),
        ];

        sort_findings_by_severity(&mut findings);

        let lines: Vec<usize> = findings.iter().map(|f| f.line_number).collect();
        assert_eq!(lines, vec![10, 5, 1]);
    }

    #[test]
    fn batches_follow_kind_order_and_dedupe() {
        let mut batches = vec![
            (DetectorKind::Economic, "e"),
            (DetectorKind::Minting, "m1"),
            (DetectorKind::Upgrade, "u"),
            (DetectorKind::Minting, "m2"),
        ];

        order_batches(&mut batches);

        assert_eq!(
            batches,
            vec![
                (DetectorKind::Minting, "m1"),
                (DetectorKind::Upgrade, "u"),
                (DetectorKind::Economic, "e"),
            ]
        );
    }
}
