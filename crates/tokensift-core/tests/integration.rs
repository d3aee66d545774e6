use proptest::prelude::*;
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

use tokensift_core::engine::{EngineConfig, RiskEngine};
use tokensift_core::report::model::{Classification, Report, RiskDetectionResult, ToolInfo};
use tokensift_core::rules::catalog::{RiskType, Severity};
use tokensift_core::source::parse::looks_like_supported_source;
use tokensift_core::source::read::source_fingerprint;
use tokensift_core::{DetectorKind, analyze};

/// Path to the fixtures directory relative to the crate root.
fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

fn load_fixture(name: &str) -> String {
    let path = fixtures_dir().join(name);
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("failed to read {name}: {e}"))
}

fn tool() -> ToolInfo {
    ToolInfo {
        name: "tokensift".into(),
        version: "0.1.0-test".into(),
        commit: None,
    }
}

/// Runs the full inspect pipeline on a fixture file.
fn inspect_fixture(name: &str) -> Report {
    tokensift_core::inspect(&fixtures_dir().join(name), tool()).expect("inspect should succeed")
}

fn types(result: &RiskDetectionResult) -> Vec<RiskType> {
    result.findings.iter().map(|f| f.risk_type).collect()
}

fn count(result: &RiskDetectionResult, t: RiskType) -> usize {
    result.findings.iter().filter(|f| f.risk_type == t).count()
}

#[test]
fn open_mint_without_cap_is_unlimited_minting() {
    let report = inspect_fixture("unlimited_mint.sol");
    let result = &report.result;

    assert_eq!(types(result), vec![RiskType::UnlimitedMinting]);
    let finding = &result.findings[0];
    assert_eq!(finding.severity(), Severity::Critical);
    assert_eq!(finding.weight(), 3.0);
    assert_eq!(finding.line_number, 8);
    assert_eq!(finding.function_name.as_deref(), Some("mint"));
    assert!(finding.code_snippet.contains("function mint(address to, uint256 amount) public {"));

    assert_eq!(result.risk_score, 3.0);
    assert_eq!(result.classification, Classification::Low);
    assert_eq!(result.metadata.total_functions, 2);
    assert_eq!(result.metadata.successfully_parsed, 2);
    assert_eq!(result.metadata.patterns_checked, 18);
    assert_eq!(result.metadata.patterns_matched, 1);
    assert_eq!(report.analysis.status, "ok");
}

#[test]
fn owner_gated_selfdestruct_is_a_single_finding() {
    let result = inspect_fixture("owner_selfdestruct.sol").result;

    assert_eq!(types(&result), vec![RiskType::Selfdestruct]);
    assert_eq!(result.findings[0].weight(), 4.0);
    assert_eq!(result.findings[0].line_number, 17);
    assert_eq!(count(&result, RiskType::CentralizedOwnership), 0);
    assert_eq!(result.risk_score, 4.0);
    assert_eq!(result.classification, Classification::Low);
}

#[test]
fn three_owner_functions_are_centralized() {
    let result = inspect_fixture("centralized.sol").result;

    assert_eq!(count(&result, RiskType::CentralizedOwnership), 1);
    let centralized = result
        .findings
        .iter()
        .find(|f| f.risk_type == RiskType::CentralizedOwnership)
        .unwrap();
    assert_eq!(centralized.severity(), Severity::High);
    assert_eq!(centralized.weight(), 2.0);
    assert_eq!(centralized.function_name.as_deref(), Some("mint, pause, withdraw"));

    assert_eq!(
        types(&result),
        vec![
            RiskType::BalanceManipulation,
            RiskType::WithdrawFunction,
            RiskType::CentralizedOwnership,
            RiskType::OwnerRestrictedMinting,
            RiskType::PausableContract,
        ]
    );
    assert_eq!(count(&result, RiskType::UnlimitedMinting), 0);
    assert_eq!(result.risk_score, 9.5);
    assert_eq!(result.classification, Classification::VeryHigh);
}

#[test]
fn empty_and_prose_inputs_are_unsupported_and_clean() {
    let prose = load_fixture("prose.txt");
    for input in ["", "   \n\t", prose.as_str()] {
        assert!(!looks_like_supported_source(input));
        let result = analyze(input);
        assert!(result.findings.is_empty());
        assert_eq!(result.risk_score, 0.0);
        assert_eq!(result.classification, Classification::VeryLow);
        assert_eq!(result.confidence, 0.5);
    }

    let report = inspect_fixture("prose.txt");
    assert_eq!(report.analysis.status, "unsupported");
    assert_eq!(report.analysis.warnings.len(), 1);
}

#[test]
fn strict_mode_rejects_unsupported_input() {
    let config = EngineConfig {
        strict: true,
        ..EngineConfig::default()
    };
    let err = tokensift_core::inspect_with(&fixtures_dir().join("prose.txt"), tool(), &config)
        .unwrap_err();
    assert!(err.to_string().contains("unsupported input"));

    let ok = tokensift_core::inspect_with(&fixtures_dir().join("checked_call.sol"), tool(), &config);
    assert!(ok.is_ok());
}

#[test]
fn checked_low_level_calls_are_not_flagged() {
    let result = inspect_fixture("checked_call.sol").result;
    assert_eq!(count(&result, RiskType::UncheckedCall), 0);
    assert_eq!(result.risk_score, 0.0);
    assert_eq!(result.classification, Classification::VeryLow);
}

#[test]
fn participant_gates_are_not_owner_gates() {
    let report = inspect_fixture("whitelist_sale.sol");
    assert!(report.result.findings.is_empty(), "{:?}", types(&report.result));
    assert_eq!(report.result.risk_score, 0.0);
    assert_eq!(report.result.classification, Classification::VeryLow);
    assert_eq!(report.result.metadata.total_functions, 3);
}

#[test]
fn bare_low_level_call_is_flagged() {
    let result = inspect_fixture("unchecked_call.sol").result;
    assert_eq!(types(&result), vec![RiskType::UncheckedCall]);
    assert_eq!(result.findings[0].line_number, 6);
}

#[test]
fn report_binds_source_fingerprint() {
    let source = load_fixture("unlimited_mint.sol");
    let mut tmp = NamedTempFile::new().expect("create temp file");
    tmp.write_all(source.as_bytes()).expect("write source");
    tmp.flush().expect("flush");

    let report = tokensift_core::inspect(tmp.path(), tool()).expect("inspect should succeed");
    assert_eq!(report.source.size_bytes, source.len() as u64);
    assert_eq!(report.source.hash.algorithm, "sha256");
    assert_eq!(report.source.hash.value, source_fingerprint(&source));
    assert_eq!(report.result, analyze(&source));
}

#[test]
fn missing_file_is_an_error() {
    let err = tokensift_core::inspect(&fixtures_dir().join("nope.sol"), tool()).unwrap_err();
    assert!(err.to_string().contains("failed to read source"));
}

#[test]
fn report_json_is_byte_identical_across_runs() {
    let a = serde_json::to_string(&inspect_fixture("centralized.sol")).unwrap();
    let b = serde_json::to_string(&inspect_fixture("centralized.sol")).unwrap();
    assert_eq!(a, b);
}

#[test]
fn detector_order_is_irrelevant() {
    let source = load_fixture("centralized.sol");
    let baseline = analyze(&source);

    for shift in 0..DetectorKind::ALL.len() {
        let mut kinds = DetectorKind::ALL.to_vec();
        kinds.rotate_left(shift);
        for reversed in [false, true] {
            if reversed {
                kinds.reverse();
            }
            let engine = RiskEngine::new(EngineConfig {
                parallel: shift % 2 == 0,
                detectors: kinds.clone(),
                ..EngineConfig::default()
            });
            assert_eq!(engine.analyze(&source), baseline, "{kinds:?}");
        }
    }
}

#[test]
fn adding_a_risky_function_never_lowers_the_score() {
    let base = load_fixture("unlimited_mint.sol");
    let extended = base.replacen(
        "    function balanceOf",
        "    function kill() external {\n        selfdestruct(payable(msg.sender));\n    }\n\n    function balanceOf",
        1,
    );

    let before = analyze(&base);
    let after = analyze(&extended);
    assert!(after.risk_score >= before.risk_score);
    assert_eq!(count(&after, RiskType::Selfdestruct), 1);
}

proptest! {
    #[test]
    fn scores_stay_in_range(input in ".{0,400}") {
        let result = analyze(&input);
        prop_assert!((0.0..=10.0).contains(&result.risk_score));
        prop_assert!((0.0..=1.0).contains(&result.confidence));
        if result.findings.is_empty() {
            prop_assert_eq!(result.risk_score, 0.0);
            prop_assert_eq!(result.classification, Classification::VeryLow);
        }
    }

    #[test]
    fn solidity_shaped_input_is_deterministic(
        name in "[a-zA-Z][a-zA-Z0-9]{0,10}",
        modifier in prop::sample::select(vec!["", "onlyOwner", "whenNotPaused", "onlyAdmin"]),
        body in prop::sample::select(vec![
            "balances[to] += 1;",
            "selfdestruct(payable(owner));",
            "to.call{value: 1}(\"\");",
            "require(tx.origin == owner);",
            "payable(owner).transfer(1);",
            "{ unbalanced",
        ]),
    ) {
        let source = format!(
            "pragma solidity ^0.8.0;\ncontract C {{\n    function {name}(address to) external {modifier} {{\n        {body}\n    }}\n}}\n"
        );
        let first = analyze(&source);
        let second = analyze(&source);
        prop_assert_eq!(&first, &second);
        prop_assert!((0.0..=10.0).contains(&first.risk_score));
        prop_assert!((0.0..=1.0).contains(&first.confidence));
        prop_assert_eq!(first.metadata.total_functions, 1);
    }
}
