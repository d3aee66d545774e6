//! Dangerous primitives: self-destruct, `tx.origin`, unchecked low-level calls.

use regex::Regex;

use crate::detectors::{DetectorResult, first_body_match_line};
use crate::rules::catalog::RiskType;
use crate::rules::finding::RiskFinding;
use crate::source::model::{FunctionInfo, StructuralModel};
use crate::source::patterns::{
    RE_LOW_LEVEL_CALL, RE_SELFDESTRUCT, RE_SUCCESS_CHECK, RE_SUCCESS_DESTRUCTURE, RE_TX_ORIGIN,
    compiled,
};

/// Lines after a low-level call that are searched for a success check.
pub const UNCHECKED_CALL_WINDOW: usize = 3;

pub fn detect(model: &StructuralModel) -> DetectorResult {
    let selfdestruct = compiled(&RE_SELFDESTRUCT, "selfdestruct")?;
    let tx_origin = compiled(&RE_TX_ORIGIN, "tx_origin")?;
    let call = compiled(&RE_LOW_LEVEL_CALL, "low_level_call")?;
    let check = compiled(&RE_SUCCESS_CHECK, "success_check")?;
    let destructure = compiled(&RE_SUCCESS_DESTRUCTURE, "success_destructure")?;

    let mut findings = Vec::new();

    // Reported once, at the first function that can destroy the contract.
    if let Some((f, line)) = model
        .functions()
        .iter()
        .find_map(|f| first_body_match_line(model, f, selfdestruct).map(|line| (f, line)))
    {
        findings.push(
            RiskFinding::at(
                model,
                RiskType::Selfdestruct,
                line,
                format!("function `{}` can destroy the contract", f.name),
            )
            .with_function(&f.name),
        );
    }

    for f in model.functions() {
        if let Some(line) = first_body_match_line(model, f, tx_origin) {
            findings.push(
                RiskFinding::at(
                    model,
                    RiskType::TxOrigin,
                    line,
                    format!("function `{}` relies on tx.origin", f.name),
                )
                .with_function(&f.name),
            );
        }
    }

    for f in model.functions() {
        if let Some(line) = first_unchecked_call(model, f, call, check, destructure) {
            findings.push(
                RiskFinding::at(
                    model,
                    RiskType::UncheckedCall,
                    line,
                    format!(
                        "function `{}` makes a low-level call without checking its success",
                        f.name
                    ),
                )
                .with_function(&f.name),
            );
        }
    }

    Ok(findings)
}

/// Line of the first low-level call in `f` with no success check on its own
/// line or within `UNCHECKED_CALL_WINDOW` following lines.
fn first_unchecked_call(
    model: &StructuralModel,
    f: &FunctionInfo,
    call: &Regex,
    check: &Regex,
    destructure: &Regex,
) -> Option<usize> {
    call.find_iter(&f.body)
        .map(|m| model.line_of(f.body_offset + m.start()))
        .find(|&line| {
            let own_line = model.line(line).unwrap_or_default();
            if destructure.is_match(own_line) {
                return false;
            }
            let last = line.saturating_add(UNCHECKED_CALL_WINDOW);
            !(line..=last)
                .filter_map(|n| model.line(n))
                .any(|text| check.is_match(text))
        })
}
