//! Concentration of control: owner-gated surface, pausing, ownership hand-off.

use crate::detectors::{DetectorResult, owner_modifier};
use crate::error::Error;
use crate::rules::catalog::RiskType;
use crate::rules::finding::RiskFinding;
use crate::source::model::StructuralModel;
use crate::source::patterns::{
    RE_OWNERSHIP_ACCEPT_FN, RE_OWNERSHIP_TRANSFER_FN, RE_PAUSABLE_MARKER, RE_PAUSE_FUNCTION,
    RE_PAUSE_MODIFIER, compiled,
};

/// Distinct owner-gated functions needed to report centralized ownership.
pub const CENTRALIZED_OWNERSHIP_THRESHOLD: usize = 3;

pub fn detect(model: &StructuralModel) -> DetectorResult {
    let mut findings = Vec::new();

    if let Some(f) = centralized_ownership(model)? {
        findings.push(f);
    }
    if let Some(f) = pausable(model)? {
        findings.push(f);
    }
    if let Some(f) = ownership_transfer(model)? {
        findings.push(f);
    }

    Ok(findings)
}

fn centralized_ownership(model: &StructuralModel) -> Result<Option<RiskFinding>, Error> {
    let mut names: Vec<&str> = Vec::new();
    let mut first_line = 0;

    for f in model.functions() {
        if owner_modifier(model, f)?.is_none() {
            continue;
        }
        if names.is_empty() {
            first_line = f.start_line;
        }
        if !names.contains(&f.name.as_str()) {
            names.push(&f.name);
        }
    }

    if names.len() < CENTRALIZED_OWNERSHIP_THRESHOLD {
        return Ok(None);
    }

    let joined = names.join(", ");
    Ok(Some(
        RiskFinding::at(
            model,
            RiskType::CentralizedOwnership,
            first_line,
            format!("{} functions are restricted to a privileged caller: {joined}", names.len()),
        )
        .with_function(joined),
    ))
}

fn pausable(model: &StructuralModel) -> Result<Option<RiskFinding>, Error> {
    let pause_fn = compiled(&RE_PAUSE_FUNCTION, "pause_function")?;
    let marker = compiled(&RE_PAUSABLE_MARKER, "pausable_marker")?;
    let pause_mod = compiled(&RE_PAUSE_MODIFIER, "pause_modifier")?;

    if let Some(f) = model.functions().iter().find(|f| pause_fn.is_match(&f.name)) {
        return Ok(Some(
            RiskFinding::at(
                model,
                RiskType::PausableContract,
                f.start_line,
                format!("function `{}` can halt contract operations", f.name),
            )
            .with_function(&f.name),
        ));
    }

    if let Some(m) = marker.find(model.source()) {
        return Ok(Some(RiskFinding::at(
            model,
            RiskType::PausableContract,
            model.line_of(m.start()),
            "contract inherits a pausable base",
        )));
    }

    for f in model.functions() {
        if let Some(m) = f.modifiers.iter().find(|m| pause_mod.is_match(m)) {
            return Ok(Some(
                RiskFinding::at(
                    model,
                    RiskType::PausableContract,
                    f.start_line,
                    format!("function `{}` is gated by pause modifier `{m}`", f.name),
                )
                .with_function(&f.name)
                .with_modifier(m),
            ));
        }
    }

    Ok(None)
}

fn ownership_transfer(model: &StructuralModel) -> Result<Option<RiskFinding>, Error> {
    let transfer_fn = compiled(&RE_OWNERSHIP_TRANSFER_FN, "ownership_transfer_fn")?;
    let accept_fn = compiled(&RE_OWNERSHIP_ACCEPT_FN, "ownership_accept_fn")?;

    if model.functions().iter().any(|f| accept_fn.is_match(&f.name)) {
        return Ok(None);
    }

    Ok(model
        .functions()
        .iter()
        .find(|f| transfer_fn.is_match(&f.name))
        .map(|f| {
            RiskFinding::at(
                model,
                RiskType::OwnershipTransfer,
                f.start_line,
                format!("function `{}` hands over ownership in a single step", f.name),
            )
            .with_function(&f.name)
        }))
}
