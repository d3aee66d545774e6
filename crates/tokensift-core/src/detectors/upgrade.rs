//! Upgradeability and delegated execution.

use crate::detectors::{DetectorResult, first_body_match_line};
use crate::error::Error;
use crate::rules::catalog::RiskType;
use crate::rules::finding::RiskFinding;
use crate::source::model::StructuralModel;
use crate::source::patterns::{
    RE_AUTHORIZE_UPGRADE_FN, RE_DELEGATECALL, RE_IMPLEMENTATION_NAME, RE_TRANSPARENT_MARKER,
    RE_UPGRADE_SETTER_FN, RE_UUPS_MARKER, compiled,
};

pub fn detect(model: &StructuralModel) -> DetectorResult {
    let delegatecall = compiled(&RE_DELEGATECALL, "delegatecall")?;

    let mut findings: Vec<RiskFinding> = model
        .functions()
        .iter()
        .filter_map(|f| {
            first_body_match_line(model, f, delegatecall).map(|line| {
                RiskFinding::at(
                    model,
                    RiskType::DelegatecallUsage,
                    line,
                    format!("function `{}` executes code via delegatecall", f.name),
                )
                .with_function(&f.name)
            })
        })
        .collect();

    findings.extend(uups_proxy(model)?);
    findings.extend(transparent_proxy(model)?);

    Ok(findings)
}

fn uups_proxy(model: &StructuralModel) -> Result<Option<RiskFinding>, Error> {
    let authorize = compiled(&RE_AUTHORIZE_UPGRADE_FN, "authorize_upgrade_fn")?;
    let marker = compiled(&RE_UUPS_MARKER, "uups_marker")?;

    if let Some(f) = model.functions().iter().find(|f| authorize.is_match(&f.name)) {
        return Ok(Some(
            RiskFinding::at(
                model,
                RiskType::UupsProxy,
                f.start_line,
                format!("upgrade authorization hook `{}` allows replacing the implementation", f.name),
            )
            .with_function(&f.name),
        ));
    }

    Ok(marker.find(model.source()).map(|m| {
        RiskFinding::at(
            model,
            RiskType::UupsProxy,
            model.line_of(m.start()),
            "contract inherits a UUPS upgradeable base",
        )
    }))
}

fn transparent_proxy(model: &StructuralModel) -> Result<Option<RiskFinding>, Error> {
    let marker = compiled(&RE_TRANSPARENT_MARKER, "transparent_marker")?;
    let setter = compiled(&RE_UPGRADE_SETTER_FN, "upgrade_setter_fn")?;
    let implementation = compiled(&RE_IMPLEMENTATION_NAME, "implementation_name")?;
    let delegatecall = compiled(&RE_DELEGATECALL, "delegatecall")?;

    if let Some(m) = marker.find(model.source()) {
        return Ok(Some(RiskFinding::at(
            model,
            RiskType::TransparentProxy,
            model.line_of(m.start()),
            "contract references a transparent upgradeable proxy",
        )));
    }

    let has_pointer = model
        .variables()
        .iter()
        .any(|v| implementation.is_match(&v.name));
    if has_pointer {
        if let Some(f) = model.functions().iter().find(|f| setter.is_match(&f.name)) {
            return Ok(Some(
                RiskFinding::at(
                    model,
                    RiskType::TransparentProxy,
                    f.start_line,
                    format!("function `{}` retargets the stored implementation", f.name),
                )
                .with_function(&f.name),
            ));
        }
    }

    Ok(model
        .functions()
        .iter()
        .filter(|f| f.name == "fallback" || f.name == "receive")
        .find_map(|f| {
            first_body_match_line(model, f, delegatecall).map(|line| {
                RiskFinding::at(
                    model,
                    RiskType::TransparentProxy,
                    line,
                    format!("`{}` forwards calls via delegatecall", f.name),
                )
                .with_function(&f.name)
            })
        }))
}
