//! Token supply expansion: uncapped and owner-controlled minting.

use crate::detectors::{DetectorResult, has_inline_owner_check, owner_modifier};
use crate::rules::catalog::RiskType;
use crate::rules::finding::RiskFinding;
use crate::source::model::StructuralModel;
use crate::source::patterns::{RE_MINT_NAME, RE_SUPPLY_CAP_NAME, RE_SUPPLY_CHECK, compiled};

pub fn detect(model: &StructuralModel) -> DetectorResult {
    let mint_name = compiled(&RE_MINT_NAME, "mint_name")?;
    let cap_name = compiled(&RE_SUPPLY_CAP_NAME, "supply_cap_name")?;
    let supply_check = compiled(&RE_SUPPLY_CHECK, "supply_check")?;

    let has_supply_cap = model.variables().iter().any(|v| cap_name.is_match(&v.name))
        || model.functions().iter().any(|f| cap_name.is_match(&f.name));

    let mut findings = Vec::new();

    for f in model
        .functions()
        .iter()
        .filter(|f| mint_name.is_match(&f.name) && !f.body.trim().is_empty())
    {
        if !has_supply_cap && !supply_check.is_match(&f.body) {
            findings.push(
                RiskFinding::at(
                    model,
                    RiskType::UnlimitedMinting,
                    f.start_line,
                    format!(
                        "function `{}` mints without a supply cap or total-supply check",
                        f.name
                    ),
                )
                .with_function(&f.name),
            );
        }

        let gate = owner_modifier(model, f)?;
        if gate.is_some() || has_inline_owner_check(f)? {
            let mut finding = RiskFinding::at(
                model,
                RiskType::OwnerRestrictedMinting,
                f.start_line,
                match gate {
                    Some(m) => format!("function `{}` mints behind modifier `{m}`", f.name),
                    None => format!("function `{}` mints behind an inline owner check", f.name),
                },
            )
            .with_function(&f.name);
            if let Some(m) = gate {
                finding = finding.with_modifier(m);
            }
            findings.push(finding);
        }
    }

    Ok(findings)
}
