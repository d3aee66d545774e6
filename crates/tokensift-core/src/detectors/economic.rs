//! Owner-tunable economics: fees, address lists, transaction limits.

use regex::Regex;

use crate::detectors::{DetectorResult, owner_modifier};
use crate::error::Error;
use crate::rules::catalog::RiskType;
use crate::rules::finding::RiskFinding;
use crate::source::model::StructuralModel;
use crate::source::patterns::{
    RE_BLACKLIST_NAME, RE_FEE_SETTER_FN, RE_LIST_SETTER_FN, RE_MAX_TX_NAME, RE_SETTER_PREFIX,
    RE_WHITELIST_NAME, compiled,
};

pub fn detect(model: &StructuralModel) -> DetectorResult {
    let fee_setter = compiled(&RE_FEE_SETTER_FN, "fee_setter_fn")?;
    let list_setter = compiled(&RE_LIST_SETTER_FN, "list_setter_fn")?;
    let setter_prefix = compiled(&RE_SETTER_PREFIX, "setter_prefix")?;
    let blacklist = compiled(&RE_BLACKLIST_NAME, "blacklist_name")?;
    let whitelist = compiled(&RE_WHITELIST_NAME, "whitelist_name")?;
    let max_tx = compiled(&RE_MAX_TX_NAME, "max_tx_name")?;

    let mut findings = Vec::new();

    for f in model.functions().iter().filter(|f| fee_setter.is_match(&f.name)) {
        if let Some(m) = owner_modifier(model, f)? {
            findings.push(
                RiskFinding::at(
                    model,
                    RiskType::AdjustableFees,
                    f.start_line,
                    format!("fee parameters can be changed through `{}`", f.name),
                )
                .with_function(&f.name)
                .with_modifier(m),
            );
        }
    }

    findings.extend(address_list(model, RiskType::BlacklistModification, blacklist, list_setter, "blacklist")?);
    findings.extend(address_list(model, RiskType::WhitelistModification, whitelist, list_setter, "whitelist")?);

    let has_limit = model.variables().iter().any(|v| max_tx.is_match(&v.name));
    if has_limit {
        for f in model
            .functions()
            .iter()
            .filter(|f| setter_prefix.is_match(&f.name) && max_tx.is_match(&f.name))
        {
            if let Some(m) = owner_modifier(model, f)? {
                findings.push(
                    RiskFinding::at(
                        model,
                        RiskType::MaxTxLimit,
                        f.start_line,
                        format!("transaction size limit can be changed through `{}`", f.name),
                    )
                    .with_function(&f.name)
                    .with_modifier(m),
                );
                break;
            }
        }
    }

    Ok(findings)
}

/// A list-named mapping plus an owner-gated function that edits it.
fn address_list(
    model: &StructuralModel,
    risk_type: RiskType,
    list_name: &Regex,
    list_setter: &Regex,
    label: &str,
) -> Result<Option<RiskFinding>, Error> {
    let has_mapping = model
        .variables()
        .iter()
        .any(|v| v.is_mapping() && list_name.is_match(&v.name));
    if !has_mapping {
        return Ok(None);
    }

    for f in model
        .functions()
        .iter()
        .filter(|f| list_name.is_match(&f.name) && list_setter.is_match(&f.name))
    {
        if let Some(m) = owner_modifier(model, f)? {
            return Ok(Some(
                RiskFinding::at(
                    model,
                    risk_type,
                    f.start_line,
                    format!("owner can edit the {label} through `{}`", f.name),
                )
                .with_function(&f.name)
                .with_modifier(m),
            ));
        }
    }

    Ok(None)
}
