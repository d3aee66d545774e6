//! Privileged movement of funds and direct balance edits.

use crate::detectors::{DetectorResult, first_body_match_line, is_privileged, owner_modifier};
use crate::rules::catalog::RiskType;
use crate::rules::finding::RiskFinding;
use crate::source::model::StructuralModel;
use crate::source::patterns::{
    RE_BALANCE_WRITE, RE_EMERGENCY_NAME, RE_FUND_TRANSFER, RE_TRANSFER_NAME, RE_WITHDRAW_NAME,
    compiled,
};

pub fn detect(model: &StructuralModel) -> DetectorResult {
    let withdraw_name = compiled(&RE_WITHDRAW_NAME, "withdraw_name")?;
    let emergency_name = compiled(&RE_EMERGENCY_NAME, "emergency_name")?;
    let transfer_name = compiled(&RE_TRANSFER_NAME, "transfer_name")?;
    let fund_transfer = compiled(&RE_FUND_TRANSFER, "fund_transfer")?;
    let balance_write = compiled(&RE_BALANCE_WRITE, "balance_write")?;

    let mut findings = Vec::new();

    for f in model.functions() {
        let moves_funds = fund_transfer.is_match(&f.body);

        if moves_funds && withdraw_name.is_match(&f.name) {
            if let Some(m) = owner_modifier(model, f)? {
                findings.push(
                    RiskFinding::at(
                        model,
                        RiskType::WithdrawFunction,
                        f.start_line,
                        format!("function `{}` moves funds and is restricted by `{m}`", f.name),
                    )
                    .with_function(&f.name)
                    .with_modifier(m),
                );
            }
        }

        if moves_funds && emergency_name.is_match(&f.name) {
            findings.push(
                RiskFinding::at(
                    model,
                    RiskType::EmergencyWithdrawal,
                    f.start_line,
                    format!("emergency function `{}` moves funds", f.name),
                )
                .with_function(&f.name),
            );
        }

        if f.is_constructor() || transfer_name.is_match(&f.name) || !is_privileged(model, f)? {
            continue;
        }
        if let Some(line) = first_body_match_line(model, f, balance_write) {
            let mut finding = RiskFinding::at(
                model,
                RiskType::BalanceManipulation,
                line,
                format!("privileged function `{}` writes a balance entry directly", f.name),
            )
            .with_function(&f.name);
            if let Some(m) = owner_modifier(model, f)? {
                finding = finding.with_modifier(m);
            }
            findings.push(finding);
        }
    }

    Ok(findings)
}
