//! Pattern detectors.
//!
//! Each detector is a pure function over a `StructuralModel`. Detectors do
//! not share state, do not see each other's output, and may run in any
//! order or in parallel. `DetectorKind` is the single dispatch point.

pub mod dangerous;
pub mod economic;
pub mod fund_control;
pub mod minting;
pub mod ownership;
pub mod upgrade;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::rules::catalog::RiskType;
use crate::rules::finding::RiskFinding;
use crate::source::model::{FunctionInfo, StructuralModel};
use crate::source::patterns::{RE_INLINE_OWNER_CHECK, RE_OWNER_MODIFIER, compiled};

pub type DetectorResult = Result<Vec<RiskFinding>, Error>;

/// The six detector passes.
///
/// Variant order is the canonical order in which per-detector batches are
/// concatenated before the final severity sort.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DetectorKind {
    Minting,
    FundControl,
    Ownership,
    Upgrade,
    DangerousFunctions,
    Economic,
}

impl DetectorKind {
    pub const ALL: [DetectorKind; 6] = [
        DetectorKind::Minting,
        DetectorKind::FundControl,
        DetectorKind::Ownership,
        DetectorKind::Upgrade,
        DetectorKind::DangerousFunctions,
        DetectorKind::Economic,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            DetectorKind::Minting => "minting",
            DetectorKind::FundControl => "fund_control",
            DetectorKind::Ownership => "ownership",
            DetectorKind::Upgrade => "upgrade",
            DetectorKind::DangerousFunctions => "dangerous_functions",
            DetectorKind::Economic => "economic",
        }
    }

    /// Risk types this detector is able to emit.
    pub fn risk_types(&self) -> &'static [RiskType] {
        match self {
            DetectorKind::Minting => &[RiskType::UnlimitedMinting, RiskType::OwnerRestrictedMinting],
            DetectorKind::FundControl => &[
                RiskType::WithdrawFunction,
                RiskType::EmergencyWithdrawal,
                RiskType::BalanceManipulation,
            ],
            DetectorKind::Ownership => &[
                RiskType::CentralizedOwnership,
                RiskType::PausableContract,
                RiskType::OwnershipTransfer,
            ],
            DetectorKind::Upgrade => &[
                RiskType::DelegatecallUsage,
                RiskType::UupsProxy,
                RiskType::TransparentProxy,
            ],
            DetectorKind::DangerousFunctions => &[
                RiskType::Selfdestruct,
                RiskType::TxOrigin,
                RiskType::UncheckedCall,
            ],
            DetectorKind::Economic => &[
                RiskType::AdjustableFees,
                RiskType::BlacklistModification,
                RiskType::WhitelistModification,
                RiskType::MaxTxLimit,
            ],
        }
    }

    pub fn detect(&self, model: &StructuralModel) -> DetectorResult {
        match self {
            DetectorKind::Minting => minting::detect(model),
            DetectorKind::FundControl => fund_control::detect(model),
            DetectorKind::Ownership => ownership::detect(model),
            DetectorKind::Upgrade => upgrade::detect(model),
            DetectorKind::DangerousFunctions => dangerous::detect(model),
            DetectorKind::Economic => economic::detect(model),
        }
    }
}

impl std::fmt::Display for DetectorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

impl std::str::FromStr for DetectorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DetectorKind::ALL
            .into_iter()
            .find(|k| k.id() == s)
            .ok_or_else(|| format!("unknown detector `{s}`"))
    }
}

/// First modifier on the signature that gates on the owner: either an
/// owner/role-style name, or a modifier declared in this source whose body
/// performs an inline owner check.
pub(crate) fn owner_modifier<'a>(
    model: &StructuralModel,
    f: &'a FunctionInfo,
) -> Result<Option<&'a str>, Error> {
    let by_name = compiled(&RE_OWNER_MODIFIER, "owner_modifier")?;
    let inline = compiled(&RE_INLINE_OWNER_CHECK, "inline_owner_check")?;

    Ok(f.modifiers.iter().map(String::as_str).find(|name| {
        by_name.is_match(name)
            || model
                .modifiers()
                .iter()
                .any(|m| m.name == *name && inline.is_match(&m.body))
    }))
}

/// Body compares the sender against an owner/admin or checks a role.
pub(crate) fn has_inline_owner_check(f: &FunctionInfo) -> Result<bool, Error> {
    let re = compiled(&RE_INLINE_OWNER_CHECK, "inline_owner_check")?;
    Ok(re.is_match(&f.body))
}

/// Gated either by an owner-style modifier or an inline sender check.
pub(crate) fn is_privileged(model: &StructuralModel, f: &FunctionInfo) -> Result<bool, Error> {
    Ok(owner_modifier(model, f)?.is_some() || has_inline_owner_check(f)?)
}

/// Source line of the first match of `re` inside the body of `f`.
pub(crate) fn first_body_match_line(
    model: &StructuralModel,
    f: &FunctionInfo,
    re: &Regex,
) -> Option<usize> {
    re.find(&f.body)
        .map(|m| model.line_of(f.body_offset + m.start()))
}
