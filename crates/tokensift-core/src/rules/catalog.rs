//! Closed catalog of risk types.
//!
//! Every finding carries a `RiskType`. Severity and weight are looked up
//! from this table and are never assigned by a detector, so two findings
//! of the same type always contribute identically to the score.

use serde::{Deserialize, Serialize};

/// Severity rank of a risk type.
///
/// Variant order is the canonical report order: `Critical` sorts first.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "CRITICAL",
            Severity::High => "HIGH",
            Severity::Medium => "MEDIUM",
            Severity::Low => "LOW",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskType {
    UnlimitedMinting,
    OwnerRestrictedMinting,
    WithdrawFunction,
    EmergencyWithdrawal,
    BalanceManipulation,
    CentralizedOwnership,
    PausableContract,
    OwnershipTransfer,
    DelegatecallUsage,
    UupsProxy,
    TransparentProxy,
    Selfdestruct,
    TxOrigin,
    UncheckedCall,
    AdjustableFees,
    BlacklistModification,
    WhitelistModification,
    MaxTxLimit,
}

impl RiskType {
    pub const ALL: [RiskType; 18] = [
        RiskType::UnlimitedMinting,
        RiskType::OwnerRestrictedMinting,
        RiskType::WithdrawFunction,
        RiskType::EmergencyWithdrawal,
        RiskType::BalanceManipulation,
        RiskType::CentralizedOwnership,
        RiskType::PausableContract,
        RiskType::OwnershipTransfer,
        RiskType::DelegatecallUsage,
        RiskType::UupsProxy,
        RiskType::TransparentProxy,
        RiskType::Selfdestruct,
        RiskType::TxOrigin,
        RiskType::UncheckedCall,
        RiskType::AdjustableFees,
        RiskType::BlacklistModification,
        RiskType::WhitelistModification,
        RiskType::MaxTxLimit,
    ];

    /// The fixed `(severity, weight)` entry for this type.
    pub const fn profile(&self) -> (Severity, f64) {
        match self {
            RiskType::UnlimitedMinting => (Severity::Critical, 3.0),
            RiskType::OwnerRestrictedMinting => (Severity::Medium, 1.0),
            RiskType::WithdrawFunction => (Severity::High, 2.0),
            RiskType::EmergencyWithdrawal => (Severity::High, 1.5),
            RiskType::BalanceManipulation => (Severity::Critical, 3.5),
            RiskType::CentralizedOwnership => (Severity::High, 2.0),
            RiskType::PausableContract => (Severity::Medium, 1.0),
            RiskType::OwnershipTransfer => (Severity::Low, 0.5),
            RiskType::DelegatecallUsage => (Severity::High, 2.5),
            RiskType::UupsProxy => (Severity::Medium, 1.5),
            RiskType::TransparentProxy => (Severity::Medium, 1.5),
            RiskType::Selfdestruct => (Severity::Critical, 4.0),
            RiskType::TxOrigin => (Severity::High, 2.0),
            RiskType::UncheckedCall => (Severity::Medium, 1.0),
            RiskType::AdjustableFees => (Severity::Medium, 1.5),
            RiskType::BlacklistModification => (Severity::High, 2.0),
            RiskType::WhitelistModification => (Severity::Medium, 1.0),
            RiskType::MaxTxLimit => (Severity::Low, 0.5),
        }
    }

    pub const fn severity(&self) -> Severity {
        self.profile().0
    }

    pub const fn weight(&self) -> f64 {
        self.profile().1
    }

    /// External identifier, identical to the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskType::UnlimitedMinting => "UNLIMITED_MINTING",
            RiskType::OwnerRestrictedMinting => "OWNER_RESTRICTED_MINTING",
            RiskType::WithdrawFunction => "WITHDRAW_FUNCTION",
            RiskType::EmergencyWithdrawal => "EMERGENCY_WITHDRAWAL",
            RiskType::BalanceManipulation => "BALANCE_MANIPULATION",
            RiskType::CentralizedOwnership => "CENTRALIZED_OWNERSHIP",
            RiskType::PausableContract => "PAUSABLE_CONTRACT",
            RiskType::OwnershipTransfer => "OWNERSHIP_TRANSFER",
            RiskType::DelegatecallUsage => "DELEGATECALL_USAGE",
            RiskType::UupsProxy => "UUPS_PROXY",
            RiskType::TransparentProxy => "TRANSPARENT_PROXY",
            RiskType::Selfdestruct => "SELFDESTRUCT",
            RiskType::TxOrigin => "TX_ORIGIN",
            RiskType::UncheckedCall => "UNCHECKED_CALL",
            RiskType::AdjustableFees => "ADJUSTABLE_FEES",
            RiskType::BlacklistModification => "BLACKLIST_MODIFICATION",
            RiskType::WhitelistModification => "WHITELIST_MODIFICATION",
            RiskType::MaxTxLimit => "MAX_TX_LIMIT",
        }
    }
}

impl std::fmt::Display for RiskType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_orders_critical_first() {
        let mut sevs = vec![Severity::Low, Severity::Critical, Severity::Medium, Severity::High];
        sevs.sort();
        assert_eq!(
            sevs,
            vec![Severity::Critical, Severity::High, Severity::Medium, Severity::Low]
        );
    }

    #[test]
    fn profile_matches_known_entries() {
        assert_eq!(RiskType::UnlimitedMinting.profile(), (Severity::Critical, 3.0));
        assert_eq!(RiskType::Selfdestruct.profile(), (Severity::Critical, 4.0));
        assert_eq!(RiskType::CentralizedOwnership.profile(), (Severity::High, 2.0));
    }

    #[test]
    fn every_weight_is_positive_and_bounded() {
        for t in RiskType::ALL {
            let w = t.weight();
            assert!(w > 0.0 && w <= 10.0, "{t} has weight {w}");
        }
    }

    #[test]
    fn serialized_name_matches_as_str() {
        for t in RiskType::ALL {
            let s = serde_json::to_string(&t).unwrap();
            assert_eq!(s.trim_matches('"'), t.as_str());
        }
        assert_eq!(serde_json::to_string(&Severity::Medium).unwrap(), "\"MEDIUM\"");
    }
}
