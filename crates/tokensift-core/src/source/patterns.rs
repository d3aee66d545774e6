//! Compiled regular expressions shared by the parser and the detectors.
//!
//! Each pattern compiles lazily on first use. A pattern that fails to
//! compile is `None`; callers treat that as "pattern unavailable" rather
//! than panicking.

use regex::Regex;
use std::sync::LazyLock;

use crate::error::Error;

pub type Pattern = LazyLock<Option<Regex>>;

macro_rules! source_pattern {
    ($name:ident, $regex_str:expr) => {
        pub static $name: Pattern = LazyLock::new(|| Regex::new($regex_str).ok());
    };
}

/// Resolve a lazily-compiled pattern or report it as unavailable.
pub fn compiled(pattern: &'static Pattern, name: &'static str) -> Result<&'static Regex, Error> {
    pattern.as_ref().ok_or(Error::PatternUnavailable(name))
}

// ── Structure ──────────────────────────────────────────────────────────────
source_pattern!(
    RE_PRAGMA,
    r"\bpragma\s+(?:solidity|abicoder|experimental)\b"
);
source_pattern!(
    RE_CONTAINER_DECL,
    r"\b(?:contract|interface|library)\s+[A-Za-z_$][\w$]*[^;{]*\{"
);
// Group 1: named function. Group 2: special function keyword.
source_pattern!(
    RE_FUNCTION_DECL,
    r"(?:^|[^.\w$])(?:function\s+([A-Za-z_$][\w$]*)|(constructor|fallback|receive))\s*\("
);
source_pattern!(
    RE_MODIFIER_DECL,
    r"(?:^|[^.\w$])modifier\s+([A-Za-z_$][\w$]*)"
);
source_pattern!(RE_RETURNS_CLAUSE, r"\breturns\s*\([^)]*\)");
source_pattern!(
    RE_SIGNATURE_TOKEN,
    r"([A-Za-z_$][\w$]*)(?:\s*\([^)]*\))?"
);
// Group 1: type. Group 2: keyword run. Group 3: name.
source_pattern!(
    RE_SCALAR_VAR,
    r"(?m)^[ \t]*(address|bool|string|bytes\d*|u?int\d*|[A-Z][\w$]*)\s+((?:(?:public|private|internal|constant|immutable|payable|override)\s+)*)([A-Za-z_$][\w$]*)\s*(?:=|;)"
);
// Group 1: keyword run. Group 2: name.
source_pattern!(
    RE_MAPPING_VAR,
    r"\bmapping\s*\((?:[^()]|\((?:[^()]|\([^()]*\))*\))*\)\s*((?:(?:public|private|internal|immutable)\s+)*)([A-Za-z_$][\w$]*)\s*;"
);

// ── Gating ─────────────────────────────────────────────────────────────────
source_pattern!(
    RE_OWNER_MODIFIER,
    r"(?i)^(?:only(?:owner|admin|roles?|governance|governor|operator|minter|manager|controller|authori[sz]ed|dao|timelock|multisig|keeper|guardian)\w*|\w*owner\w*|\w*admin\w*|\w*governance\w*|auth|requiresauth)$"
);
source_pattern!(
    RE_INLINE_OWNER_CHECK,
    r"(?i)(?:msg\.sender|_msgsender\(\))\s*[!=]=\s*_?\w*(?:owner|admin)\w*(?:\(\))?|_?\w*(?:owner|admin)\w*(?:\(\))?\s*[!=]=\s*(?:msg\.sender|_msgsender\(\))|\bhasrole\s*\(|\b_check(?:owner|role)\s*\("
);

// ── Funds ──────────────────────────────────────────────────────────────────
source_pattern!(
    RE_FUND_TRANSFER,
    r"\.(?:transfer|send|safeTransfer|safeTransferFrom|transferFrom|safeTransferETH)\s*\(|\.call\s*\{\s*value\s*:|\.call\.value\s*\(|\bsafeTransfer(?:ETH|From)?\s*\("
);
source_pattern!(
    RE_BALANCE_WRITE,
    r"(?i)\b_?balance(?:s|of)?\s*\[[^\]]*\](?:\s*\[[^\]]*\])?\s*[+\-]?=[^=]"
);

// ── Supply ─────────────────────────────────────────────────────────────────
source_pattern!(
    RE_SUPPLY_CAP_NAME,
    r"(?i)^_?(?:max\w*supply|\w*supply_?cap|cap|max_?cap|hard_?cap)$"
);
source_pattern!(
    RE_SUPPLY_CHECK,
    r"(?i)\b(?:require|assert|if)\s*\([^;]*\b_?(?:total_?supply|max\w*supply|supply_?cap|cap)\b"
);

// ── Calls ──────────────────────────────────────────────────────────────────
source_pattern!(RE_DELEGATECALL, r"\bdelegatecall\b");
source_pattern!(RE_SELFDESTRUCT, r"\b(?:selfdestruct|suicide)\s*\(");
source_pattern!(RE_TX_ORIGIN, r"\btx\.origin\b");
source_pattern!(
    RE_LOW_LEVEL_CALL,
    r"\.(?:call|delegatecall|staticcall)\s*(?:\{[^}]*\})?\s*\(|\.call\.value\s*\("
);
source_pattern!(
    RE_SUCCESS_CHECK,
    r"\b(?:require|assert|if)\s*\([^;]*\b(?:success|sent|ok|succeeded)\b"
);
source_pattern!(RE_SUCCESS_DESTRUCTURE, r"\(\s*bool\s+[A-Za-z_$][\w$]*");

// ── Markers ────────────────────────────────────────────────────────────────
source_pattern!(RE_PAUSABLE_MARKER, r"\bis\s+[^{;]*\bPausable\w*");
source_pattern!(RE_PAUSE_FUNCTION, r"(?i)^_?(?:un)?pause$");
source_pattern!(RE_PAUSE_MODIFIER, r"^when(?:Not)?Paused$");
source_pattern!(
    RE_OWNERSHIP_TRANSFER_FN,
    r"(?i)^(?:transferownership|setowner|changeowner|updateowner|transferadmin|changeadmin)$"
);
source_pattern!(
    RE_OWNERSHIP_ACCEPT_FN,
    r"(?i)^(?:acceptownership|claimownership|acceptadmin)$"
);
source_pattern!(RE_UUPS_MARKER, r"\bis\s+[^{;]*\bUUPSUpgradeable\b");
source_pattern!(RE_AUTHORIZE_UPGRADE_FN, r"(?i)^_?authorizeupgrade$");
source_pattern!(
    RE_TRANSPARENT_MARKER,
    r"\bis\s+[^{;]*\b(?:TransparentUpgradeableProxy|TransparentProxy)\b"
);
source_pattern!(
    RE_UPGRADE_SETTER_FN,
    r"(?i)^_?(?:upgradeto|upgradetoandcall|setimplementation|upgradeimplementation)$"
);
source_pattern!(RE_IMPLEMENTATION_NAME, r"(?i)implementation");

// ── Economics ──────────────────────────────────────────────────────────────
source_pattern!(
    RE_FEE_SETTER_FN,
    r"(?i)^_?(?:set|update|change|adjust)\w*(?:fee|tax|rate)\w*$"
);
source_pattern!(RE_BLACKLIST_NAME, r"(?i)black_?list|block_?list");
source_pattern!(RE_WHITELIST_NAME, r"(?i)white_?list|allow_?list");
source_pattern!(
    RE_LIST_SETTER_FN,
    r"(?i)^_?(?:add|set|update|toggle|remove|include|exclude|block|blacklist|whitelist)"
);
source_pattern!(RE_MAX_TX_NAME, r"(?i)max\w*(?:tx|transaction)");
source_pattern!(RE_SETTER_PREFIX, r"(?i)^_?(?:set|update|change)");

// ── Names ──────────────────────────────────────────────────────────────────
source_pattern!(RE_MINT_NAME, r"(?i)mint");
source_pattern!(
    RE_WITHDRAW_NAME,
    r"(?i)withdraw|claim|rescue|recover|sweep"
);
source_pattern!(RE_EMERGENCY_NAME, r"(?i)emergency");
source_pattern!(RE_TRANSFER_NAME, r"(?i)transfer");
