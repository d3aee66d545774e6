use serde::{Deserialize, Serialize};

use crate::rules::catalog::{RiskType, Severity};
use crate::source::model::StructuralModel;

/// Lines of context kept on each side of a finding's line.
pub const SNIPPET_CONTEXT_LINES: usize = 1;

/// Upper bound on `code_snippet` length, in characters.
pub const SNIPPET_MAX_CHARS: usize = 500;

/// A single typed risk observation.
///
/// `severity` and `weight` are copied from the catalog entry of `risk_type`
/// at construction and on deserialization; there is no way to build a
/// finding with other values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "FindingRecord")]
pub struct RiskFinding {
    #[serde(rename = "type")]
    pub risk_type: RiskType,
    severity: Severity,
    weight: f64,
    pub code_snippet: String,
    /// 1-indexed line; 0 when unknown.
    pub line_number: usize,
    pub machine_reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modifier_name: Option<String>,
}

impl RiskFinding {
    pub fn new(
        risk_type: RiskType,
        code_snippet: impl Into<String>,
        line_number: usize,
        machine_reason: impl Into<String>,
    ) -> Self {
        let (severity, weight) = risk_type.profile();
        Self {
            risk_type,
            severity,
            weight,
            code_snippet: normalize_snippet(&code_snippet.into()),
            line_number,
            machine_reason: machine_reason.into(),
            function_name: None,
            modifier_name: None,
        }
    }

    /// Build a finding anchored at `line`, with its snippet taken from `model`.
    pub fn at(
        model: &StructuralModel,
        risk_type: RiskType,
        line: usize,
        machine_reason: impl Into<String>,
    ) -> Self {
        Self::new(
            risk_type,
            extract_snippet(model, line, SNIPPET_CONTEXT_LINES),
            line,
            machine_reason,
        )
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn with_function(mut self, name: impl Into<String>) -> Self {
        self.function_name = Some(name.into());
        self
    }

    pub fn with_modifier(mut self, name: impl Into<String>) -> Self {
        self.modifier_name = Some(name.into());
        self
    }
}

/// Wire form of a finding. Severity and weight on the wire are ignored and
/// re-derived from the catalog.
#[derive(Deserialize)]
struct FindingRecord {
    #[serde(rename = "type")]
    risk_type: RiskType,
    #[serde(default)]
    code_snippet: String,
    #[serde(default)]
    line_number: usize,
    #[serde(default)]
    machine_reason: String,
    #[serde(default)]
    function_name: Option<String>,
    #[serde(default)]
    modifier_name: Option<String>,
}

impl From<FindingRecord> for RiskFinding {
    fn from(r: FindingRecord) -> Self {
        let mut finding =
            RiskFinding::new(r.risk_type, r.code_snippet, r.line_number, r.machine_reason);
        finding.function_name = r.function_name;
        finding.modifier_name = r.modifier_name;
        finding
    }
}

/// Lines `line - context ..= line + context`, blank lines dropped,
/// capped at `SNIPPET_MAX_CHARS`. Line 0 yields an empty snippet.
pub fn extract_snippet(model: &StructuralModel, line: usize, context: usize) -> String {
    if line == 0 {
        return String::new();
    }
    let first = line.saturating_sub(context).max(1);
    let last = line.saturating_add(context);

    let text = (first..=last)
        .filter_map(|n| model.line(n))
        .collect::<Vec<_>>()
        .join("\n");

    normalize_snippet(&text)
}

/// Drop blank lines and cap at `SNIPPET_MAX_CHARS` on a char boundary.
fn normalize_snippet(text: &str) -> String {
    let joined = text
        .lines()
        .filter(|l| !l.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n");
    match joined.char_indices().nth(SNIPPET_MAX_CHARS) {
        Some((cut, _)) => joined[..cut].to_string(),
        None => joined,
    }
}
