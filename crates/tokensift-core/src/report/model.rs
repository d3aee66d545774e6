use serde::{Deserialize, Serialize};

use crate::rules::finding::RiskFinding;
use crate::{RISK_CATALOG_VERSION, SCHEMA_VERSION};

/// Top-level report.
///
/// Stable JSON contract. It must remain deterministic for identical input
/// text and never embeds the analyzed source beyond finding snippets.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Report {
    pub schema_version: String,
    pub catalog_version: String,
    pub tool: ToolInfo,
    pub source: SourceInfo,
    pub analysis: AnalysisInfo,
    pub result: RiskDetectionResult,
}

impl Report {
    /// Assemble a report from pipeline outputs.
    ///
    /// Assumes `result.findings` are already in canonical order.
    pub fn new(
        tool: ToolInfo,
        source: SourceInfo,
        mut analysis: AnalysisInfo,
        result: RiskDetectionResult,
    ) -> Self {
        analysis.warnings.sort();

        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            catalog_version: RISK_CATALOG_VERSION.to_string(),
            tool,
            source,
            analysis,
            result,
        }
    }
}

/// Tool metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToolInfo {
    pub name: String,
    pub version: String,
    pub commit: Option<String>,
}

/// Source metadata bound to this report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourceInfo {
    pub path: Option<String>,
    pub size_bytes: u64,
    pub hash: SourceHash,
}

/// Content fingerprint of the analyzed text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourceHash {
    pub algorithm: String,
    pub value: String,
}

/// Analysis status and deterministic warnings.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AnalysisInfo {
    pub status: String,
    pub warnings: Vec<String>,
}

impl AnalysisInfo {
    pub fn ok() -> Self {
        Self {
            status: "ok".into(),
            warnings: vec![],
        }
    }

    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self {
            status: "unsupported".into(),
            warnings: vec![msg.into()],
        }
    }
}

/// Discrete risk label derived from the score.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Classification {
    VeryLow,
    Low,
    Moderate,
    High,
    VeryHigh,
}

impl Classification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::VeryLow => "VERY_LOW",
            Classification::Low => "LOW",
            Classification::Moderate => "MODERATE",
            Classification::High => "HIGH",
            Classification::VeryHigh => "VERY_HIGH",
        }
    }

    /// Process exit code for CI use.
    ///
    /// - VERY_LOW, LOW → 0
    /// - MODERATE      → 1
    /// - HIGH, VERY_HIGH → 2
    pub fn exit_code(&self) -> i32 {
        match self {
            Classification::VeryLow | Classification::Low => 0,
            Classification::Moderate => 1,
            Classification::High | Classification::VeryHigh => 2,
        }
    }
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Counts describing how much of the input was analyzed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct DetectionMetadata {
    pub total_functions: usize,
    pub successfully_parsed: usize,
    /// Risk types whose detector ran to completion.
    pub patterns_checked: usize,
    /// Distinct risk types with at least one finding.
    pub patterns_matched: usize,
}

/// Output of one analysis run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RiskDetectionResult {
    /// In `[0, 10]`, one decimal.
    pub risk_score: f64,
    pub classification: Classification,
    /// In `[0, 1]`, two decimals.
    pub confidence: f64,
    /// Ordered by severity; detector emission order within a severity.
    pub findings: Vec<RiskFinding>,
    pub metadata: DetectionMetadata,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::catalog::RiskType;

    fn dummy_result() -> RiskDetectionResult {
        RiskDetectionResult {
            risk_score: 3.0,
            classification: Classification::Low,
            confidence: 0.61,
            findings: vec![RiskFinding::new(
                RiskType::UnlimitedMinting,
                "function mint(address to, uint256 amount) public {",
                2,
                "function `mint` mints without a supply cap or total-supply check",
            )
            .with_function("mint")],
            metadata: DetectionMetadata {
                total_functions: 1,
                successfully_parsed: 1,
                patterns_checked: 18,
                patterns_matched: 1,
            },
        }
    }

    fn dummy_source() -> SourceInfo {
        SourceInfo {
            path: None,
            size_bytes: 123,
            hash: SourceHash {
                algorithm: "sha256".into(),
                value: "abc".into(),
            },
        }
    }

    #[test]
    fn report_sorts_warnings_and_stamps_versions() {
        let mut analysis = AnalysisInfo::ok();
        analysis.warnings = vec!["z".into(), "a".into()];

        let report = Report::new(
            ToolInfo {
                name: "tokensift".into(),
                version: "1.0.0".into(),
                commit: None,
            },
            dummy_source(),
            analysis,
            dummy_result(),
        );

        assert_eq!(report.analysis.warnings, vec!["a", "z"]);
        assert_eq!(report.schema_version, SCHEMA_VERSION);
        assert_eq!(report.catalog_version, RISK_CATALOG_VERSION);
    }

    #[test]
    fn analysis_info_factories() {
        let unsupported = AnalysisInfo::unsupported("no pragma");
        assert_eq!(unsupported.status, "unsupported");
        assert_eq!(unsupported.warnings, vec!["no pragma"]);

        let ok = AnalysisInfo::ok();
        assert_eq!(ok.status, "ok");
        assert!(ok.warnings.is_empty());
    }

    #[test]
    fn classification_serializes_correctly() {
        let serialized = serde_json::to_string(&Classification::VeryHigh).unwrap();
        assert_eq!(serialized, "\"VERY_HIGH\"");
        assert_eq!(Classification::Moderate.to_string(), "MODERATE");
    }

    #[test]
    fn result_json_shape() {
        let v = serde_json::to_value(dummy_result()).unwrap();
        assert_eq!(v["risk_score"], 3.0);
        assert_eq!(v["classification"], "LOW");
        assert_eq!(v["findings"][0]["type"], "UNLIMITED_MINTING");
        assert_eq!(v["findings"][0]["weight"], 3.0);
        assert_eq!(v["metadata"]["patterns_checked"], 18);
    }

    #[test]
    fn exit_codes_follow_classification() {
        assert_eq!(Classification::VeryLow.exit_code(), 0);
        assert_eq!(Classification::Low.exit_code(), 0);
        assert_eq!(Classification::Moderate.exit_code(), 1);
        assert_eq!(Classification::High.exit_code(), 2);
        assert_eq!(Classification::VeryHigh.exit_code(), 2);
    }
}
