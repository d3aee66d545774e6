pub mod detectors;
pub mod engine;
pub mod error;
pub mod report;
pub mod rules;
pub mod source;
pub mod util;

use std::path::Path;

use anyhow::Result;

use crate::engine::{EngineConfig, RiskEngine};
use crate::report::model::{AnalysisInfo, Report, RiskDetectionResult, ToolInfo};
use crate::source::parse::looks_like_supported_source;
use crate::source::read::{SourceContext, read_source};

pub use crate::detectors::DetectorKind;
pub use crate::error::Error;
pub use crate::report::model::Classification;

pub const TOOL_NAME: &str = "tokensift";

/// JSON schema version of reports.
/// Bump only when the report shape changes semantically.
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Version of the risk-type catalog (types, severities, weights).
pub const RISK_CATALOG_VERSION: &str = "0.1.0";

const UNSUPPORTED_REASON: &str =
    "input has no pragma directive or contract/interface/library declaration";

/// Analyze source text with the default engine.
pub fn analyze(source: &str) -> RiskDetectionResult {
    RiskEngine::default().analyze(source)
}

/// Read, analyze and report on a source file with the default engine.
pub fn inspect(path: &Path, tool: ToolInfo) -> Result<Report> {
    inspect_with(path, tool, &EngineConfig::default())
}

pub fn inspect_with(path: &Path, tool: ToolInfo, config: &EngineConfig) -> Result<Report> {
    let ctx = read_source(path)?;
    inspect_source(ctx, tool, config)
}

/// Analyze already-loaded source and wrap the result in a report.
///
/// In strict mode input that does not look like contract source is an
/// `Error::UnsupportedInput`; otherwise it is analyzed and flagged in
/// `analysis.status`.
pub fn inspect_source(ctx: SourceContext, tool: ToolInfo, config: &EngineConfig) -> Result<Report> {
    if config.strict && !looks_like_supported_source(&ctx.text) {
        return Err(Error::UnsupportedInput {
            reason: UNSUPPORTED_REASON.to_string(),
        }
        .into());
    }

    let outcome = RiskEngine::new(config.clone()).run(&ctx.text);

    let mut analysis = if outcome.supported {
        AnalysisInfo::ok()
    } else {
        AnalysisInfo::unsupported(UNSUPPORTED_REASON)
    };
    analysis
        .warnings
        .extend(outcome.failures.iter().map(ToString::to_string));

    Ok(Report::new(
        tool,
        ctx.into_source_info(),
        analysis,
        outcome.result,
    ))
}
