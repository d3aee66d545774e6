//! Analysis engine: parse once, fan detectors out, merge and score.
//!
//! Each detector runs in isolation. A detector that returns an error or
//! panics contributes no findings and no checked patterns; the remaining
//! detectors are unaffected.

use std::any::Any;
use std::collections::BTreeSet;
use std::panic::{self, AssertUnwindSafe};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::detectors::{DetectorKind, DetectorResult};
use crate::error::Error;
use crate::report::model::{DetectionMetadata, RiskDetectionResult};
use crate::rules::finding::RiskFinding;
use crate::rules::score;
use crate::source::model::StructuralModel;
use crate::source::parse::{looks_like_supported_source, parse};
use crate::util::deterministic::order_batches;

/// Engine settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EngineConfig {
    /// Run detectors on the rayon pool instead of the calling thread.
    pub parallel: bool,
    /// Reject input that does not look like contract source.
    pub strict: bool,
    /// Detectors to run. Order is irrelevant; repeats are ignored.
    pub detectors: Vec<DetectorKind>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            strict: false,
            detectors: DetectorKind::ALL.to_vec(),
        }
    }
}

/// Everything one run produced, including what went wrong.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineOutcome {
    pub result: RiskDetectionResult,
    /// False when the input lacks a pragma and any container declaration.
    pub supported: bool,
    /// One `Error::DetectorFailure` per failed detector, in detector order.
    pub failures: Vec<Error>,
}

#[derive(Debug, Clone, Default)]
pub struct RiskEngine {
    config: EngineConfig,
}

impl RiskEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn analyze(&self, source: &str) -> RiskDetectionResult {
        self.run(source).result
    }

    pub fn run(&self, source: &str) -> EngineOutcome {
        let supported = looks_like_supported_source(source);
        if !supported {
            debug!("input has no pragma or container declaration");
        }

        let model = parse(source);
        let merged = dispatch(&self.config.detectors, self.config.parallel, |kind| {
            kind.detect(&model)
        });
        let metadata = metadata(&model, &merged);
        let result = score::score(merged.findings, metadata);

        debug!(
            findings = result.findings.len(),
            risk_score = result.risk_score,
            classification = %result.classification,
            "analysis complete"
        );

        EngineOutcome {
            result,
            supported,
            failures: merged.failures,
        }
    }
}

/// Detector output merged in canonical detector order.
#[derive(Debug, Default)]
pub(crate) struct MergedBatches {
    pub findings: Vec<RiskFinding>,
    pub patterns_checked: usize,
    pub failures: Vec<Error>,
}

/// Run `detect` once per distinct kind and merge the batches.
///
/// The merged output depends only on the set of kinds, never on their
/// order in `kinds` or on thread scheduling.
pub(crate) fn dispatch<F>(kinds: &[DetectorKind], parallel: bool, detect: F) -> MergedBatches
where
    F: Fn(DetectorKind) -> DetectorResult + Sync,
{
    let run_one = |kind: &DetectorKind| (*kind, run_isolated(*kind, &detect));

    let mut batches: Vec<(DetectorKind, DetectorResult)> = if parallel {
        kinds.par_iter().map(run_one).collect()
    } else {
        kinds.iter().map(run_one).collect()
    };
    order_batches(&mut batches);

    let mut merged = MergedBatches::default();
    for (kind, batch) in batches {
        match batch {
            Ok(findings) => {
                debug!(detector = kind.id(), findings = findings.len(), "detector finished");
                merged.patterns_checked += kind.risk_types().len();
                merged.findings.extend(findings);
            }
            Err(err) => {
                warn!(detector = kind.id(), error = %err, "detector failed, skipping its findings");
                merged.failures.push(err);
            }
        }
    }
    merged
}

fn run_isolated<F>(kind: DetectorKind, detect: &F) -> DetectorResult
where
    F: Fn(DetectorKind) -> DetectorResult,
{
    match panic::catch_unwind(AssertUnwindSafe(|| detect(kind))) {
        Ok(Ok(findings)) => Ok(findings),
        Ok(Err(err @ Error::DetectorFailure { .. })) => Err(err),
        Ok(Err(err)) => Err(Error::DetectorFailure {
            detector: kind.id(),
            message: err.to_string(),
        }),
        Err(payload) => Err(Error::DetectorFailure {
            detector: kind.id(),
            message: format!("panicked: {}", panic_message(payload.as_ref())),
        }),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown panic payload"
    }
}

fn metadata(model: &StructuralModel, merged: &MergedBatches) -> DetectionMetadata {
    let matched: BTreeSet<_> = merged.findings.iter().map(|f| f.risk_type).collect();

    DetectionMetadata {
        total_functions: model.functions().len(),
        successfully_parsed: model.terminated_function_count(),
        patterns_checked: merged.patterns_checked,
        patterns_matched: matched.len(),
    }
}
