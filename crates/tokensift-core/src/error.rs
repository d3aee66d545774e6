use thiserror::Error;

/// Failure modes of the analysis core.
///
/// None of these abort an analysis on their own: detector failures are
/// collected and reported as warnings, and unsupported input is advisory
/// unless the caller asked for strict handling.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Error {
    #[error("unsupported input: {reason}")]
    UnsupportedInput { reason: String },

    #[error("detector `{detector}` failed: {message}")]
    DetectorFailure {
        detector: &'static str,
        message: String,
    },

    #[error("pattern `{0}` is unavailable")]
    PatternUnavailable(&'static str),
}
