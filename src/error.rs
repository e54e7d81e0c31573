// =============================================================================
// Analysis error types
// =============================================================================
//
// Two terminal error kinds cover the whole request lifecycle: the input was
// unusable (empty series, insufficient history, malformed query) or the
// history provider could not supply data. Neither is retried here — the
// caller surfaces a message and lets the user re-submit.

use thiserror::Error;

/// Errors produced by the analysis pipeline.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The request or the series it produced cannot be analyzed.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The history provider failed or returned no bars.
    #[error("data unavailable: {0}")]
    DataUnavailable(String),
}

/// Result alias used throughout the analysis pipeline.
pub type AnalysisResult<T> = Result<T, AnalysisError>;
