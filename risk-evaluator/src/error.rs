//! Error types for the risk evaluator

use thiserror::Error;

/// Risk evaluator error
#[derive(Debug, Error)]
pub enum Error {
    /// A required transaction field was missing or blank
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// Transaction amount was zero or negative
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// Document analysis failed; surfaced by analyzers, degraded to an
    /// unverifiable review by the aggregation layer
    #[error("document analysis failed: {0}")]
    DocumentAnalysis(String),
}

/// Result type
pub type Result<T> = std::result::Result<T, Error>;
