use thiserror::Error;

use crate::ids::RecordId;

/// Top-level error type for Hype Cycle analysis.
#[derive(Debug, Error)]
pub enum HypeCycleError {
    // --- Fatal to a run (no partial result is produced) ---
    /// Fewer dated records than the configured minimum.
    #[error(
        "Insufficient data: {usable} usable records, {required} required ({skipped} malformed records skipped)"
    )]
    InsufficientData {
        usable: usize,
        required: usize,
        skipped: usize,
    },

    #[error("Configuration error: {0}")]
    Configuration(String),

    // --- Absorbed by the extractor (record skipped and counted) ---
    #[error("Malformed record {id}: {reason}")]
    MalformedRecord { id: RecordId, reason: String },

    // --- Operational errors ---
    #[error("{0}")]
    Internal(String),
}

impl HypeCycleError {
    /// Short label used for failure metrics.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::InsufficientData { .. } => "insufficient_data",
            Self::Configuration(_) => "configuration",
            Self::MalformedRecord { .. } => "malformed_record",
            Self::Internal(_) => "internal",
        }
    }
}

/// Result type alias for Hype Cycle operations.
pub type Result<T> = std::result::Result<T, HypeCycleError>;
