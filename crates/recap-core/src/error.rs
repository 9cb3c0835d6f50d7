//! Stage-level failures of the processing pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort the run for one asset.
///
/// Chunk- and segment-granular failures are recovered inside their own loops
/// and never surface here; a variant below means an entire stage produced
/// nothing usable.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The source asset cannot be processed at all (missing, unsupported
    /// format, empty, or unreadable as audio).
    #[error("cannot process {path}: {reason}")]
    Input { path: PathBuf, reason: String },

    /// Every chunk transcription in the cohort failed.
    #[error("no chunk of {path} produced a transcript")]
    NoFragments { path: PathBuf },

    /// Every segment summarization in the cohort failed.
    #[error("no transcript segment produced a summary")]
    NoSegmentSummaries,

    /// A terminal remote call failed (direct or final summarization, which
    /// have no sibling attempts to fall back on).
    #[error("{operation} failed: {cause}")]
    Remote {
        operation: &'static str,
        cause: anyhow::Error,
    },

    /// Output locations could not be prepared or written.
    #[error("failed to persist outputs: {0}")]
    Persist(#[from] std::io::Error),
}
