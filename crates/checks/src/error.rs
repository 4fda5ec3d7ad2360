//! Fatal boundary errors.
//!
//! Everything else the engine hits at runtime (a check failing, a warmup
//! throwing, one bad output record) is recovered locally and reported on the
//! error stream; only the conditions here terminate a run.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("input file not found: {0}")]
    InputNotFound(PathBuf),

    #[error("invalid JSON in input file: {0}")]
    InvalidInput(#[source] serde_json::Error),

    #[error("program_id not found in input")]
    MissingProgramId,

    #[error("no URLs provided in params.urls")]
    NoUrls,

    #[error("no checks registered")]
    EmptyRegistry,

    #[error("failed to build worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
