use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort an aggregation run.
///
/// Per-record problems (malformed lines) are not errors; they are skipped
/// during the scan. Anything surfaced here is fatal: the run produces no
/// output at all rather than a silently incomplete result.
#[derive(Error, Debug)]
pub enum Error {
    /// The input file could not be opened, sized, or mapped.
    #[error("cannot open input {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A worker failed to read its assigned chunk.
    #[error("chunk read failed: {0}")]
    Io(#[from] io::Error),

    /// The worker pool could not be constructed.
    #[error("worker pool setup failed: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),

    /// A state reachable only through a bug, never through bad input.
    #[error("internal invariant violated: {0}")]
    Invariant(&'static str),
}

pub type Result<T> = std::result::Result<T, Error>;
