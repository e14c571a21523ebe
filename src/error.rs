use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failures that surface to callers.
///
/// Per-line decode errors never appear here. Skipping a malformed line is
/// policy, not failure: logs are read while another process may still be
/// appending to them, so a torn final line is expected. Skips are reported
/// through [`StreamStats`](crate::StreamStats) and `log` diagnostics
/// instead.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The log file could not be opened.
    #[error("failed to open log file {}", path.display())]
    Open {
        /// Path of the file that failed to open.
        path: PathBuf,
        /// The underlying cause.
        source: io::Error,
    },

    /// The stream failed mid-read. Terminal for the current pass.
    #[error("i/o error while reading event stream")]
    Read(#[from] io::Error),
}
