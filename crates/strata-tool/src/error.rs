//! Tool error types.

use std::path::PathBuf;

use strata_section::SectionError;

/// Errors that abort a tool command.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// Reading or writing a section file failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// A section file did not decode.
    #[error("failed to decode section {}: {source}", path.display())]
    Decode {
        /// File involved.
        path: PathBuf,
        /// Decoding failure.
        #[source]
        source: SectionError,
    },
}
