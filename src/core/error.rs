//! Error taxonomy for a comparison run
//!
//! Every variant is fatal for the run except `NoCandidate`, which the
//! comparator can downgrade to an unresolved result.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompareError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unicode error reading {}", .path.display())]
    Encoding { path: PathBuf },

    #[error("no candidate file to compare with {}", .reference.display())]
    NoCandidate { reference: PathBuf },

    #[error("failed to list files under {}: {source}", .root.display())]
    Listing {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("invalid glob pattern `{pattern}`: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("results root {} does not exist or is not a directory", .root.display())]
    MissingRoot { root: PathBuf },
}

impl CompareError {
    /// Path of the file or directory the error is about, if any
    pub fn path(&self) -> Option<&std::path::Path> {
        let path = match self {
            CompareError::Io { path, .. } | CompareError::Encoding { path } => path,
            CompareError::NoCandidate { reference } => reference,
            CompareError::Listing { root, .. } | CompareError::MissingRoot { root } => root,
            CompareError::Pattern { .. } => return None,
        };
        Some(path.as_path())
    }
}
