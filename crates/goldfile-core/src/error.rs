use std::{io, path::PathBuf};

use thiserror::Error;

/// Failures that prevent a gold file from being read or written.
///
/// Content mismatches are not errors; they surface as
/// [`Outcome::Fail`](crate::gold::Outcome::Fail) and go to the reporter.
#[derive(Debug, Error)]
pub enum GoldError {
    #[error("gold file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to read update content: {source}")]
    ReadInput {
        #[source]
        source: io::Error,
    },
    #[error("failed to encode json gold content: {0}")]
    Json(#[from] serde_json::Error),
}

impl GoldError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns the underlying I/O error kind when there is one.
    #[must_use]
    pub fn io_kind(&self) -> Option<io::ErrorKind> {
        match self {
            Self::Io { source, .. } | Self::ReadInput { source } => Some(source.kind()),
            Self::Json(_) => None,
        }
    }
}

pub type Result<T, E = GoldError> = std::result::Result<T, E>;
