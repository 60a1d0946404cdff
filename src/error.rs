use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures the browser recovers from by showing them on the next frame.
#[derive(Debug, Error)]
pub enum BrowseError {
    #[error("cannot read directory {}: {source}", path.display())]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot remove {}: {source}", path.display())]
    Delete {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{0}")]
    Action(String),
}

impl BrowseError {
    pub fn directory_read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::DirectoryRead {
            path: path.into(),
            source,
        }
    }

    pub fn delete(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Delete {
            path: path.into(),
            source,
        }
    }
}
