//! Error types for ldmlprune

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::xml;

/// Failure while scanning or pruning a locale directory
#[derive(Debug, Error)]
pub enum Error {
    /// A directory or file could not be listed, read or removed
    #[error("i/o error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// A file is not well-formed XML
    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: xml::Error,
    },
    #[error("{} is not a directory", .path.display())]
    NotADirectory { path: PathBuf },
}

impl Error {
    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn parse(path: impl AsRef<Path>, source: xml::Error) -> Self {
        Self::Parse {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Path of the entry that caused the failure
    pub fn path(&self) -> &Path {
        match self {
            Self::Io { path, .. } | Self::Parse { path, .. } | Self::NotADirectory { path } => {
                path
            }
        }
    }
}

/// Result type alias for ldmlprune
pub type Result<T> = std::result::Result<T, Error>;
