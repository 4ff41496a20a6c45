use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Failure to read or apply a local attribute.
#[derive(Debug, Error)]
#[error("failed to {context} for {}: {source}", path.display())]
pub struct MetadataError {
    context: &'static str,
    path: PathBuf,
    #[source]
    source: io::Error,
}

impl MetadataError {
    /// Wraps `source` with the operation that failed and the affected path.
    pub fn new(context: &'static str, path: &Path, source: io::Error) -> Self {
        Self {
            context,
            path: path.to_path_buf(),
            source,
        }
    }

    /// Describes the operation that failed.
    #[must_use]
    pub const fn context(&self) -> &'static str {
        self.context
    }

    /// Returns the path the operation targeted.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the kind of the underlying I/O error.
    #[must_use]
    pub fn kind(&self) -> io::ErrorKind {
        self.source.kind()
    }

    /// Consumes the error and returns the underlying I/O error.
    #[must_use]
    pub fn into_io_error(self) -> io::Error {
        self.source
    }
}
