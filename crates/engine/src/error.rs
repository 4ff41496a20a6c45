//! Error taxonomy shared by the download and upload state machines.

use std::io;

use metadata::MetadataError;
use protocol::{AckCode, ProtocolError};
use thiserror::Error;

/// Result type for engine operations.
pub type ScpResult<T> = Result<T, ScpError>;

/// Reasons a copy attempt aborts.
///
/// Every variant is fatal to the current copy. A non-zero remote exit status
/// is not an error; it is returned from `copy` instead.
#[derive(Debug, Error)]
pub enum ScpError {
    /// The peer sent a malformed or unexpected message.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
    /// The peer closed the stream before the expected data arrived.
    #[error("unexpected end of stream while {context}{}", stderr_suffix(.stderr))]
    Eof {
        /// What the engine was waiting for.
        context: String,
        /// Standard error captured from the remote command, possibly empty.
        stderr: String,
    },
    /// The peer answered with an error acknowledgement.
    #[error("remote scp reported: {message}")]
    Remote {
        /// The acknowledgement byte that introduced the message.
        code: AckCode,
        /// Diagnostic text sent by the peer.
        message: String,
    },
    /// Creating, reading or writing a local entry failed.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// The remote command could not be started.
    #[error("failed to start remote command '{command}': {source}")]
    Channel {
        /// The command line that was requested.
        command: String,
        /// Underlying failure reported by the shell.
        #[source]
        source: io::Error,
    },
    /// Applying or reading local attributes failed.
    #[error(transparent)]
    Metadata(#[from] MetadataError),
}

fn stderr_suffix(stderr: &str) -> String {
    if stderr.is_empty() {
        String::new()
    } else {
        format!(" (remote stderr: {stderr})")
    }
}

/// Copyable classification of an [`ScpError`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ScpErrorKind {
    /// See [`ScpError::Protocol`].
    Protocol,
    /// See [`ScpError::Eof`].
    Eof,
    /// See [`ScpError::Remote`].
    Remote,
    /// See [`ScpError::Io`] and [`ScpError::Metadata`].
    LocalIo,
    /// See [`ScpError::Channel`].
    Channel,
}

impl ScpError {
    /// Builds an [`ScpError::Eof`] without captured stderr.
    pub fn eof(context: impl Into<String>) -> Self {
        Self::Eof {
            context: context.into(),
            stderr: String::new(),
        }
    }

    /// Classifies the error.
    #[must_use]
    pub const fn kind(&self) -> ScpErrorKind {
        match self {
            Self::Protocol(_) => ScpErrorKind::Protocol,
            Self::Eof { .. } => ScpErrorKind::Eof,
            Self::Remote { .. } => ScpErrorKind::Remote,
            Self::Io(_) | Self::Metadata(_) => ScpErrorKind::LocalIo,
            Self::Channel { .. } => ScpErrorKind::Channel,
        }
    }

    /// Attaches remote stderr text to an [`ScpError::Eof`] that has none.
    #[must_use]
    pub fn with_stderr(self, text: String) -> Self {
        match self {
            Self::Eof { context, stderr } if stderr.is_empty() => Self::Eof {
                context,
                stderr: text,
            },
            other => other,
        }
    }
}

impl From<ScpError> for io::Error {
    fn from(error: ScpError) -> Self {
        match error {
            ScpError::Io(inner) => inner,
            ScpError::Metadata(inner) => inner.into_io_error(),
            ScpError::Eof { .. } => io::Error::new(io::ErrorKind::UnexpectedEof, error),
            ScpError::Channel { .. } => io::Error::new(io::ErrorKind::NotConnected, error),
            ScpError::Protocol(_) | ScpError::Remote { .. } => {
                io::Error::new(io::ErrorKind::InvalidData, error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eof_display_includes_stderr_when_present() {
        let bare = ScpError::eof("awaiting acknowledgement");
        assert_eq!(
            bare.to_string(),
            "unexpected end of stream while awaiting acknowledgement"
        );

        let enriched = bare.with_stderr("scp: /nope: No such file or directory".to_owned());
        assert_eq!(
            enriched.to_string(),
            "unexpected end of stream while awaiting acknowledgement \
             (remote stderr: scp: /nope: No such file or directory)"
        );
    }

    #[test]
    fn with_stderr_keeps_existing_text() {
        let error = ScpError::Eof {
            context: "reading".to_owned(),
            stderr: "first".to_owned(),
        }
        .with_stderr("second".to_owned());
        assert!(matches!(error, ScpError::Eof { ref stderr, .. } if stderr == "first"));
    }

    #[test]
    fn kinds_cover_the_taxonomy() {
        assert_eq!(
            ScpError::from(ProtocolError::DirectoryLength(4)).kind(),
            ScpErrorKind::Protocol
        );
        assert_eq!(
            ScpError::Remote {
                code: AckCode::Warning,
                message: "w".to_owned()
            }
            .kind(),
            ScpErrorKind::Remote
        );
        assert_eq!(
            ScpError::from(io::Error::other("disk")).kind(),
            ScpErrorKind::LocalIo
        );
        assert_eq!(
            ScpError::Channel {
                command: "scp -f .".to_owned(),
                source: io::Error::other("refused"),
            }
            .kind(),
            ScpErrorKind::Channel
        );
    }

    #[test]
    fn converts_into_io_error() {
        let io_error: io::Error = ScpError::eof("reading").into();
        assert_eq!(io_error.kind(), io::ErrorKind::UnexpectedEof);

        let io_error: io::Error = ScpError::from(ProtocolError::EmptyMessage).into();
        assert_eq!(io_error.kind(), io::ErrorKind::InvalidData);

        let original = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let io_error: io::Error = ScpError::from(original).into();
        assert_eq!(io_error.kind(), io::ErrorKind::PermissionDenied);
    }
}
