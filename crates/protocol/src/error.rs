//! crates/protocol/src/error.rs
//!
//! Errors raised while decoding the SCP control stream.

use std::io;

use thiserror::Error;

/// Malformed or unexpected protocol traffic.
///
/// Every variant is fatal to the copy in progress. Variants carry the
/// offending text so diagnostics can quote exactly what the peer sent.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum ProtocolError {
    /// A control line contained no characters at all.
    #[error("could not parse empty message from remote scp")]
    EmptyMessage,
    /// A control line did not split into the expected number of fields.
    #[error("could not parse message received from remote scp: `{line}` (expected {expected} fields)")]
    FieldCount {
        /// The raw control line.
        line: String,
        /// Number of space-separated fields the message kind requires.
        expected: usize,
    },
    /// A permission field was not a letter followed by four octal digits.
    #[error("could not parse permissions from `{0}`")]
    Permissions(String),
    /// A numeric field was not a non-negative decimal integer.
    #[error("could not parse {field} from `{text}`")]
    Number {
        /// Human-readable name of the field.
        field: &'static str,
        /// The text that failed to parse.
        text: String,
    },
    /// A directory header declared a length other than zero.
    #[error("remote scp command sent strange directory length: {0}")]
    DirectoryLength(u64),
    /// The first character of a control line is not part of the vocabulary.
    #[error("unrecognized message: `{0}`")]
    Unrecognized(String),
    /// An acknowledgement byte other than 0, 1 or 2 arrived.
    #[error("received unknown response code {0}")]
    UnknownResponse(u8),
    /// A control line is not valid UTF-8; carries a lossy rendering.
    #[error("remote scp sent a control message that is not valid UTF-8: `{0}`")]
    NotUtf8(String),
    /// An announced entry name is not a single path component.
    #[error("remote scp command sent unsafe entry name `{0}`")]
    UnsafeName(String),
}

impl From<ProtocolError> for io::Error {
    fn from(err: ProtocolError) -> Self {
        Self::new(io::ErrorKind::InvalidData, err)
    }
}
