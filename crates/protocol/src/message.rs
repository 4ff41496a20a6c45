use std::fmt;

use crate::ack::{ACK_FATAL, ACK_WARNING, AckCode};
use crate::error::ProtocolError;
use crate::mode::{format_mode, parse_decimal, parse_permissions};

/// Line terminator for every control message.
pub const LF: u8 = b'\n';

/// Modification and access times carried by a `T` message, in whole seconds.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Timestamps {
    /// Seconds since the Unix epoch of the last modification.
    pub modified: u64,
    /// Seconds since the Unix epoch of the last access.
    pub accessed: u64,
}

/// Message kind selected by the first character of a control line.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum MessageTag {
    /// `T`
    Timestamp,
    /// `C`
    File,
    /// `D`
    Directory,
    /// `E`
    DirectoryEnd,
    /// Byte 1 or 2.
    RemoteError,
    /// Anything else.
    Unrecognized,
}

impl MessageTag {
    /// Classifies a control line by its first byte.
    #[must_use]
    pub const fn of(first: u8) -> Self {
        match first {
            b'T' => Self::Timestamp,
            b'C' => Self::File,
            b'D' => Self::Directory,
            b'E' => Self::DirectoryEnd,
            ACK_WARNING | ACK_FATAL => Self::RemoteError,
            _ => Self::Unrecognized,
        }
    }
}

/// A decoded control line.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ControlMessage {
    /// `T<mtime> 0 <atime> 0`: times for the next `C` or `D` header.
    Timestamp(Timestamps),
    /// `C<mode> <size> <name>`: a regular file of `size` bytes follows.
    File {
        /// Permission bits.
        mode: u32,
        /// Exact payload length in bytes.
        size: u64,
        /// Entry name relative to the current directory.
        name: String,
    },
    /// `D<mode> 0 <name>`: a directory is entered.
    Directory {
        /// Permission bits.
        mode: u32,
        /// Entry name relative to the current directory.
        name: String,
    },
    /// `E`: the most recently entered directory is complete.
    DirectoryEnd,
    /// Byte 1 or 2 followed by a diagnostic from the remote `scp`.
    RemoteError {
        /// Which error byte introduced the line.
        code: AckCode,
        /// The diagnostic text.
        message: String,
    },
    /// A line whose first character is outside the vocabulary.
    Unrecognized(String),
}

impl ControlMessage {
    /// Decodes a control line with its terminating LF already removed.
    ///
    /// Header lines split into at most the expected number of fields, so the
    /// entry name keeps any spaces it contains.
    pub fn parse(line: &str) -> Result<Self, ProtocolError> {
        let Some(&first) = line.as_bytes().first() else {
            return Err(ProtocolError::EmptyMessage);
        };

        match MessageTag::of(first) {
            MessageTag::Timestamp => {
                let [modified, modified_usec, accessed, accessed_usec] = split_fields(line)?;
                let modified = parse_decimal("last modified time", &modified[1..])?;
                parse_decimal("last modified microseconds", modified_usec)?;
                let accessed = parse_decimal("last access time", accessed)?;
                parse_decimal("last access microseconds", accessed_usec)?;
                Ok(Self::Timestamp(Timestamps { modified, accessed }))
            }
            MessageTag::File => {
                let [mode, size, name] = split_fields(line)?;
                Ok(Self::File {
                    mode: parse_permissions(mode)?,
                    size: parse_decimal("length", size)?,
                    name: name.to_owned(),
                })
            }
            MessageTag::Directory => {
                let [mode, length, name] = split_fields(line)?;
                let length = parse_decimal("dir length", length)?;
                if length != 0 {
                    return Err(ProtocolError::DirectoryLength(length));
                }
                Ok(Self::Directory {
                    mode: parse_permissions(mode)?,
                    name: name.to_owned(),
                })
            }
            MessageTag::DirectoryEnd => Ok(Self::DirectoryEnd),
            MessageTag::RemoteError => Ok(Self::RemoteError {
                code: AckCode::from_byte(first).unwrap_or(AckCode::Fatal),
                message: line[1..].to_owned(),
            }),
            MessageTag::Unrecognized => Ok(Self::Unrecognized(line.to_owned())),
        }
    }

    /// Returns the kind of this message.
    #[must_use]
    pub const fn tag(&self) -> MessageTag {
        match self {
            Self::Timestamp(_) => MessageTag::Timestamp,
            Self::File { .. } => MessageTag::File,
            Self::Directory { .. } => MessageTag::Directory,
            Self::DirectoryEnd => MessageTag::DirectoryEnd,
            Self::RemoteError { .. } => MessageTag::RemoteError,
            Self::Unrecognized(_) => MessageTag::Unrecognized,
        }
    }
}

/// Renders the control line without its terminating LF.
impl fmt::Display for ControlMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timestamp(times) => write!(f, "T{} 0 {} 0", times.modified, times.accessed),
            Self::File { mode, size, name } => {
                write!(f, "{} {size} {name}", format_mode('C', *mode))
            }
            Self::Directory { mode, name } => write!(f, "{} 0 {name}", format_mode('D', *mode)),
            Self::DirectoryEnd => f.write_str("E"),
            Self::RemoteError { code, message } => {
                write!(f, "{}{message}", char::from(code.as_byte()))
            }
            Self::Unrecognized(line) => f.write_str(line),
        }
    }
}

/// Splits `line` into exactly `N` space-separated fields, the last taking the
/// remainder of the line.
fn split_fields<const N: usize>(line: &str) -> Result<[&str; N], ProtocolError> {
    let mut fields = [""; N];
    let mut parts = line.splitn(N, ' ');
    for slot in &mut fields {
        match parts.next() {
            Some(part) if !part.is_empty() => *slot = part,
            _ => {
                return Err(ProtocolError::FieldCount {
                    line: line.to_owned(),
                    expected: N,
                });
            }
        }
    }
    Ok(fields)
}

/// Accepts `name` only when it denotes a single entry inside the current
/// directory.
pub fn check_entry_name(name: &str) -> Result<&str, ProtocolError> {
    if name.is_empty() || name == "." || name == ".." || name.contains('/') || name.contains('\0')
    {
        return Err(ProtocolError::UnsafeName(name.to_owned()));
    }
    Ok(name)
}
