use crate::error::ProtocolError;

/// Acknowledgement byte confirming a protocol step.
pub const ACK_OK: u8 = 0;
/// Acknowledgement byte announcing a warning, followed by a message line.
pub const ACK_WARNING: u8 = 1;
/// Acknowledgement byte announcing a fatal error, followed by a message line.
pub const ACK_FATAL: u8 = 2;

/// Typed view of the single-byte acknowledgements exchanged after each step.
///
/// OpenSSH labels code 1 a warning. The engine nevertheless treats
/// [`AckCode::Warning`] exactly like [`AckCode::Fatal`] and aborts the copy.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum AckCode {
    /// The peer accepted the step.
    Ok,
    /// The peer reported a problem it labels non-fatal.
    Warning,
    /// The peer reported a fatal problem.
    Fatal,
}

impl AckCode {
    /// Maps a received byte to its acknowledgement code.
    #[must_use]
    pub const fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            ACK_OK => Some(Self::Ok),
            ACK_WARNING => Some(Self::Warning),
            ACK_FATAL => Some(Self::Fatal),
            _ => None,
        }
    }

    /// Returns the wire byte for this code.
    #[must_use]
    pub const fn as_byte(self) -> u8 {
        match self {
            Self::Ok => ACK_OK,
            Self::Warning => ACK_WARNING,
            Self::Fatal => ACK_FATAL,
        }
    }

    /// Reports whether the code is followed by an error message line.
    #[must_use]
    pub const fn is_error(self) -> bool {
        !matches!(self, Self::Ok)
    }
}

impl TryFrom<u8> for AckCode {
    type Error = ProtocolError;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        Self::from_byte(byte).ok_or(ProtocolError::UnknownResponse(byte))
    }
}
