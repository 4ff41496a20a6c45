#![deny(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(missing_docs)]

//! Wire vocabulary for the SCP control stream.
//!
//! SCP runs over the standard input and output of a remote `scp` process.
//! Control information travels as LF-terminated ASCII lines whose first
//! character selects the message kind, each step confirmed by a single
//! acknowledgement byte. This crate owns that vocabulary without performing
//! any I/O: higher layers read bytes from a session and hand complete lines to
//! [`ControlMessage::parse`], or render outgoing messages through
//! [`ControlMessage`]'s [`Display`](std::fmt::Display) implementation.
//!
//! # Examples
//!
//! Decode a file header announced by a remote source:
//!
//! ```
//! use protocol::ControlMessage;
//!
//! let message = ControlMessage::parse("C0644 5 hello.txt").unwrap();
//! assert_eq!(
//!     message,
//!     ControlMessage::File { mode: 0o644, size: 5, name: "hello.txt".to_owned() }
//! );
//! assert_eq!(message.to_string(), "C0644 5 hello.txt");
//! ```
//!
//! Build the remote command line for a recursive download:
//!
//! ```
//! use protocol::{ScpArg, ScpArgs};
//!
//! let args = ScpArgs::new()
//!     .with(ScpArg::Source)
//!     .with(ScpArg::Quiet)
//!     .with(ScpArg::Recursive);
//! assert_eq!(args.command_line("scp", Some("logs")), "scp -f -q -r logs");
//! assert_eq!(args.command_line("scp", None), "scp -f -q -r .");
//! ```

mod ack;
mod args;
mod error;
mod message;
mod mode;

pub use ack::{ACK_FATAL, ACK_OK, ACK_WARNING, AckCode};
pub use args::{SCP_PROGRAM, ScpArg, ScpArgs, normalize_remote_path};
pub use error::ProtocolError;
pub use message::{ControlMessage, LF, MessageTag, Timestamps, check_entry_name};
pub use mode::{format_mode, parse_decimal, parse_permissions};
