#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `scp_io` is the boundary between the SCP engine and whatever executes the
//! remote `scp` command. The engine only sees the two traits defined in
//! [`session`]: a [`RemoteShell`] starts a command and yields a
//! [`RemoteSession`], whose [`Read`](std::io::Read) half is the command's
//! stdout and whose [`Write`](std::io::Write) half is its stdin.
//!
//! The crate ships one production transport, [`SshShell`], which spawns the
//! system `ssh` client (or any program configured through
//! [`SshCommand::configure_remote_shell`]) and exposes the child process as an
//! [`SshConnection`].
//!
//! # Invariants
//!
//! - [`RemoteSession::close`] is safe to call more than once.
//! - Exit status and signal are only known after `close` has returned.
//! - Standard error is drained in the background so a chatty remote command
//!   never blocks on a full pipe.
//!
//! # Examples
//!
//! ```
//! use scp_io::{Operand, parse_operand};
//!
//! let Operand::Remote(remote) = parse_operand("deploy@web1:/var/www") else {
//!     panic!("expected a remote operand");
//! };
//! assert_eq!(remote.user(), Some("deploy"));
//! assert_eq!(remote.host(), "web1");
//! assert_eq!(remote.path(), "/var/www");
//! ```

mod operand;
pub mod session;
mod ssh;

pub use operand::{Operand, RemoteOperand, parse_operand};
pub use session::{DEFAULT_MAX_PACKET_SIZE, RemoteSession, RemoteShell, UNKNOWN_EXIT_STATUS};
pub use ssh::{RemoteShellParseError, SshCommand, SshConnection, SshShell, parse_remote_shell};
