#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `engine` drives SCP transfers over a [`scp_io::RemoteShell`]. It owns the
//! acknowledgement-driven exchange with the remote `scp` command and turns
//! the announced tree into local files (download) or announces a local tree
//! (upload).
//!
//! # Design
//!
//! - [`ScpEngine`] wraps one remote invocation and provides the primitives:
//!   line framing, acknowledgements, exact-length payload streaming and
//!   teardown. A fresh engine is started for every copy.
//! - [`DownloadClient`] runs the sink state machine against `scp -f`.
//! - [`UploadClient`] runs the source state machine against `scp -t`.
//! - [`TargetResolver`] maps announced names onto local paths and
//!   [`TransferListener`] receives progress events.
//!
//! # Invariants
//!
//! - Every line the local side sends is followed by waiting for one
//!   acknowledgement byte; nothing is pipelined.
//! - Acknowledgement codes 1 and 2 both abort the copy with
//!   [`ScpError::Remote`].
//! - Each opened directory receives exactly two local acknowledgements, one
//!   for its `D` header and one for its `E`.
//! - The session is closed exactly once per copy, whether it succeeds or
//!   fails.
//!
//! # Examples
//!
//! ```no_run
//! use engine::{CopyOptions, DownloadClient, NoopListener};
//! use metadata::{LocalAttributes, MetadataOptions};
//! use scp_io::{SshCommand, SshShell};
//! use std::path::Path;
//!
//! let mut shell = SshShell::new(SshCommand::new("files.example.com"));
//! let attributes = LocalAttributes::new(MetadataOptions::new().preserve_times(true));
//! let mut client = DownloadClient::new(CopyOptions::new(), attributes);
//! let status = client.copy(&mut shell, &mut NoopListener, "logs", Path::new("."))?;
//! assert_eq!(status, 0);
//! # Ok::<(), engine::ScpError>(())
//! ```

mod download;
mod engine;
mod error;
mod listener;
mod options;
mod resolve;
mod upload;

pub use download::DownloadClient;
pub use engine::{ScpEngine, transfer_bytes};
pub use error::{ScpError, ScpErrorKind, ScpResult};
pub use listener::{NoopListener, TransferListener};
pub use options::CopyOptions;
pub use resolve::{LocalResolver, TargetResolver};
pub use upload::UploadClient;
