#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `logging` gives every crate in the workspace the same tracing vocabulary.
//! Library code never installs a subscriber; it emits events through the
//! target-bound macros in this crate ([`trace_proto!`], [`trace_xfer!`],
//! [`trace_session!`], [`trace_attrs!`], [`trace_io!`]) so that a front-end
//! can filter by subsystem. Binaries call [`init_tracing`] once with a
//! [`VerbosityConfig`] derived from their `-v` count.
//!
//! # Targets
//!
//! | Macro | Target | Level |
//! |-------|--------|-------|
//! | [`trace_proto!`] | `scp::protocol` | debug |
//! | [`trace_xfer!`] | `scp::transfer` | info |
//! | [`trace_session!`] | `scp::session` | debug |
//! | [`trace_attrs!`] | `scp::attrs` | debug |
//! | [`trace_io!`] | `scp::io` | trace |
//!
//! # Examples
//!
//! ```
//! use logging::VerbosityConfig;
//!
//! let config = VerbosityConfig::from_verbose_level(2);
//! assert_eq!(config.filter_directive(), "warn,scp=debug");
//! ```

mod config;
mod subscriber;
mod tracing_macros;

pub use config::{LOG_ENV_VAR, VerbosityConfig};
pub use subscriber::{build_filter, init_tracing};

/// Tracing targets used by the workspace macros.
pub mod targets {
    /// Control-line exchange and acknowledgements.
    pub const PROTOCOL: &str = "scp::protocol";
    /// Payload throughput summaries.
    pub const TRANSFER: &str = "scp::transfer";
    /// Remote command lifecycle.
    pub const SESSION: &str = "scp::session";
    /// Local permission and timestamp application.
    pub const ATTRS: &str = "scp::attrs";
    /// Chunk-level reads and writes.
    pub const IO: &str = "scp::io";
}
