//! Shared test utilities for the oc-scp workspace.
//!
//! - [`Script`] assembles the byte stream a remote `scp` would emit.
//! - [`ScriptedShell`] replays such a stream as an in-memory session and
//!   records everything written back.
//! - [`RecordingListener`] captures transfer events in order.
//! - [`tree`] builds and snapshots small directory trees under `tempfile`.

#![allow(missing_docs)]

mod listener;
mod shell;
pub mod tree;

pub use listener::{Event, RecordingListener};
pub use shell::{Script, ScriptedSession, ScriptedShell};
