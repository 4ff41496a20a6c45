//! crates/logging/src/tracing_macros.rs
//! Convenience macros for scp-specific tracing.
//!
//! These macros wrap the standard tracing macros with the targets listed in
//! [`crate::targets`]. Callers must depend on `tracing` themselves.

/// Emit a protocol exchange trace.
///
/// # Example
/// ```ignore
/// trace_proto!("sending message: {}", line);
/// ```
#[macro_export]
macro_rules! trace_proto {
    ($($arg:tt)*) => {
        ::tracing::debug!(target: $crate::targets::PROTOCOL, $($arg)*);
    };
}

/// Emit a transfer summary trace.
///
/// # Example
/// ```ignore
/// trace_xfer!("{} KiB transferred", kib);
/// ```
#[macro_export]
macro_rules! trace_xfer {
    ($($arg:tt)*) => {
        ::tracing::info!(target: $crate::targets::TRANSFER, $($arg)*);
    };
}

/// Emit a remote session lifecycle trace.
///
/// # Example
/// ```ignore
/// trace_session!("starting remote command: {}", command);
/// ```
#[macro_export]
macro_rules! trace_session {
    ($($arg:tt)*) => {
        ::tracing::debug!(target: $crate::targets::SESSION, $($arg)*);
    };
}

/// Emit a local attribute trace.
///
/// # Example
/// ```ignore
/// trace_attrs!("setting mode {:o} on {}", mode, path.display());
/// ```
#[macro_export]
macro_rules! trace_attrs {
    ($($arg:tt)*) => {
        ::tracing::debug!(target: $crate::targets::ATTRS, $($arg)*);
    };
}

/// Emit an I/O operation trace.
///
/// # Example
/// ```ignore
/// trace_io!("copied {} of {} bytes", done, total);
/// ```
#[macro_export]
macro_rules! trace_io {
    ($($arg:tt)*) => {
        ::tracing::trace!(target: $crate::targets::IO, $($arg)*);
    };
}
