#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! Local attribute handling for SCP transfers.
//!
//! The receiving side applies the permission bits announced in `C`/`D`
//! headers and, when time preservation is on, the times from the preceding
//! `T` message. The sending side reads the same attributes from local files.
//! Both directions go through the traits in this crate so the engine never
//! touches platform APIs directly:
//!
//! - [`ModeSetter`]: consumed by the download state machine.
//! - [`ModeGetter`]: consumed by the upload state machine.
//! - [`LocalAttributes`]: the filesystem-backed implementation of both,
//!   configured through [`MetadataOptions`].

mod attributes;
mod error;
mod options;

pub use attributes::{LocalAttributes, ModeGetter, ModeSetter, TimesPolicy};
pub use error::MetadataError;
pub use options::MetadataOptions;
