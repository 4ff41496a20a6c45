#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `cli` implements the `oc-scp` command-line front-end. It parses the
//! familiar `scp` switches (`-r`, `-p`, `-q`, `-v`, `-P`, `-i`, `-o`, `-S`)
//! plus `-e`/`--rsh`, classifies the two operands, and drives either an
//! [`engine::DownloadClient`] or an [`engine::UploadClient`] over an
//! [`scp_io::SshShell`].
//!
//! # Design
//!
//! [`run`] takes the argument iterator together with handles for standard
//! output and error so tests can exercise the whole front-end in memory.
//! Parsing is done with [`clap`]; the built-in help and version flags are
//! disabled so their output stays under this crate's control.
//!
//! # Invariants
//!
//! - `run` never panics; failures are reported on stderr with an `oc-scp:`
//!   prefix and exit code `1`.
//! - Exactly one operand is remote. Remote-to-remote and local-to-local
//!   copies are rejected before any process is spawned.
//! - A remote exit status outside `0..=255` (including an unknown status)
//!   maps to `1`.
//!
//! # Examples
//!
//! ```
//! use cli::run;
//!
//! let mut stdout = Vec::new();
//! let mut stderr = Vec::new();
//! let exit_code = run(["oc-scp", "--version"], &mut stdout, &mut stderr);
//!
//! assert_eq!(exit_code, 0);
//! assert!(String::from_utf8(stdout).unwrap().starts_with("oc-scp "));
//! ```

use std::ffi::OsString;
use std::fmt::Display;
use std::io::Write;
use std::process::ExitCode;

use engine::{CopyOptions, DownloadClient, UploadClient};
use logging::{VerbosityConfig, init_tracing};
use metadata::{LocalAttributes, MetadataOptions};
use scp_io::SshShell;

mod arguments;
mod progress;
mod transfer;

use arguments::{ParsedArgs, parse_args};
use progress::ProgressPrinter;
use transfer::{Transfer, ssh_command};

/// Largest exit code a process can report.
const MAX_EXIT_CODE: i32 = 255;

const HELP_TEXT: &str = concat!(
    "oc-scp ",
    env!("CARGO_PKG_VERSION"),
    "\n",
    "Copy files to or from a remote host over ssh.\n",
    "\n",
    "Usage: oc-scp [OPTIONS] SOURCE TARGET\n",
    "\n",
    "Exactly one of SOURCE and TARGET must be remote ([user@]host:path).\n",
    "\n",
    "Options:\n",
    "  -r               Copy directories recursively.\n",
    "  -p               Preserve modification and access times.\n",
    "  -q               Do not print per-file progress.\n",
    "  -v               Increase diagnostic output (repeatable).\n",
    "  -P PORT          Connect to PORT on the remote host.\n",
    "  -i IDENTITY      Pass IDENTITY to ssh as the identity file.\n",
    "  -o SSH_OPTION    Pass an option to ssh (repeatable).\n",
    "  -S PROGRAM       Use PROGRAM instead of ssh.\n",
    "  -e, --rsh SHELL  Use the quoted remote shell command line SHELL.\n",
    "  -h, --help       Show this help message and exit.\n",
    "  -V, --version    Output version information and exit.\n",
);

/// Runs the front-end with the provided arguments and output handles.
///
/// Returns the process exit code the caller should use.
pub fn run<I, S, Out, Err>(arguments: I, stdout: &mut Out, stderr: &mut Err) -> i32
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
    Out: Write,
    Err: Write,
{
    match parse_args(arguments) {
        Ok(parsed) => execute(parsed, stdout, stderr),
        Err(error) => {
            let rendered = error.to_string();
            report(stderr, rendered.trim_end());
            1
        }
    }
}

/// Converts a numeric exit code into an [`ExitCode`].
#[must_use]
pub fn exit_code_from(status: i32) -> ExitCode {
    let clamped = status.clamp(0, MAX_EXIT_CODE);
    ExitCode::from(u8::try_from(clamped).unwrap_or(u8::MAX))
}

fn report<W: Write>(stderr: &mut W, message: impl Display) {
    let _ = writeln!(stderr, "oc-scp: {message}");
}

fn execute<Out, Err>(parsed: ParsedArgs, stdout: &mut Out, stderr: &mut Err) -> i32
where
    Out: Write,
    Err: Write,
{
    if parsed.show_help {
        return i32::from(stdout.write_all(HELP_TEXT.as_bytes()).is_err());
    }
    if parsed.show_version {
        let banner = format!("oc-scp {}\n", env!("CARGO_PKG_VERSION"));
        return i32::from(stdout.write_all(banner.as_bytes()).is_err());
    }

    let transfer = match Transfer::from_operands(&parsed.operands) {
        Ok(transfer) => transfer,
        Err(error) => {
            report(stderr, error);
            return 1;
        }
    };

    init_tracing(VerbosityConfig::from_verbose_level(parsed.verbose));

    let template = match ssh_command(&parsed, transfer.remote()) {
        Ok(template) => template,
        Err(error) => {
            report(stderr, error);
            return 1;
        }
    };
    let mut shell = SshShell::new(template);

    let options = CopyOptions::new()
        .recursive(parsed.recursive)
        .verbose_remote(parsed.verbose > 0);
    let attributes =
        LocalAttributes::new(MetadataOptions::new().preserve_times(parsed.preserve_times));
    let mut progress = ProgressPrinter::new(stdout, parsed.quiet);

    let result = match &transfer {
        Transfer::Download { local, .. } => DownloadClient::new(options, attributes).copy(
            &mut shell,
            &mut progress,
            transfer.remote_path(),
            local,
        ),
        Transfer::Upload { local, .. } => UploadClient::new(options, attributes).copy(
            &mut shell,
            &mut progress,
            local,
            transfer.remote_path(),
        ),
    };

    match result {
        Ok(status) => {
            tracing::info!(files = progress.files(), status, "copy finished");
            if (0..=MAX_EXIT_CODE).contains(&status) {
                status
            } else {
                1
            }
        }
        Err(error) => {
            report(stderr, error);
            1
        }
    }
}
