//! crates/cli/src/progress.rs
//!
//! Per-file progress reporting for interactive runs.

use std::io::Write;

use engine::TransferListener;

/// Prints one line per completed file.
///
/// Quiet mode keeps the listener installed but suppresses every line so the
/// engine sees the same callbacks either way.
pub(crate) struct ProgressPrinter<'a, W: Write> {
    out: &'a mut W,
    quiet: bool,
    current: Option<(String, u64)>,
    transferred: u64,
    files: u64,
}

impl<'a, W: Write> ProgressPrinter<'a, W> {
    pub(crate) fn new(out: &'a mut W, quiet: bool) -> Self {
        Self {
            out,
            quiet,
            current: None,
            transferred: 0,
            files: 0,
        }
    }

    /// Number of files reported as finished.
    pub(crate) const fn files(&self) -> u64 {
        self.files
    }
}

impl<W: Write> TransferListener for ProgressPrinter<'_, W> {
    fn file_started(&mut self, name: &str, size: u64) {
        self.current = Some((name.to_owned(), size));
        self.transferred = 0;
    }

    fn progress(&mut self, transferred: u64) {
        self.transferred = transferred;
    }

    fn file_finished(&mut self, name: &str) {
        self.files += 1;
        let size = match self.current.take() {
            Some((current, size)) if current == name => size,
            _ => self.transferred,
        };
        if self.quiet {
            return;
        }
        if let Err(error) = writeln!(self.out, "{name}  {size} bytes") {
            tracing::debug!(%error, "progress output failed");
        }
    }
}
