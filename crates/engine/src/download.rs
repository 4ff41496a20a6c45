//! crates/engine/src/download.rs
//!
//! Sink side of the protocol: the remote `scp -f` announces entries and the
//! local side materializes them.
//!
//! Nesting is tracked with an explicit stack of [`Frame`]s instead of
//! recursion, and a `T` message is held in a one-slot pending value until the
//! next `C` or `D` header consumes it.

use std::fs::File;
use std::path::{Path, PathBuf};

use logging::trace_xfer;
use metadata::ModeSetter;
use protocol::{ControlMessage, ProtocolError, ScpArg, ScpArgs, Timestamps};
use scp_io::{RemoteSession, RemoteShell, UNKNOWN_EXIT_STATUS};

use crate::engine::ScpEngine;
use crate::error::{ScpError, ScpResult};
use crate::listener::TransferListener;
use crate::options::CopyOptions;
use crate::resolve::{LocalResolver, TargetResolver};

/// Open directory awaiting its `E`.
#[derive(Debug)]
struct Frame {
    name: String,
    path: PathBuf,
    mode: u32,
    times: Option<Timestamps>,
}

/// Decoder state threaded through [`DownloadClient::step`].
#[derive(Debug)]
struct SinkState {
    root: PathBuf,
    stack: Vec<Frame>,
    pending: Option<Timestamps>,
}

impl SinkState {
    fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            stack: Vec::new(),
            pending: None,
        }
    }

    fn current_dir(&self) -> &Path {
        self.stack.last().map_or(&self.root, |frame| &frame.path)
    }

    /// A message must follow when a directory is open or a `T` awaits its header.
    fn expects_more(&self) -> bool {
        !self.stack.is_empty() || self.pending.is_some()
    }
}

/// Outcome of processing one message.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Flow {
    Continue,
    /// A top-level `E`; nothing remains to decode.
    Done,
}

/// Downloads files and directory trees from a remote `scp`.
#[derive(Debug)]
pub struct DownloadClient<A, R = LocalResolver> {
    options: CopyOptions,
    attributes: A,
    resolver: R,
    exit_status: i32,
}

impl<A: ModeSetter> DownloadClient<A> {
    /// Creates a client that resolves targets with [`LocalResolver`].
    pub fn new(options: CopyOptions, attributes: A) -> Self {
        Self::with_resolver(options, attributes, LocalResolver)
    }
}

impl<A: ModeSetter, R: TargetResolver> DownloadClient<A, R> {
    /// Creates a client with a custom target resolver.
    pub fn with_resolver(options: CopyOptions, attributes: A, resolver: R) -> Self {
        Self {
            options,
            attributes,
            resolver,
            exit_status: UNKNOWN_EXIT_STATUS,
        }
    }

    /// Enables or disables recursive copies.
    pub fn set_recursive(&mut self, recursive: bool) {
        self.options.set_recursive(recursive);
    }

    /// Returns the options in effect.
    #[must_use]
    pub fn options(&self) -> &CopyOptions {
        &self.options
    }

    /// Exit status recorded by the most recent copy, or `-1` when unknown.
    #[must_use]
    pub fn exit_status(&self) -> i32 {
        self.exit_status
    }

    /// Copies the remote `source` into the local `target`.
    ///
    /// The session is always closed before this returns. On success the
    /// remote exit status is returned; on failure it remains available from
    /// [`exit_status`](Self::exit_status).
    pub fn copy<H>(
        &mut self,
        shell: &mut H,
        listener: &mut dyn TransferListener,
        source: &str,
        target: &Path,
    ) -> ScpResult<i32>
    where
        H: RemoteShell + ?Sized,
    {
        self.exit_status = UNKNOWN_EXIT_STATUS;
        let args = ScpArgs::new()
            .with(ScpArg::Source)
            .with(ScpArg::Quiet)
            .with_if(self.options.is_recursive(), ScpArg::Recursive)
            .with_if(self.attributes.preserves_times(), ScpArg::PreserveTimes)
            .with_if(self.options.is_verbose_remote(), ScpArg::Verbose);

        let mut engine =
            ScpEngine::start(shell, self.options.program(), &args, Some(source), listener)?;
        let outcome = self.receive(&mut engine, target);
        self.exit_status = engine.finish();
        outcome.map(|()| self.exit_status)
    }

    fn receive<S>(&self, engine: &mut ScpEngine<'_, S>, target: &Path) -> ScpResult<()>
    where
        S: RemoteSession,
    {
        engine.signal_ack()?;
        let mut state = SinkState::new(target);
        let mut line = engine.read_line(true)?;

        while let Some(text) = line {
            if self.step(engine, &mut state, &text)? == Flow::Done {
                break;
            }
            line = engine.read_line(state.expects_more())?;
        }
        Ok(())
    }

    fn step<S>(
        &self,
        engine: &mut ScpEngine<'_, S>,
        state: &mut SinkState,
        line: &str,
    ) -> ScpResult<Flow>
    where
        S: RemoteSession,
    {
        match ControlMessage::parse(line)? {
            ControlMessage::Timestamp(times) => {
                if let Some(discarded) = state.pending.replace(times) {
                    tracing::warn!(?discarded, "timestamp message not followed by a header");
                }
                engine.signal_ack()?;
            }
            ControlMessage::File { mode, size, name } => {
                let times = state.pending.take();
                let path = self.resolver.file(state.current_dir(), &name)?;
                let mut file = File::create(&path)?;
                engine.listener().file_started(&name, size);
                engine.signal_ack()?;

                let chunk = self.options.effective_chunk_size(engine.max_packet_size());
                engine.receive_payload(&mut file, chunk, size)?;
                drop(file);
                engine.await_ack("remote agrees transfer done")?;

                self.apply(&path, mode, times)?;
                engine.signal_ack()?;
                engine.listener().file_finished(&name);
                trace_xfer!(file = %path.display(), size, "received file");
            }
            ControlMessage::Directory { mode, name } => {
                let times = state.pending.take();
                let path = self.resolver.directory(state.current_dir(), &name)?;
                engine.listener().directory_started(&name);
                engine.signal_ack()?;
                state.stack.push(Frame {
                    name,
                    path,
                    mode,
                    times,
                });
            }
            ControlMessage::DirectoryEnd => {
                if let Some(discarded) = state.pending.take() {
                    tracing::warn!(?discarded, "timestamp message not followed by a header");
                }
                let Some(frame) = state.stack.pop() else {
                    return Ok(Flow::Done);
                };
                self.apply(&frame.path, frame.mode, frame.times)?;
                engine.signal_ack()?;
                engine.listener().directory_finished(&frame.name);
            }
            ControlMessage::RemoteError { code, message } => {
                return Err(ScpError::Remote { code, message });
            }
            ControlMessage::Unrecognized(text) => {
                let error = ProtocolError::Unrecognized(text);
                if let Err(failure) = engine.signal_error(&error.to_string()) {
                    tracing::debug!(%failure, "could not report unrecognized message to peer");
                }
                return Err(error.into());
            }
        }
        Ok(Flow::Continue)
    }

    fn apply(&self, path: &Path, mode: u32, times: Option<Timestamps>) -> ScpResult<()> {
        self.attributes.set_permissions(path, mode)?;
        if let Some(times) = times.filter(|_| self.attributes.preserves_times()) {
            self.attributes.set_modified_time(path, times.modified)?;
            self.attributes.set_accessed_time(path, times.accessed)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sink_state_tracks_current_directory() {
        let mut state = SinkState::new(Path::new("/dst"));
        assert_eq!(state.current_dir(), Path::new("/dst"));
        assert!(!state.expects_more());

        state.stack.push(Frame {
            name: "sub".to_owned(),
            path: PathBuf::from("/dst/sub"),
            mode: 0o755,
            times: None,
        });
        assert_eq!(state.current_dir(), Path::new("/dst/sub"));
        assert!(state.expects_more());

        state.stack.clear();
        state.pending = Some(Timestamps {
            modified: 1,
            accessed: 2,
        });
        assert!(state.expects_more());
    }
}
