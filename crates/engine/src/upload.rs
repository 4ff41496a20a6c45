//! crates/engine/src/upload.rs
//!
//! Source side of the protocol: the local side announces entries to a remote
//! `scp -t` and streams their contents.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use logging::trace_xfer;
use metadata::ModeGetter;
use protocol::{ControlMessage, ScpArg, ScpArgs, Timestamps};
use scp_io::{RemoteSession, RemoteShell, UNKNOWN_EXIT_STATUS};

use crate::engine::ScpEngine;
use crate::error::ScpResult;
use crate::listener::TransferListener;
use crate::options::CopyOptions;

/// Pending unit of work for the source state machine.
#[derive(Debug)]
enum Work {
    Enter(PathBuf),
    Send(PathBuf),
    Leave(String),
}

/// Uploads files and directory trees to a remote `scp`.
#[derive(Debug)]
pub struct UploadClient<A> {
    options: CopyOptions,
    attributes: A,
    exit_status: i32,
}

impl<A: ModeGetter> UploadClient<A> {
    /// Creates an upload client.
    pub fn new(options: CopyOptions, attributes: A) -> Self {
        Self {
            options,
            attributes,
            exit_status: UNKNOWN_EXIT_STATUS,
        }
    }

    /// Enables or disables recursive copies.
    pub fn set_recursive(&mut self, recursive: bool) {
        self.options.set_recursive(recursive);
    }

    /// Exit status recorded by the most recent copy, or `-1` when unknown.
    #[must_use]
    pub fn exit_status(&self) -> i32 {
        self.exit_status
    }

    /// Copies the local `source` to the remote `target`.
    ///
    /// Directories require recursion. Entries inside a directory are sent in
    /// name order; anything other than regular files and directories is
    /// skipped with a warning.
    pub fn copy<H>(
        &mut self,
        shell: &mut H,
        listener: &mut dyn TransferListener,
        source: &Path,
        target: &str,
    ) -> ScpResult<i32>
    where
        H: RemoteShell + ?Sized,
    {
        self.exit_status = UNKNOWN_EXIT_STATUS;
        let metadata = fs::metadata(source)?;
        let root = if metadata.is_dir() {
            if !self.options.is_recursive() {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("{} is a directory (recursion is disabled)", source.display()),
                )
                .into());
            }
            Work::Enter(source.to_path_buf())
        } else if metadata.is_file() {
            Work::Send(source.to_path_buf())
        } else {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is not a regular file", source.display()),
            )
            .into());
        };

        let args = ScpArgs::new()
            .with(ScpArg::Sink)
            .with(ScpArg::Quiet)
            .with_if(metadata.is_dir(), ScpArg::Recursive)
            .with_if(self.attributes.preserves_times(), ScpArg::PreserveTimes)
            .with_if(self.options.is_verbose_remote(), ScpArg::Verbose);

        let mut engine =
            ScpEngine::start(shell, self.options.program(), &args, Some(target), listener)?;
        let outcome = self.send(&mut engine, root);
        self.exit_status = engine.finish();
        outcome.map(|()| self.exit_status)
    }

    fn send<S: RemoteSession>(&self, engine: &mut ScpEngine<'_, S>, root: Work) -> ScpResult<()> {
        engine.await_ack("start status")?;

        let mut stack = vec![root];
        while let Some(work) = stack.pop() {
            match work {
                Work::Send(path) => self.send_file(engine, &path)?,
                Work::Enter(path) => {
                    let name = wire_name(&path)?;
                    self.send_times(engine, &path)?;
                    let mode = self.attributes.permissions(&path)?;
                    let header = ControlMessage::Directory {
                        mode,
                        name: name.clone(),
                    };
                    engine.send_line(&header.to_string())?;
                    engine.listener().directory_started(&name);

                    stack.push(Work::Leave(name));
                    for child in sorted_children(&path)?.into_iter().rev() {
                        stack.push(child);
                    }
                }
                Work::Leave(name) => {
                    engine.send_line(&ControlMessage::DirectoryEnd.to_string())?;
                    engine.listener().directory_finished(&name);
                }
            }
        }
        Ok(())
    }

    fn send_file<S: RemoteSession>(
        &self,
        engine: &mut ScpEngine<'_, S>,
        path: &Path,
    ) -> ScpResult<()> {
        let name = wire_name(path)?;
        let mut file = File::open(path)?;
        let size = file.metadata()?.len();
        let mode = self.attributes.permissions(path)?;

        self.send_times(engine, path)?;
        engine.send_line(
            &ControlMessage::File {
                mode,
                size,
                name: name.clone(),
            }
            .to_string(),
        )?;
        engine.listener().file_started(&name, size);

        let chunk = self.options.effective_chunk_size(engine.max_packet_size());
        engine.send_payload(&mut file, chunk, size)?;
        engine.signal_ack()?;
        engine.await_ack("remote agrees transfer done")?;

        engine.listener().file_finished(&name);
        trace_xfer!(file = %path.display(), size, "sent file");
        Ok(())
    }

    fn send_times<S: RemoteSession>(
        &self,
        engine: &mut ScpEngine<'_, S>,
        path: &Path,
    ) -> ScpResult<()> {
        if !self.attributes.preserves_times() {
            return Ok(());
        }
        let times = Timestamps {
            modified: self.attributes.modified_time(path)?,
            accessed: self.attributes.accessed_time(path)?,
        };
        engine.send_line(&ControlMessage::Timestamp(times).to_string())
    }
}

/// Children of `directory` that can be sent, ordered by name.
fn sorted_children(directory: &Path) -> io::Result<Vec<Work>> {
    let mut entries = fs::read_dir(directory)?
        .map(|entry| entry.map(|entry| entry.path()))
        .collect::<io::Result<Vec<_>>>()?;
    entries.sort();

    let mut children = Vec::with_capacity(entries.len());
    for path in entries {
        let metadata = match fs::metadata(&path) {
            Ok(metadata) => metadata,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                tracing::warn!(path = %path.display(), "skipping dangling symbolic link");
                continue;
            }
            Err(error) => return Err(error),
        };
        if metadata.is_dir() {
            children.push(Work::Enter(path));
        } else if metadata.is_file() {
            children.push(Work::Send(path));
        } else {
            tracing::warn!(
                path = %path.display(),
                "skipping entry that is not a regular file or directory"
            );
        }
    }
    Ok(children)
}

/// Final component of `path` as announced in a header.
///
/// Paths such as `.` are canonicalized first so they announce the directory's
/// real name.
fn wire_name(path: &Path) -> io::Result<String> {
    let component = match path.file_name() {
        Some(name) => Some(name.to_os_string()),
        None => fs::canonicalize(path)?.file_name().map(ToOwned::to_owned),
    };
    let name = component
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} has no file name", path.display()),
            )
        })?;
    if name.contains('\n') {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} contains a newline", path.display()),
        ));
    }
    Ok(name)
}
