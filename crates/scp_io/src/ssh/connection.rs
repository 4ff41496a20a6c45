//! SSH subprocess owning the remote command's standard streams.

use std::io::{self, Read, Write};
use std::process::{Child, ChildStderr, ChildStdin, ChildStdout, ExitStatus};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};

use logging::trace_session;

use crate::session::{DEFAULT_MAX_PACKET_SIZE, RemoteSession};

/// Owns an active `ssh` subprocess and exposes its stdio handles.
///
/// Standard error is copied into a shared buffer by a background thread for
/// as long as the process runs.
pub struct SshConnection {
    child: Child,
    stdin: Option<ChildStdin>,
    stdout: Option<ChildStdout>,
    stderr: StderrCollector,
    status: Option<ExitStatus>,
}

impl SshConnection {
    pub(super) fn new(
        child: Child,
        stdin: Option<ChildStdin>,
        stdout: ChildStdout,
        stderr: Option<ChildStderr>,
    ) -> Self {
        Self {
            child,
            stdin,
            stdout: Some(stdout),
            stderr: StderrCollector::spawn(stderr),
            status: None,
        }
    }

    /// Flushes and closes the stdin pipe, signalling EOF to the subprocess.
    pub fn close_stdin(&mut self) -> io::Result<()> {
        if let Some(mut stdin) = self.stdin.take() {
            stdin.flush()?;
        }
        Ok(())
    }

    /// Waits for the subprocess to exit and records its status.
    pub fn wait(&mut self) -> io::Result<ExitStatus> {
        if let Some(status) = self.status {
            return Ok(status);
        }
        let _ = self.close_stdin();
        let status = self.child.wait()?;
        self.status = Some(status);
        self.stderr.join();
        Ok(status)
    }
}

impl Read for SshConnection {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.stdout.as_mut() {
            Some(stdout) => stdout.read(buf),
            None => Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "stdout has already been closed",
            )),
        }
    }
}

impl Write for SshConnection {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.stdin.as_mut() {
            Some(stdin) => stdin.write(buf),
            None => Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "stdin has already been closed",
            )),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.stdin.as_mut() {
            Some(stdin) => stdin.flush(),
            None => Ok(()),
        }
    }
}

impl RemoteSession for SshConnection {
    fn stderr_text(&self) -> String {
        self.stderr.text()
    }

    fn exit_status(&self) -> Option<i32> {
        self.status.and_then(|status| status.code())
    }

    fn exit_signal(&self) -> Option<String> {
        self.status.and_then(signal_of)
    }

    fn max_packet_size(&self) -> usize {
        DEFAULT_MAX_PACKET_SIZE
    }

    fn close(&mut self) -> io::Result<()> {
        if self.status.is_some() {
            return Ok(());
        }
        let flushed = self.close_stdin();
        // A remote blocked on a full stdout pipe sees EPIPE once our end is gone.
        self.stdout = None;
        let status = self.wait()?;
        trace_session!("ssh process exited with {status}");
        flushed
    }
}

impl Drop for SshConnection {
    fn drop(&mut self) {
        if self.status.is_some() {
            return;
        }
        let _ = self.close_stdin();
        if let Ok(None) = self.child.try_wait() {
            let _ = self.child.kill();
        }
        let _ = self.child.wait();
    }
}

#[cfg(unix)]
fn signal_of(status: ExitStatus) -> Option<String> {
    use std::os::unix::process::ExitStatusExt;

    let signal = status.signal()?;
    let name = match signal {
        1 => "HUP",
        2 => "INT",
        3 => "QUIT",
        6 => "ABRT",
        9 => "KILL",
        13 => "PIPE",
        14 => "ALRM",
        15 => "TERM",
        _ => return Some(format!("signal {signal}")),
    };
    Some(format!("SIG{name}"))
}

#[cfg(not(unix))]
fn signal_of(_status: ExitStatus) -> Option<String> {
    None
}

/// Upper bound on retained stderr; older output is discarded first.
pub(super) const STDERR_LIMIT: usize = 64 * 1024;

/// Appends `chunk` to `buffer`, keeping only the last `limit` bytes.
pub(super) fn append_capped(buffer: &mut Vec<u8>, chunk: &[u8], limit: usize) {
    if chunk.len() >= limit {
        buffer.clear();
        buffer.extend_from_slice(&chunk[chunk.len() - limit..]);
        return;
    }
    let overflow = (buffer.len() + chunk.len()).saturating_sub(limit);
    buffer.drain(..overflow);
    buffer.extend_from_slice(chunk);
}

/// Background reader draining the child's stderr into memory.
struct StderrCollector {
    buffer: Arc<Mutex<Vec<u8>>>,
    reader: Option<JoinHandle<()>>,
}

impl StderrCollector {
    fn spawn(stderr: Option<ChildStderr>) -> Self {
        let buffer = Arc::new(Mutex::new(Vec::new()));
        let reader = stderr.and_then(|mut stderr| {
            let sink = Arc::clone(&buffer);
            thread::Builder::new()
                .name("ssh-stderr".to_owned())
                .spawn(move || {
                    let mut chunk = [0u8; 1024];
                    loop {
                        match stderr.read(&mut chunk) {
                            Ok(0) => break,
                            Ok(n) => append_capped(
                                &mut sink.lock().unwrap_or_else(PoisonError::into_inner),
                                &chunk[..n],
                                STDERR_LIMIT,
                            ),
                            Err(error) if error.kind() == io::ErrorKind::Interrupted => {}
                            Err(_) => break,
                        }
                    }
                })
                .ok()
        });
        Self { buffer, reader }
    }

    fn text(&self) -> String {
        let bytes = self.buffer.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&bytes).trim_end().to_owned()
    }

    fn join(&mut self) {
        if let Some(reader) = self.reader.take() {
            let _ = reader.join();
        }
    }
}
