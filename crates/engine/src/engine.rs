//! crates/engine/src/engine.rs
//!
//! Session-level primitives shared by both transfer directions: starting the
//! remote command, line framing, acknowledgements, exact-length payload
//! streaming and teardown.

use std::io::{self, BufRead, BufReader, Read, Write};
use std::time::Instant;

use logging::{trace_io, trace_proto, trace_session, trace_xfer};
use memchr::memchr;
use protocol::{ACK_FATAL, ACK_OK, AckCode, LF, ProtocolError, ScpArgs};
use scp_io::{RemoteSession, RemoteShell, UNKNOWN_EXIT_STATUS};

use crate::error::{ScpError, ScpResult};
use crate::listener::TransferListener;

/// One running remote `scp` invocation.
///
/// An engine is created per copy by [`ScpEngine::start`] and torn down by
/// [`ScpEngine::finish`]. Dropping an engine that was never finished closes
/// the session as well.
pub struct ScpEngine<'l, S: RemoteSession> {
    session: BufReader<S>,
    listener: &'l mut dyn TransferListener,
    command: String,
    exit_status: Option<i32>,
}

impl<'l, S: RemoteSession> ScpEngine<'l, S> {
    /// Runs `program` with `args` on the remote side, reading from or
    /// writing to `path` (`.` when absent or empty).
    pub fn start<H>(
        shell: &mut H,
        program: &str,
        args: &ScpArgs,
        path: Option<&str>,
        listener: &'l mut dyn TransferListener,
    ) -> ScpResult<Self>
    where
        H: RemoteShell<Session = S> + ?Sized,
    {
        let command = args.command_line(program, path);
        trace_session!(command = %command, "starting remote command");
        let session = shell.exec(&command).map_err(|source| ScpError::Channel {
            command: command.clone(),
            source,
        })?;
        Ok(Self {
            session: BufReader::new(session),
            listener,
            command,
            exit_status: None,
        })
    }

    /// Returns the remote command line this engine started.
    #[must_use]
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Packet size hint advertised by the session.
    #[must_use]
    pub fn max_packet_size(&self) -> usize {
        self.session.get_ref().max_packet_size()
    }

    /// Gives state machines access to the progress listener.
    pub fn listener(&mut self) -> &mut dyn TransferListener {
        &mut *self.listener
    }

    /// Reads one acknowledgement byte.
    ///
    /// Codes 1 and 2 are both fatal: the rest of the line becomes the
    /// [`ScpError::Remote`] message.
    pub fn await_ack(&mut self, context: &str) -> ScpResult<()> {
        let mut byte = [0u8; 1];
        let read = loop {
            match self.session.read(&mut byte) {
                Ok(read) => break read,
                Err(error) if error.kind() == io::ErrorKind::Interrupted => {}
                Err(error) => return Err(error.into()),
            }
        };
        if read == 0 {
            return Err(self.eof(format!("awaiting acknowledgement for {context}")));
        }

        match AckCode::try_from(byte[0])? {
            AckCode::Ok => {
                trace_proto!(context, "acknowledged");
                Ok(())
            }
            code => {
                let message = self
                    .read_raw_line(true)?
                    .map(|line| String::from_utf8_lossy(&line).into_owned())
                    .unwrap_or_default();
                trace_proto!(context, code = ?code, message = %message, "error acknowledgement");
                Err(ScpError::Remote { code, message })
            }
        }
    }

    /// Reads one control line and returns it without the LF.
    ///
    /// End of stream before the first byte yields `Ok(None)` unless `strict`
    /// is set. End of stream inside a line is always an error, and so is a
    /// line that is not valid UTF-8.
    pub fn read_line(&mut self, strict: bool) -> ScpResult<Option<String>> {
        let Some(line) = self.read_raw_line(strict)? else {
            return Ok(None);
        };
        let text = String::from_utf8(line).map_err(|error| {
            ProtocolError::NotUtf8(String::from_utf8_lossy(error.as_bytes()).into_owned())
        })?;
        trace_proto!(line = %text.escape_debug(), "received");
        Ok(Some(text))
    }

    fn read_raw_line(&mut self, strict: bool) -> ScpResult<Option<Vec<u8>>> {
        let mut line = Vec::new();
        loop {
            let available = match self.session.fill_buf() {
                Ok(available) => available,
                Err(error) if error.kind() == io::ErrorKind::Interrupted => continue,
                Err(error) => return Err(error.into()),
            };
            if available.is_empty() {
                if line.is_empty() && !strict {
                    trace_proto!("peer closed the stream");
                    return Ok(None);
                }
                return Err(self.eof("reading a control message"));
            }
            if let Some(position) = memchr(LF, available) {
                line.extend_from_slice(&available[..position]);
                self.session.consume(position + 1);
                break;
            }
            let length = available.len();
            line.extend_from_slice(available);
            self.session.consume(length);
        }

        Ok(Some(line))
    }

    /// Writes `text` and its LF, then waits for the peer's acknowledgement.
    pub fn send_line(&mut self, text: &str) -> ScpResult<()> {
        trace_proto!(line = %text, "sending");
        let output = self.session.get_mut();
        output.write_all(text.as_bytes())?;
        output.write_all(&[LF])?;
        output.flush()?;
        self.await_ack(text)
    }

    /// Accepts the step the peer proposed.
    pub fn signal_ack(&mut self) -> ScpResult<()> {
        trace_proto!("sending acknowledgement");
        let output = self.session.get_mut();
        output.write_all(&[ACK_OK])?;
        output.flush()?;
        Ok(())
    }

    /// Rejects the step the peer proposed with a fatal acknowledgement.
    pub fn signal_error(&mut self, description: &str) -> ScpResult<()> {
        trace_proto!(description, "sending error acknowledgement");
        let output = self.session.get_mut();
        output.write_all(&[ACK_FATAL])?;
        output.write_all(description.as_bytes())?;
        output.write_all(&[LF])?;
        output.flush()?;
        Ok(())
    }

    /// Streams exactly `length` payload bytes from the peer into `sink`.
    pub fn receive_payload<W: Write + ?Sized>(
        &mut self,
        sink: &mut W,
        chunk_size: usize,
        length: u64,
    ) -> ScpResult<u64> {
        transfer_bytes(
            &mut self.session,
            sink,
            chunk_size,
            length,
            &mut *self.listener,
        )
        .map_err(|error| self.enrich(error))
    }

    /// Streams exactly `length` payload bytes from `source` to the peer.
    pub fn send_payload<R: Read + ?Sized>(
        &mut self,
        source: &mut R,
        chunk_size: usize,
        length: u64,
    ) -> ScpResult<u64> {
        transfer_bytes(
            source,
            self.session.get_mut(),
            chunk_size,
            length,
            &mut *self.listener,
        )
    }

    /// Closes the session and returns the remote exit status.
    ///
    /// Repeated calls return the status recorded by the first one. Close
    /// failures are logged and otherwise ignored.
    pub fn finish(&mut self) -> i32 {
        if let Some(status) = self.exit_status {
            return status;
        }

        let session = self.session.get_mut();
        if let Err(error) = session.close() {
            tracing::debug!(target: "scp::session", %error, "ignoring error while closing channel");
        }
        let status = session.exit_status().unwrap_or(UNKNOWN_EXIT_STATUS);
        if let Some(signal) = session.exit_signal() {
            tracing::warn!(command = %self.command, signal = %signal, "remote command terminated by signal");
        }
        if status != 0 {
            tracing::warn!(command = %self.command, status, "remote command exited with non-zero status");
        }
        trace_session!(command = %self.command, status, "remote command finished");

        self.exit_status = Some(status);
        status
    }

    fn eof(&self, context: impl Into<String>) -> ScpError {
        self.enrich(ScpError::eof(context))
    }

    fn enrich(&self, error: ScpError) -> ScpError {
        error.with_stderr(self.session.get_ref().stderr_text())
    }
}

impl<S: RemoteSession> Drop for ScpEngine<'_, S> {
    fn drop(&mut self) {
        if self.exit_status.is_none() {
            self.finish();
        }
    }
}

/// Copies exactly `length` bytes from `source` to `sink` in chunks of at most
/// `chunk_size` bytes and flushes `sink`.
///
/// The listener receives the cumulative count after every chunk. Running out
/// of input early fails with [`ScpError::Eof`].
pub fn transfer_bytes<R, W>(
    source: &mut R,
    sink: &mut W,
    chunk_size: usize,
    length: u64,
    listener: &mut dyn TransferListener,
) -> ScpResult<u64>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let chunk_size = chunk_size.max(1);
    let capacity = usize::try_from(length).map_or(chunk_size, |length| length.min(chunk_size));
    let mut buffer = vec![0u8; capacity.max(1)];
    let started = Instant::now();
    let mut copied = 0u64;

    if length == 0 {
        listener.progress(0);
    }

    while copied < length {
        let remaining = length - copied;
        let want = usize::try_from(remaining).map_or(buffer.len(), |r| r.min(buffer.len()));
        let read = match source.read(&mut buffer[..want]) {
            Ok(0) => {
                return Err(ScpError::eof(format!(
                    "transferring payload ({copied} of {length} bytes received)"
                )));
            }
            Ok(read) => read,
            Err(error) if error.kind() == io::ErrorKind::Interrupted => continue,
            Err(error) => return Err(error.into()),
        };
        sink.write_all(&buffer[..read])?;
        copied += read as u64;
        trace_io!(chunk = read, copied, length, "payload chunk");
        listener.progress(copied);
    }
    sink.flush()?;

    let seconds = started.elapsed().as_secs_f64();
    let kib = copied as f64 / 1024.0;
    if seconds > 0.0 {
        trace_xfer!(
            "{kib:.1} KiB transferred in {seconds:.3}s ({:.1} KiB/s)",
            kib / seconds
        );
    } else {
        trace_xfer!("{kib:.1} KiB transferred");
    }
    Ok(copied)
}
