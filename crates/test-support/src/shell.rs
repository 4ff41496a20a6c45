use std::cell::{Cell, RefCell};
use std::io::{self, Cursor, Read, Write};
use std::rc::Rc;

use scp_io::{DEFAULT_MAX_PACKET_SIZE, RemoteSession, RemoteShell};

/// Builder for the byte stream a remote peer sends.
#[derive(Clone, Debug, Default)]
pub struct Script {
    bytes: Vec<u8>,
}

impl Script {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `text` followed by LF.
    #[must_use]
    pub fn line(mut self, text: &str) -> Self {
        self.bytes.extend_from_slice(text.as_bytes());
        self.bytes.push(b'\n');
        self
    }

    /// Appends raw payload bytes.
    #[must_use]
    pub fn bytes(mut self, payload: &[u8]) -> Self {
        self.bytes.extend_from_slice(payload);
        self
    }

    /// Appends a success acknowledgement.
    #[must_use]
    pub fn ack(self) -> Self {
        self.acks(1)
    }

    /// Appends `count` success acknowledgements.
    #[must_use]
    pub fn acks(mut self, count: usize) -> Self {
        self.bytes.extend(std::iter::repeat_n(0u8, count));
        self
    }

    /// Appends an error acknowledgement with `code` and `message`.
    #[must_use]
    pub fn error(mut self, code: u8, message: &str) -> Self {
        self.bytes.push(code);
        self.line(message)
    }

    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

impl From<Script> for Vec<u8> {
    fn from(script: Script) -> Self {
        script.bytes
    }
}

/// In-memory [`RemoteShell`] whose sessions replay a fixed input stream.
///
/// Clones share the recorded commands and output, so a test can keep one
/// handle while the client under test owns another.
#[derive(Clone, Debug)]
pub struct ScriptedShell {
    input: Vec<u8>,
    exit_status: Option<i32>,
    exit_signal: Option<String>,
    stderr: String,
    max_packet_size: usize,
    exec_error: Option<io::ErrorKind>,
    commands: Rc<RefCell<Vec<String>>>,
    output: Rc<RefCell<Vec<u8>>>,
    closes: Rc<Cell<usize>>,
}

impl ScriptedShell {
    /// Creates a shell whose sessions emit `input` and exit with status 0.
    pub fn new(input: impl Into<Vec<u8>>) -> Self {
        Self {
            input: input.into(),
            exit_status: Some(0),
            exit_signal: None,
            stderr: String::new(),
            max_packet_size: DEFAULT_MAX_PACKET_SIZE,
            exec_error: None,
            commands: Rc::default(),
            output: Rc::default(),
            closes: Rc::default(),
        }
    }

    #[must_use]
    pub fn with_exit_status(mut self, status: Option<i32>) -> Self {
        self.exit_status = status;
        self
    }

    #[must_use]
    pub fn with_exit_signal(mut self, signal: &str) -> Self {
        self.exit_signal = Some(signal.to_owned());
        self
    }

    #[must_use]
    pub fn with_stderr(mut self, stderr: &str) -> Self {
        self.stderr = stderr.to_owned();
        self
    }

    #[must_use]
    pub fn with_max_packet_size(mut self, size: usize) -> Self {
        self.max_packet_size = size;
        self
    }

    /// Makes every `exec` fail with `kind`.
    #[must_use]
    pub fn failing(mut self, kind: io::ErrorKind) -> Self {
        self.exec_error = Some(kind);
        self
    }

    /// Commands passed to `exec`, in order.
    #[must_use]
    pub fn commands(&self) -> Vec<String> {
        self.commands.borrow().clone()
    }

    /// Everything the client wrote to its sessions.
    #[must_use]
    pub fn output(&self) -> Vec<u8> {
        self.output.borrow().clone()
    }

    /// Number of times a session was closed.
    #[must_use]
    pub fn close_count(&self) -> usize {
        self.closes.get()
    }
}

impl RemoteShell for ScriptedShell {
    type Session = ScriptedSession;

    fn exec(&mut self, command: &str) -> io::Result<Self::Session> {
        if let Some(kind) = self.exec_error {
            return Err(io::Error::new(kind, "scripted exec failure"));
        }
        self.commands.borrow_mut().push(command.to_owned());
        Ok(ScriptedSession {
            input: Cursor::new(self.input.clone()),
            output: Rc::clone(&self.output),
            closes: Rc::clone(&self.closes),
            exit_status: self.exit_status,
            exit_signal: self.exit_signal.clone(),
            stderr: self.stderr.clone(),
            max_packet_size: self.max_packet_size,
            closed: false,
        })
    }
}

/// Session produced by [`ScriptedShell`].
#[derive(Debug)]
pub struct ScriptedSession {
    input: Cursor<Vec<u8>>,
    output: Rc<RefCell<Vec<u8>>>,
    closes: Rc<Cell<usize>>,
    exit_status: Option<i32>,
    exit_signal: Option<String>,
    stderr: String,
    max_packet_size: usize,
    closed: bool,
}

impl Read for ScriptedSession {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.input.read(buf)
    }
}

impl Write for ScriptedSession {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.closed {
            return Err(io::Error::from(io::ErrorKind::BrokenPipe));
        }
        self.output.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl RemoteSession for ScriptedSession {
    fn stderr_text(&self) -> String {
        self.stderr.clone()
    }

    fn exit_status(&self) -> Option<i32> {
        self.exit_status
    }

    fn exit_signal(&self) -> Option<String> {
        self.exit_signal.clone()
    }

    fn max_packet_size(&self) -> usize {
        self.max_packet_size
    }

    fn close(&mut self) -> io::Result<()> {
        if !self.closed {
            self.closed = true;
            self.closes.set(self.closes.get() + 1);
        }
        Ok(())
    }
}
