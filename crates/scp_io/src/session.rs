//! Traits describing a remote command invocation.

use std::io::{self, Read, Write};

/// Exit status reported when the remote command never reported one.
pub const UNKNOWN_EXIT_STATUS: i32 = -1;

/// Chunk size used when a session offers no better hint.
pub const DEFAULT_MAX_PACKET_SIZE: usize = 32 * 1024;

/// One running remote command.
///
/// Reads consume the command's standard output and writes feed its standard
/// input. A session is used for exactly one copy and then closed.
pub trait RemoteSession: Read + Write {
    /// Returns everything the command has written to standard error so far.
    fn stderr_text(&self) -> String;

    /// Returns the exit status once the command has terminated normally.
    fn exit_status(&self) -> Option<i32>;

    /// Returns the name of the signal that terminated the command, if any.
    fn exit_signal(&self) -> Option<String>;

    /// Largest chunk the transport moves efficiently in a single write.
    fn max_packet_size(&self) -> usize {
        DEFAULT_MAX_PACKET_SIZE
    }

    /// Closes both directions of the channel and waits for the command to end.
    fn close(&mut self) -> io::Result<()>;
}

/// Starts remote commands.
pub trait RemoteShell {
    /// Session type produced by [`exec`](Self::exec).
    type Session: RemoteSession;

    /// Runs `command` on the remote host.
    fn exec(&mut self, command: &str) -> io::Result<Self::Session>;
}

impl<T: RemoteShell + ?Sized> RemoteShell for &mut T {
    type Session = T::Session;

    fn exec(&mut self, command: &str) -> io::Result<Self::Session> {
        (**self).exec(command)
    }
}

impl<S: RemoteSession + ?Sized> RemoteSession for Box<S> {
    fn stderr_text(&self) -> String {
        (**self).stderr_text()
    }

    fn exit_status(&self) -> Option<i32> {
        (**self).exit_status()
    }

    fn exit_signal(&self) -> Option<String> {
        (**self).exit_signal()
    }

    fn max_packet_size(&self) -> usize {
        (**self).max_packet_size()
    }

    fn close(&mut self) -> io::Result<()> {
        (**self).close()
    }
}
