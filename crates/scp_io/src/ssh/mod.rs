//! Remote command execution through the system `ssh` client.

mod connection;
mod parse;

#[cfg(test)]
mod tests;

use std::ffi::{OsStr, OsString};
use std::io;
use std::process::{Command, Stdio};

use logging::trace_session;

pub use connection::SshConnection;
pub use parse::{RemoteShellParseError, parse_remote_shell};

use crate::session::RemoteShell;

/// Builder for an `ssh` invocation.
///
/// The assembled command line is
/// `program [-oBatchMode=yes] [-p PORT] OPTIONS... [user@]host REMOTE_ARGS...`.
#[derive(Clone, Debug)]
pub struct SshCommand {
    program: OsString,
    user: Option<OsString>,
    host: OsString,
    port: Option<u16>,
    batch_mode: bool,
    options: Vec<OsString>,
    remote_command: Vec<OsString>,
    target_override: Option<OsString>,
}

impl SshCommand {
    /// Creates a command that connects to `host` with the default `ssh` program.
    #[must_use]
    pub fn new(host: impl Into<OsString>) -> Self {
        Self {
            program: OsString::from("ssh"),
            user: None,
            host: host.into(),
            port: None,
            batch_mode: true,
            options: Vec::new(),
            remote_command: Vec::new(),
            target_override: None,
        }
    }

    /// Replaces the program used to reach the remote host.
    pub fn set_program(&mut self, program: impl Into<OsString>) -> &mut Self {
        self.program = program.into();
        self
    }

    /// Sets the login name placed before the host.
    pub fn set_user(&mut self, user: impl Into<OsString>) -> &mut Self {
        self.user = Some(user.into());
        self
    }

    /// Sets the port passed with `-p`.
    pub fn set_port(&mut self, port: u16) -> &mut Self {
        self.port = Some(port);
        self
    }

    /// Enables or disables `-oBatchMode=yes`, which stops `ssh` from prompting.
    pub fn set_batch_mode(&mut self, enabled: bool) -> &mut Self {
        self.batch_mode = enabled;
        self
    }

    /// Appends an option placed before the target.
    pub fn push_option(&mut self, option: impl Into<OsString>) -> &mut Self {
        self.options.push(option.into());
        self
    }

    /// Appends one word of the remote command.
    pub fn push_remote_arg(&mut self, arg: impl Into<OsString>) -> &mut Self {
        self.remote_command.push(arg.into());
        self
    }

    /// Replaces the remote command.
    pub fn set_remote_command<I, S>(&mut self, args: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.remote_command = args.into_iter().map(Into::into).collect();
        self
    }

    /// Uses `target` verbatim instead of `[user@]host`. An empty override
    /// suppresses the target argument entirely.
    pub fn set_target_override(&mut self, target: Option<impl Into<OsString>>) -> &mut Self {
        self.target_override = target.map(Into::into);
        self
    }

    /// Applies a remote-shell specification such as `ssh -p 2222 -i key`.
    ///
    /// The first word replaces the program and the remaining words are
    /// appended as options.
    pub fn configure_remote_shell(&mut self, spec: &OsStr) -> Result<&mut Self, RemoteShellParseError> {
        let mut words = parse_remote_shell(spec)?.into_iter();
        if let Some(program) = words.next() {
            self.program = program;
        }
        self.options.extend(words);
        Ok(self)
    }

    fn target(&self) -> Option<OsString> {
        if let Some(target) = &self.target_override {
            return (!target.is_empty()).then(|| target.clone());
        }
        if self.host.is_empty() && self.user.is_none() {
            return None;
        }

        let mut target = OsString::new();
        if let Some(user) = &self.user {
            target.push(user);
            target.push("@");
        }
        target.push(&self.host);
        Some(target)
    }

    fn command_parts(&self) -> (OsString, Vec<OsString>) {
        let mut args = Vec::new();
        if self.batch_mode {
            args.push(OsString::from("-oBatchMode=yes"));
        }
        if let Some(port) = self.port {
            args.push(OsString::from("-p"));
            args.push(OsString::from(port.to_string()));
        }
        args.extend(self.options.iter().cloned());
        if let Some(target) = self.target() {
            args.push(target);
        }
        args.extend(self.remote_command.iter().cloned());
        (self.program.clone(), args)
    }

    #[cfg(test)]
    pub(crate) fn command_parts_for_testing(&self) -> (OsString, Vec<OsString>) {
        self.command_parts()
    }

    /// Spawns the process with piped standard streams.
    pub fn spawn(&self) -> io::Result<SshConnection> {
        let (program, args) = self.command_parts();
        trace_session!("spawning {:?} {:?}", program, args);

        let mut child = Command::new(&program)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        let stdin = child.stdin.take();
        let stdout = child.stdout.take().ok_or_else(|| {
            io::Error::new(io::ErrorKind::BrokenPipe, "child stdout was not captured")
        })?;
        let stderr = child.stderr.take();

        Ok(SshConnection::new(child, stdin, stdout, stderr))
    }
}

/// [`RemoteShell`] that runs each command through a fresh `ssh` process.
#[derive(Clone, Debug)]
pub struct SshShell {
    template: SshCommand,
}

impl SshShell {
    /// Wraps a configured command; its remote command is replaced on every exec.
    #[must_use]
    pub const fn new(template: SshCommand) -> Self {
        Self { template }
    }

    /// Returns the command template.
    #[must_use]
    pub const fn template(&self) -> &SshCommand {
        &self.template
    }
}

impl RemoteShell for SshShell {
    type Session = SshConnection;

    fn exec(&mut self, command: &str) -> io::Result<Self::Session> {
        let mut invocation = self.template.clone();
        invocation.set_remote_command([command]);
        invocation.spawn()
    }
}
