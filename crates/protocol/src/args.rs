use std::fmt;

/// Program name invoked on the remote host.
pub const SCP_PROGRAM: &str = "scp";

/// Switches accepted by a remote `scp` running in server mode.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ScpArg {
    /// `-f`: the remote side sends files (we receive).
    Source,
    /// `-t`: the remote side receives files (we send).
    Sink,
    /// `-r`: directories are copied recursively.
    Recursive,
    /// `-v`: the remote side prints debugging output to stderr.
    Verbose,
    /// `-p`: modification and access times travel in `T` messages.
    PreserveTimes,
    /// `-q`: the remote side suppresses its progress meter.
    Quiet,
}

impl ScpArg {
    /// Returns the single-letter switch.
    #[must_use]
    pub const fn letter(self) -> char {
        match self {
            Self::Source => 'f',
            Self::Sink => 't',
            Self::Recursive => 'r',
            Self::Verbose => 'v',
            Self::PreserveTimes => 'p',
            Self::Quiet => 'q',
        }
    }

    /// Returns the switch as it appears on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Source => "-f",
            Self::Sink => "-t",
            Self::Recursive => "-r",
            Self::Verbose => "-v",
            Self::PreserveTimes => "-p",
            Self::Quiet => "-q",
        }
    }
}

impl fmt::Display for ScpArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered set of switches passed to the remote `scp`.
///
/// Switches render in insertion order and duplicates are ignored, so the
/// command line for a given sequence of pushes is always the same.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ScpArgs {
    args: Vec<ScpArg>,
}

impl ScpArgs {
    /// Creates an empty argument set.
    #[must_use]
    pub const fn new() -> Self {
        Self { args: Vec::new() }
    }

    /// Appends `arg` unless it is already present.
    pub fn push(&mut self, arg: ScpArg) -> &mut Self {
        if !self.args.contains(&arg) {
            self.args.push(arg);
        }
        self
    }

    /// Builder form of [`push`](Self::push).
    #[must_use]
    pub fn with(mut self, arg: ScpArg) -> Self {
        self.push(arg);
        self
    }

    /// Appends `arg` only when `enabled` is true.
    #[must_use]
    pub fn with_if(mut self, enabled: bool, arg: ScpArg) -> Self {
        if enabled {
            self.push(arg);
        }
        self
    }

    /// Reports whether `arg` is part of the set.
    #[must_use]
    pub fn contains(&self, arg: ScpArg) -> bool {
        self.args.contains(&arg)
    }

    /// Iterates over the switches in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = ScpArg> + '_ {
        self.args.iter().copied()
    }

    /// Renders `program <switches> <path>` for execution on the remote host.
    ///
    /// A missing or empty path becomes `.`. The path is passed through
    /// unquoted so the remote shell still expands wildcards.
    #[must_use]
    pub fn command_line(&self, program: &str, path: Option<&str>) -> String {
        let mut command = String::from(program);
        for arg in &self.args {
            command.push(' ');
            command.push_str(arg.as_str());
        }
        command.push(' ');
        command.push_str(normalize_remote_path(path));
        command
    }
}

/// Replaces an absent or empty remote path with `.`.
#[must_use]
pub fn normalize_remote_path(path: Option<&str>) -> &str {
    match path {
        Some(path) if !path.is_empty() => path,
        _ => ".",
    }
}
