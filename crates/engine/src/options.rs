use protocol::SCP_PROGRAM;

/// Options shared by [`DownloadClient`](crate::DownloadClient) and
/// [`UploadClient`](crate::UploadClient).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CopyOptions {
    recursive: bool,
    verbose_remote: bool,
    chunk_size: Option<usize>,
    remote_program: String,
}

impl CopyOptions {
    /// Creates a new [`CopyOptions`] value with defaults applied.
    ///
    /// Recursion is enabled, the remote side runs quietly and payload chunks
    /// follow the session's packet size hint.
    #[must_use]
    pub fn new() -> Self {
        Self {
            recursive: true,
            verbose_remote: false,
            chunk_size: None,
            remote_program: SCP_PROGRAM.to_owned(),
        }
    }

    /// Enables or disables recursive copies.
    #[must_use]
    #[doc(alias = "-r")]
    pub const fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Passes `-v` to the remote command.
    #[must_use]
    pub const fn verbose_remote(mut self, verbose: bool) -> Self {
        self.verbose_remote = verbose;
        self
    }

    /// Overrides the payload chunk size. Zero is treated as one.
    #[must_use]
    pub const fn chunk_size(mut self, chunk_size: Option<usize>) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Replaces the program name executed on the remote host.
    #[must_use]
    pub fn remote_program(mut self, program: impl Into<String>) -> Self {
        self.remote_program = program.into();
        self
    }

    /// Reports whether recursion is enabled.
    #[must_use]
    pub const fn is_recursive(&self) -> bool {
        self.recursive
    }

    /// Reports whether `-v` is forwarded.
    #[must_use]
    pub const fn is_verbose_remote(&self) -> bool {
        self.verbose_remote
    }

    /// Returns the chunk size override, if any.
    #[must_use]
    pub const fn chunk_size_override(&self) -> Option<usize> {
        self.chunk_size
    }

    /// Returns the remote program name.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.remote_program
    }

    /// Chunk size to use for a session advertising `packet_hint`.
    #[must_use]
    pub fn effective_chunk_size(&self, packet_hint: usize) -> usize {
        self.chunk_size.unwrap_or(packet_hint).max(1)
    }

    pub(crate) const fn set_recursive(&mut self, recursive: bool) {
        self.recursive = recursive;
    }
}

impl Default for CopyOptions {
    fn default() -> Self {
        Self::new()
    }
}
