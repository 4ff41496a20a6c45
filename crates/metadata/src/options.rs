/// Options that control how local attributes are read and applied.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MetadataOptions {
    preserve_times: bool,
    preserve_permissions: bool,
    umask: u32,
}

impl MetadataOptions {
    /// Creates a new [`MetadataOptions`] value with defaults applied.
    ///
    /// By default permissions are applied, timestamps are left to the
    /// filesystem and no umask is subtracted.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            preserve_times: false,
            preserve_permissions: true,
            umask: 0,
        }
    }

    /// Requests that modification and access times travel with each entry.
    #[must_use]
    #[doc(alias = "-p")]
    pub const fn preserve_times(mut self, preserve: bool) -> Self {
        self.preserve_times = preserve;
        self
    }

    /// Requests that announced permission bits are applied locally.
    #[must_use]
    pub const fn preserve_permissions(mut self, preserve: bool) -> Self {
        self.preserve_permissions = preserve;
        self
    }

    /// Bits cleared from every permission value before it is applied.
    #[must_use]
    pub const fn with_umask(mut self, umask: u32) -> Self {
        self.umask = umask & 0o7777;
        self
    }

    /// Reports whether timestamps are preserved.
    #[must_use]
    pub const fn times(&self) -> bool {
        self.preserve_times
    }

    /// Reports whether permission bits are applied.
    #[must_use]
    pub const fn permissions(&self) -> bool {
        self.preserve_permissions
    }

    /// Returns the configured umask.
    #[must_use]
    pub const fn umask(&self) -> u32 {
        self.umask
    }
}

impl Default for MetadataOptions {
    fn default() -> Self {
        Self::new()
    }
}
