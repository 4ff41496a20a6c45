//! crates/metadata/src/attributes.rs
//!
//! Attribute traits consumed by the transfer state machines and the
//! filesystem-backed [`LocalAttributes`] implementation.

use std::fs;
use std::io;
use std::path::Path;

use filetime::FileTime;
use logging::trace_attrs;

use crate::error::MetadataError;
use crate::options::MetadataOptions;

/// Shared query deciding whether `T` messages are exchanged.
pub trait TimesPolicy {
    /// Returns `true` when modification and access times are preserved.
    fn preserves_times(&self) -> bool;
}

/// Applies announced attributes to local paths.
pub trait ModeSetter: TimesPolicy {
    /// Applies the permission bits announced for `path`.
    fn set_permissions(&self, path: &Path, mode: u32) -> Result<(), MetadataError>;

    /// Sets the last-modified time of `path` in whole seconds since the epoch.
    fn set_modified_time(&self, path: &Path, seconds: u64) -> Result<(), MetadataError>;

    /// Sets the last-accessed time of `path` in whole seconds since the epoch.
    fn set_accessed_time(&self, path: &Path, seconds: u64) -> Result<(), MetadataError>;
}

/// Reads the attributes announced for local paths.
pub trait ModeGetter: TimesPolicy {
    /// Returns the permission bits of `path`, masked to `0o7777`.
    fn permissions(&self, path: &Path) -> Result<u32, MetadataError>;

    /// Returns the last-modified time of `path` in whole seconds.
    fn modified_time(&self, path: &Path) -> Result<u64, MetadataError>;

    /// Returns the last-accessed time of `path` in whole seconds.
    fn accessed_time(&self, path: &Path) -> Result<u64, MetadataError>;
}

/// Filesystem-backed attribute handling.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct LocalAttributes {
    options: MetadataOptions,
}

impl LocalAttributes {
    /// Creates an attribute handler using `options`.
    #[must_use]
    pub const fn new(options: MetadataOptions) -> Self {
        Self { options }
    }

    /// Returns the configured options.
    #[must_use]
    pub const fn options(&self) -> MetadataOptions {
        self.options
    }
}

impl TimesPolicy for LocalAttributes {
    fn preserves_times(&self) -> bool {
        self.options.times()
    }
}

impl ModeSetter for LocalAttributes {
    fn set_permissions(&self, path: &Path, mode: u32) -> Result<(), MetadataError> {
        if !self.options.permissions() {
            return Ok(());
        }
        let effective = mode & 0o7777 & !self.options.umask();
        let octal = format!("{effective:04o}");
        trace_attrs!(path = %path.display(), mode = %octal, "set permissions");
        apply_mode(path, effective).map_err(|e| MetadataError::new("set permissions", path, e))
    }

    fn set_modified_time(&self, path: &Path, seconds: u64) -> Result<(), MetadataError> {
        let time = file_time(seconds).map_err(|e| MetadataError::new("set modified time", path, e))?;
        trace_attrs!(path = %path.display(), seconds, "set modified time");
        filetime::set_file_mtime(path, time)
            .map_err(|e| MetadataError::new("set modified time", path, e))
    }

    fn set_accessed_time(&self, path: &Path, seconds: u64) -> Result<(), MetadataError> {
        let time = file_time(seconds).map_err(|e| MetadataError::new("set accessed time", path, e))?;
        trace_attrs!(path = %path.display(), seconds, "set accessed time");
        filetime::set_file_atime(path, time)
            .map_err(|e| MetadataError::new("set accessed time", path, e))
    }
}

impl ModeGetter for LocalAttributes {
    fn permissions(&self, path: &Path) -> Result<u32, MetadataError> {
        let metadata = fs::metadata(path).map_err(|e| MetadataError::new("read permissions", path, e))?;
        Ok(mode_of(&metadata))
    }

    fn modified_time(&self, path: &Path) -> Result<u64, MetadataError> {
        let metadata =
            fs::metadata(path).map_err(|e| MetadataError::new("read modified time", path, e))?;
        Ok(whole_seconds(FileTime::from_last_modification_time(&metadata)))
    }

    fn accessed_time(&self, path: &Path) -> Result<u64, MetadataError> {
        let metadata =
            fs::metadata(path).map_err(|e| MetadataError::new("read accessed time", path, e))?;
        Ok(whole_seconds(FileTime::from_last_access_time(&metadata)))
    }
}

fn file_time(seconds: u64) -> io::Result<FileTime> {
    let seconds = i64::try_from(seconds).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("timestamp {seconds} is out of range"),
        )
    })?;
    Ok(FileTime::from_unix_time(seconds, 0))
}

// Times before the epoch cannot be expressed in a `T` message.
fn whole_seconds(time: FileTime) -> u64 {
    u64::try_from(time.unix_seconds()).unwrap_or(0)
}

#[cfg(unix)]
fn apply_mode(path: &Path, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn apply_mode(path: &Path, mode: u32) -> io::Result<()> {
    let mut permissions = fs::metadata(path)?.permissions();
    permissions.set_readonly(mode & 0o200 == 0);
    fs::set_permissions(path, permissions)
}

#[cfg(unix)]
fn mode_of(metadata: &fs::Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;

    metadata.permissions().mode() & 0o7777
}

#[cfg(not(unix))]
fn mode_of(metadata: &fs::Metadata) -> u32 {
    let base = if metadata.is_dir() { 0o755 } else { 0o644 };
    if metadata.permissions().readonly() {
        base & !0o222
    } else {
        base
    }
}
