//! Mapping of announced entry names onto local paths.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use protocol::check_entry_name;

use crate::error::ScpResult;

/// Decides where incoming entries land on the local filesystem.
pub trait TargetResolver {
    /// Returns the directory an incoming `D` header named `name` populates,
    /// creating it when necessary.
    fn directory(&self, base: &Path, name: &str) -> ScpResult<PathBuf>;

    /// Returns the path an incoming `C` header named `name` is written to.
    fn file(&self, base: &Path, name: &str) -> ScpResult<PathBuf>;
}

/// Resolves targets the way command-line `scp` does.
///
/// When `base` is an existing directory, entries are created inside it.
/// Otherwise `base` itself becomes the entry, which allows renaming the
/// top-level file or directory on download.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalResolver;

impl TargetResolver for LocalResolver {
    fn directory(&self, base: &Path, name: &str) -> ScpResult<PathBuf> {
        let name = check_entry_name(name)?;
        let target = if base.is_dir() {
            base.join(name)
        } else {
            base.to_path_buf()
        };

        match fs::symlink_metadata(&target) {
            Ok(metadata) if metadata.is_dir() => {}
            Ok(_) if target.is_dir() => {}
            Ok(_) => {
                return Err(io::Error::new(
                    io::ErrorKind::AlreadyExists,
                    format!("{} exists and is not a directory", target.display()),
                )
                .into());
            }
            Err(error) if error.kind() == io::ErrorKind::NotFound => fs::create_dir(&target)?,
            Err(error) => return Err(error.into()),
        }
        Ok(target)
    }

    fn file(&self, base: &Path, name: &str) -> ScpResult<PathBuf> {
        let name = check_entry_name(name)?;
        if base.is_dir() {
            Ok(base.join(name))
        } else {
            Ok(base.to_path_buf())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScpError;
    use protocol::ProtocolError;
    use tempfile::tempdir;

    #[test]
    fn directory_inside_existing_base_is_created() {
        let dir = tempdir().expect("tempdir");
        let resolved = LocalResolver.directory(dir.path(), "sub").expect("resolve");
        assert_eq!(resolved, dir.path().join("sub"));
        assert!(resolved.is_dir());

        let again = LocalResolver.directory(dir.path(), "sub").expect("existing");
        assert_eq!(again, resolved);
    }

    #[test]
    fn missing_base_becomes_the_directory() {
        let dir = tempdir().expect("tempdir");
        let base = dir.path().join("renamed");
        let resolved = LocalResolver.directory(&base, "sub").expect("resolve");
        assert_eq!(resolved, base);
        assert!(base.is_dir());
    }

    #[test]
    fn file_in_the_way_of_a_directory_is_rejected() {
        let dir = tempdir().expect("tempdir");
        fs::write(dir.path().join("sub"), b"x").expect("write");
        match LocalResolver.directory(dir.path(), "sub") {
            Err(ScpError::Io(error)) => assert_eq!(error.kind(), io::ErrorKind::AlreadyExists),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn file_targets_follow_base_kind() {
        let dir = tempdir().expect("tempdir");
        assert_eq!(
            LocalResolver.file(dir.path(), "a.txt").expect("inside"),
            dir.path().join("a.txt")
        );
        let explicit = dir.path().join("b.txt");
        assert_eq!(LocalResolver.file(&explicit, "a.txt").expect("rename"), explicit);
    }

    #[test]
    fn unsafe_names_are_rejected() {
        let dir = tempdir().expect("tempdir");
        for name in ["..", ".", "", "a/b", "/etc"] {
            assert!(matches!(
                LocalResolver.file(dir.path(), name),
                Err(ScpError::Protocol(ProtocolError::UnsafeName(_)))
            ));
            assert!(matches!(
                LocalResolver.directory(dir.path(), name),
                Err(ScpError::Protocol(ProtocolError::UnsafeName(_)))
            ));
        }
    }
}
