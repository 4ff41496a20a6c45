//! Helpers for building and comparing small directory trees.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

use tempfile::TempDir;

/// Snapshot entry keyed by a `/`-separated relative path.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Node {
    Directory,
    File(Vec<u8>),
}

/// Creates a temporary directory.
pub fn temp_dir() -> io::Result<TempDir> {
    tempfile::Builder::new().prefix("oc-scp-test").tempdir()
}

/// Writes `files` (relative path, contents) under `root`, creating parents.
pub fn populate(root: &Path, files: &[(&str, &[u8])]) -> io::Result<()> {
    for (relative, contents) in files {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, contents)?;
    }
    Ok(())
}

/// Records every entry below `root`.
pub fn snapshot(root: &Path) -> io::Result<BTreeMap<String, Node>> {
    let mut nodes = BTreeMap::new();
    let mut pending = vec![(root.to_path_buf(), String::new())];
    while let Some((directory, prefix)) = pending.pop() {
        for entry in fs::read_dir(&directory)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            let relative = if prefix.is_empty() {
                name
            } else {
                format!("{prefix}/{name}")
            };
            if entry.file_type()?.is_dir() {
                nodes.insert(relative.clone(), Node::Directory);
                pending.push((entry.path(), relative));
            } else {
                nodes.insert(relative, Node::File(fs::read(entry.path())?));
            }
        }
    }
    Ok(nodes)
}
