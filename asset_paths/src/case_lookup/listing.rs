//! Directory listing primitive consumed by the resolver.

use std::fs;
use std::io;
use std::path::Path;

/// Kind of a directory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    File,
    Directory,
}

/// A single immediate entry of a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntryInfo {
    pub name: String,
    pub kind: EntryKind,
}

impl DirEntryInfo {
    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::File,
        }
    }

    pub fn directory(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::Directory,
        }
    }
}

/// Host platform access needed for path resolution.
pub trait DirectoryListing {
    /// Enumerate the immediate entries of `dir` in enumeration order.
    ///
    /// Entries that are neither files nor directories are omitted.
    fn entries(&self, dir: &Path) -> io::Result<Vec<DirEntryInfo>>;

    /// Kind of the object at `path`, or `None` when nothing usable is there.
    fn kind_of(&self, path: &Path) -> Option<EntryKind>;
}

/// [`DirectoryListing`] backed by the real filesystem.
///
/// Symlinks are followed, so a link to a directory lists as a directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsListing;

impl DirectoryListing for FsListing {
    fn entries(&self, dir: &Path) -> io::Result<Vec<DirEntryInfo>> {
        let mut found = Vec::new();

        for entry in fs::read_dir(dir)?.flatten() {
            // Names that are not valid UTF-8 can never equal a requested &str.
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if let Some(kind) = self.kind_of(&entry.path()) {
                found.push(DirEntryInfo { name, kind });
            }
        }

        Ok(found)
    }

    fn kind_of(&self, path: &Path) -> Option<EntryKind> {
        let metadata = fs::metadata(path).ok()?;
        if metadata.is_dir() {
            Some(EntryKind::Directory)
        } else if metadata.is_file() {
            Some(EntryKind::File)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fs_listing_tags_kinds() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("intro.smk"), b"").unwrap();
        fs::create_dir(dir.path().join("Maps")).unwrap();

        let mut entries = FsListing.entries(dir.path()).unwrap();
        entries.sort_by(|a, b| a.name.cmp(&b.name));

        assert_eq!(
            entries,
            vec![DirEntryInfo::directory("Maps"), DirEntryInfo::file("intro.smk")]
        );
    }

    #[test]
    fn test_fs_listing_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(FsListing.entries(&dir.path().join("absent")).is_err());
        assert_eq!(FsListing.kind_of(&dir.path().join("absent")), None);
    }
}
