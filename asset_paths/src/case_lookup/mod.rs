//! Case-insensitive object lookup.
//!
//! On a case-sensitive filesystem, a requested name is resolved by scanning the
//! immediate entries of the directory once:
//! 1. Entries of the wrong kind are skipped
//! 2. The first entry equal to the requested name wins immediately
//! 3. Otherwise the first entry equal ignoring ASCII case is returned
//!
//! On case-insensitive filesystems the scan is never performed; the lookup
//! strategy is fixed when the [`PathResolver`] is built.

mod listing;

pub use listing::*;

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::path_tools::SEPARATOR;

/// Whether the host filesystem distinguishes names that differ only in case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseSensitivity {
    Sensitive,
    Insensitive,
}

impl CaseSensitivity {
    /// Capability of the platform this process was built for.
    ///
    /// Determined once per process and read-only afterwards.
    pub fn host() -> Self {
        static HOST: OnceLock<CaseSensitivity> = OnceLock::new();
        *HOST.get_or_init(|| {
            if cfg!(any(windows, target_os = "macos")) {
                CaseSensitivity::Insensitive
            } else {
                CaseSensitivity::Sensitive
            }
        })
    }

    pub fn is_sensitive(&self) -> bool {
        matches!(self, CaseSensitivity::Sensitive)
    }
}

/// Which kinds of entries a lookup may return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryFilter {
    pub files: bool,
    pub subdirs: bool,
}

impl EntryFilter {
    pub const FILES: Self = Self::new(true, false);
    pub const SUBDIRS: Self = Self::new(false, true);
    pub const ANY: Self = Self::new(true, true);

    pub const fn new(files: bool, subdirs: bool) -> Self {
        Self { files, subdirs }
    }

    /// Check if an entry of the given kind passes the filter.
    pub fn accepts(&self, kind: EntryKind) -> bool {
        match kind {
            EntryKind::File => self.files,
            EntryKind::Directory => self.subdirs,
        }
    }
}

/// Scan `dir` once for `name`, preferring an exact match over a case-insensitive one.
///
/// Returns the entry name as it exists on disk. A missing or unreadable
/// directory is reported as not found.
pub fn scan_case_insensitive<L: DirectoryListing + ?Sized>(
    listing: &L,
    dir: &Path,
    name: &str,
    filter: EntryFilter,
) -> Option<String> {
    let entries = match listing.entries(dir) {
        Ok(entries) => entries,
        Err(err) => {
            tracing::trace!(dir = %dir.display(), error = %err, "Directory not listable");
            return None;
        }
    };

    let mut first_match = None;

    for entry in entries {
        if !filter.accepts(entry.kind) {
            continue;
        }

        if entry.name == name {
            return Some(entry.name);
        }

        if first_match.is_none() && entry.name.eq_ignore_ascii_case(name) {
            first_match = Some(entry.name);
        }
    }

    first_match
}

/// Lookup relying on the filesystem's own (case-insensitive) name semantics.
fn lookup_native<L: DirectoryListing>(
    listing: &L,
    dir: &Path,
    name: &str,
    filter: EntryFilter,
) -> Option<String> {
    match listing.kind_of(&dir.join(name)) {
        Some(kind) if filter.accepts(kind) => Some(name.to_string()),
        _ => None,
    }
}

type LookupFn<L> = fn(&L, &Path, &str, EntryFilter) -> Option<String>;

/// Resolves asset names against directories regardless of host case semantics.
#[derive(Clone)]
pub struct PathResolver<L = FsListing> {
    listing: L,
    sensitivity: CaseSensitivity,
    lookup: LookupFn<L>,
}

impl<L: std::fmt::Debug> std::fmt::Debug for PathResolver<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PathResolver")
            .field("listing", &self.listing)
            .field("sensitivity", &self.sensitivity)
            .finish()
    }
}

impl PathResolver<FsListing> {
    /// Resolver over the real filesystem using the host capability.
    pub fn for_host() -> Self {
        Self::new(FsListing, CaseSensitivity::host())
    }
}

impl Default for PathResolver<FsListing> {
    fn default() -> Self {
        Self::for_host()
    }
}

impl<L: DirectoryListing> PathResolver<L> {
    /// Create a resolver; the lookup strategy is chosen here and never changes.
    pub fn new(listing: L, sensitivity: CaseSensitivity) -> Self {
        let lookup: LookupFn<L> = match sensitivity {
            CaseSensitivity::Sensitive => scan_case_insensitive::<L>,
            CaseSensitivity::Insensitive => lookup_native::<L>,
        };

        Self {
            listing,
            sensitivity,
            lookup,
        }
    }

    pub fn sensitivity(&self) -> CaseSensitivity {
        self.sensitivity
    }

    pub fn listing(&self) -> &L {
        &self.listing
    }

    /// Find an object (file and/or subdirectory) in `dir` ignoring case.
    ///
    /// Returns the name as found on disk.
    pub fn find_object_case_insensitive(
        &self,
        dir: impl AsRef<Path>,
        name: &str,
        look_for_files: bool,
        look_for_subdirs: bool,
    ) -> Option<String> {
        self.find_object(dir, name, EntryFilter::new(look_for_files, look_for_subdirs))
    }

    /// Same as [`Self::find_object_case_insensitive`] with an explicit filter.
    pub fn find_object(
        &self,
        dir: impl AsRef<Path>,
        name: &str,
        filter: EntryFilter,
    ) -> Option<String> {
        if name.is_empty() {
            return None;
        }
        (self.lookup)(&self.listing, dir.as_ref(), name, filter)
    }

    /// Find an object and return its full path (`dir` joined with the name on disk).
    pub fn find_object_case_insensitive_full_path(
        &self,
        dir: impl AsRef<Path>,
        name: &str,
        look_for_files: bool,
        look_for_subdirs: bool,
    ) -> Option<PathBuf> {
        let dir = dir.as_ref();
        self.find_object_case_insensitive(dir, name, look_for_files, look_for_subdirs)
            .map(|found| dir.join(found))
    }

    /// Resolve a multi-component relative asset path under `base`.
    ///
    /// Every component but the last must be a subdirectory; the last may be
    /// either kind. `.` components are skipped and `..` is taken literally.
    pub fn resolve_relative(&self, base: impl AsRef<Path>, relative: &str) -> Option<PathBuf> {
        let mut resolved = base.as_ref().to_path_buf();
        let components: Vec<&str> = relative
            .split(|c: char| c == SEPARATOR || c == '\\')
            .filter(|part| !part.is_empty() && *part != ".")
            .collect();

        for (index, part) in components.iter().enumerate() {
            if *part == ".." {
                resolved.push(part);
                continue;
            }

            let filter = if index + 1 == components.len() {
                EntryFilter::ANY
            } else {
                EntryFilter::SUBDIRS
            };

            let found = self.find_object(&resolved, part, filter)?;
            resolved.push(found);
        }

        Some(resolved)
    }
}
