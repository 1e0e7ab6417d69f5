//! Path string helpers shared by asset lookup and engine bootstrap.

use std::env;
use std::path::{Path, PathBuf};

/// Separator emitted by [`join_paths`].
pub const SEPARATOR: char = '/';

fn is_separator(c: char) -> bool {
    c == '/' || c == '\\'
}

/// Join two path components with exactly one separator between them.
///
/// Trailing separators on `first` and leading separators on `second` are
/// collapsed. An empty component yields the other one unchanged, and a
/// `first` consisting only of separators keeps a single root separator.
pub fn join_paths(first: &str, second: &str) -> String {
    if first.is_empty() {
        return second.to_string();
    }
    if second.is_empty() {
        return first.to_string();
    }

    let head = first.trim_end_matches(is_separator);
    let tail = second.trim_start_matches(is_separator);

    let mut joined = String::with_capacity(head.len() + tail.len() + 1);
    joined.push_str(head);
    joined.push(SEPARATOR);
    joined.push_str(tail);
    joined
}

/// Get the directory containing `path`.
///
/// With `absolute` set, a relative `path` is resolved against the current
/// working directory first. Paths without a parent yield themselves when they
/// are a root, and an empty path otherwise.
pub fn parent_path(path: impl AsRef<Path>, absolute: bool) -> PathBuf {
    let path = path.as_ref();

    let full = if absolute && path.is_relative() {
        match env::current_dir() {
            Ok(cwd) => cwd.join(path),
            Err(err) => {
                tracing::warn!(error = %err, "Working directory unavailable, keeping relative path");
                path.to_path_buf()
            }
        }
    } else {
        path.to_path_buf()
    };

    match full.parent() {
        Some(parent) => parent.to_path_buf(),
        // Only roots and the empty path have no parent.
        None => full,
    }
}

/// Relative location of the supplementary data directory inside a macOS bundle.
#[cfg(target_os = "macos")]
const EXTRA_DATA_RELATIVE: Option<&str> = Some("../Resources");

#[cfg(not(target_os = "macos"))]
const EXTRA_DATA_RELATIVE: Option<&str> = None;

/// Get the directory holding supplementary asset data shipped with the executable.
pub fn extra_data_dir(exe_folder: impl AsRef<Path>) -> PathBuf {
    let exe_folder = exe_folder.as_ref();
    match EXTRA_DATA_RELATIVE {
        Some(relative) => exe_folder.join(relative),
        None => exe_folder.to_path_buf(),
    }
}
