// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Maps a mutex name to the path of its backing lock file.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Suffix appended to every mutex name to form the lock file name.
pub const LOCK_SUFFIX: &str = ".lock";

/// Produce `<dir>/<name>.lock`.
///
/// The name is concatenated as-is, without normalization. A leading '/' in the
/// name collapses into the separator, so `"/foo"` still resolves inside `dir`.
pub fn lock_path(dir: &Path, name: &str) -> PathBuf {
    let mut raw = OsString::from(dir.as_os_str());
    raw.push("/");
    raw.push(name);
    raw.push(LOCK_SUFFIX);
    PathBuf::from(raw)
}

/// Lock file path for `name` inside the platform temp directory.
pub fn default_lock_path(name: &str) -> PathBuf {
    lock_path(&std::env::temp_dir(), name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_suffix() {
        let p = lock_path(Path::new("/tmp"), "demo");
        assert_eq!(p, PathBuf::from("/tmp/demo.lock"));
    }

    #[test]
    fn leading_slash_stays_inside_dir() {
        let p = lock_path(Path::new("/tmp"), "/test_named-mutex");
        assert_eq!(p.file_name().unwrap(), "test_named-mutex.lock");
        assert!(p.starts_with("/tmp"));
    }

    #[test]
    fn default_uses_temp_dir() {
        let p = default_lock_path("x");
        assert!(p.starts_with(std::env::temp_dir()));
        assert!(p.to_string_lossy().ends_with("x.lock"));
    }
}
