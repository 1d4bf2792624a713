// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Open-time configuration for a named mutex handle.

use std::path::{Path, PathBuf};

/// Options used when opening a [`NamedMutex`](crate::NamedMutex).
#[derive(Debug, Clone)]
pub struct MutexOptions {
    lock_dir: PathBuf,
    initially_owned: bool,
}

impl Default for MutexOptions {
    fn default() -> Self {
        Self {
            lock_dir: std::env::temp_dir(),
            initially_owned: false,
        }
    }
}

impl MutexOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory holding the `<name>.lock` files. Defaults to the temp directory.
    ///
    /// Every process sharing a mutex must use the same directory.
    #[must_use]
    pub fn with_lock_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.lock_dir = dir.into();
        self
    }

    /// Request initial ownership.
    ///
    /// Opening always makes one non-blocking attempt to own the mutex, whatever
    /// this flag says. The flag is recorded and logged only.
    #[must_use]
    pub fn with_initially_owned(mut self, owned: bool) -> Self {
        self.initially_owned = owned;
        self
    }

    pub fn lock_dir(&self) -> &Path {
        &self.lock_dir
    }

    pub fn initially_owned(&self) -> bool {
        self.initially_owned
    }
}
