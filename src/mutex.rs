// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Cross-platform named inter-process mutex.
// Delegates to platform::PlatformMutex (flock on POSIX, unsupported elsewhere).

use std::io;
use std::path::Path;
use std::time::{Duration, Instant};

use crate::lock_name::{default_lock_path, lock_path};
use crate::platform::{PlatformMutex, RawNamedMutex};
use crate::{Error, MutexOptions, NamedMutexGuard, Result};

/// Timeout sentinel for [`NamedMutex::wait_one_timeout`]: wait without limit.
pub const INFINITE: i64 = -1;

/// A named mutex shared by every process that opens the same name.
///
/// Modeled on a Windows named mutex: opening never blocks and may already
/// grant ownership, `wait_one*` acquires, `release` gives ownership up and
/// `close` (or drop) tears the handle down.
///
/// Ownership is thread-affine, so handles are neither `Send` nor `Sync`. Open
/// one handle per thread that needs the mutex.
pub struct NamedMutex {
    inner: PlatformMutex,
}

impl NamedMutex {
    /// Open (or create) the mutex `name` with default options.
    pub fn open(name: &str) -> Result<Self> {
        Self::open_with(name, &MutexOptions::default())
    }

    /// Open (or create) the mutex `name`, recording `initially_owned`.
    ///
    /// Ownership is attempted either way; see [`MutexOptions::with_initially_owned`].
    pub fn open_owned(initially_owned: bool, name: &str) -> Result<Self> {
        Self::open_with(
            name,
            &MutexOptions::default().with_initially_owned(initially_owned),
        )
    }

    /// Open (or create) the mutex `name` with explicit options.
    ///
    /// Makes one non-blocking attempt to own the mutex; check [`is_owned`](Self::is_owned).
    pub fn open_with(name: &str, options: &MutexOptions) -> Result<Self> {
        let inner = PlatformMutex::open(name, options)?;
        Ok(Self { inner })
    }

    fn ensure_open(&self) -> Result<()> {
        if self.inner.is_closed() {
            return Err(Error::disposed(self.inner.name()));
        }
        Ok(())
    }

    /// Block until this handle owns the mutex. Returns `Ok(true)` once owned.
    ///
    /// Returns immediately if the handle already owns it. Only the wait on the
    /// lock file is interruptible: a signal delivered while blocked there ends
    /// the wait with [`Error::Interrupted`]. Waiting behind another thread of
    /// this process that holds the same mutex ignores signals.
    pub fn wait_one(&mut self) -> Result<bool> {
        self.ensure_open()?;
        self.inner.wait()
    }

    /// Wait at most `timeout_ms` milliseconds for ownership.
    ///
    /// Returns `Ok(false)` on timeout. [`INFINITE`] waits like
    /// [`wait_one`](Self::wait_one); anything below it is rejected.
    pub fn wait_one_timeout(&mut self, timeout_ms: i64) -> Result<bool> {
        self.ensure_open()?;
        if timeout_ms < INFINITE {
            return Err(Error::InvalidTimeout(timeout_ms));
        }
        if timeout_ms == INFINITE {
            return self.inner.wait();
        }
        self.wait_up_to(Duration::from_millis(timeout_ms.unsigned_abs()))
    }

    /// Wait at most `timeout` for ownership. Returns `Ok(false)` on timeout.
    pub fn wait_one_for(&mut self, timeout: Duration) -> Result<bool> {
        self.ensure_open()?;
        self.wait_up_to(timeout)
    }

    fn wait_up_to(&mut self, timeout: Duration) -> Result<bool> {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => self.inner.wait_until(deadline),
            None => self.inner.wait(),
        }
    }

    /// Give up ownership. A no-op if this handle does not own the mutex.
    pub fn release(&mut self) -> Result<()> {
        self.ensure_open()?;
        self.inner.release()
    }

    /// Release and close the handle. Later calls are no-ops.
    ///
    /// Every other operation fails with [`Error::Disposed`] afterwards.
    pub fn close(&mut self) -> Result<()> {
        self.inner.close()
    }

    /// Block until owned and return a guard that releases on drop.
    pub fn lock(&mut self) -> Result<NamedMutexGuard<'_>> {
        self.wait_one()?;
        Ok(NamedMutexGuard::new(self))
    }

    /// Wait at most `timeout`; `Ok(None)` on timeout.
    pub fn try_lock_for(&mut self, timeout: Duration) -> Result<Option<NamedMutexGuard<'_>>> {
        if self.wait_one_for(timeout)? {
            Ok(Some(NamedMutexGuard::new(self)))
        } else {
            Ok(None)
        }
    }

    /// Whether this handle currently owns the mutex.
    pub fn is_owned(&self) -> bool {
        self.inner.is_owned()
    }

    /// Whether [`close`](Self::close) has run on this handle.
    pub fn is_closed(&self) -> bool {
        self.inner.is_closed()
    }

    /// Name the mutex was opened with.
    pub fn name(&self) -> &str {
        self.inner.name()
    }

    /// Path of the backing lock file.
    pub fn path(&self) -> &Path {
        self.inner.path()
    }

    /// Remove the lock file for `name` from the temp directory.
    ///
    /// Only safe when no process has the mutex open: a process that opens the
    /// name afterwards gets a fresh file and no longer excludes holders of the old one.
    pub fn clear_storage(name: &str) -> io::Result<()> {
        remove_lock_file(&default_lock_path(name))
    }

    /// Remove the lock file for `name` from `dir`. Missing files are not an error.
    pub fn clear_storage_in(dir: &Path, name: &str) -> io::Result<()> {
        remove_lock_file(&lock_path(dir, name))
    }
}

fn remove_lock_file(path: &Path) -> io::Result<()> {
    match std::fs::remove_file(path) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}

impl std::fmt::Debug for NamedMutex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NamedMutex")
            .field("name", &self.name())
            .field("path", &self.path())
            .field("owned", &self.is_owned())
            .field("closed", &self.is_closed())
            .finish()
    }
}
