// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors

use std::path::Path;
use std::time::Instant;

use crate::{MutexOptions, Result};

#[cfg(unix)]
pub mod posix;

#[cfg(not(unix))]
pub mod unsupported;

/// Operations every per-OS named mutex provides.
///
/// Argument validation (closed handle, timeout range) happens in
/// [`NamedMutex`](crate::NamedMutex) before any of these are called.
pub(crate) trait RawNamedMutex: Sized {
    /// Open (or create) the named resource and try once, without blocking, to own it.
    fn open(name: &str, options: &MutexOptions) -> Result<Self>;

    /// Block until this handle owns the mutex.
    fn wait(&mut self) -> Result<bool>;

    /// Like [`wait`](Self::wait) but gives up at `deadline`.
    fn wait_until(&mut self, deadline: Instant) -> Result<bool>;

    /// Give up ownership if this handle has it; otherwise do nothing.
    fn release(&mut self) -> Result<()>;

    /// Release and close the underlying resource. Idempotent.
    fn close(&mut self) -> Result<()>;

    fn is_owned(&self) -> bool;

    fn is_closed(&self) -> bool;

    fn name(&self) -> &str;

    fn path(&self) -> &Path;
}

// Re-export the platform-specific implementation under a uniform name.

#[cfg(unix)]
pub(crate) use posix::FileLockMutex as PlatformMutex;

#[cfg(not(unix))]
pub(crate) use unsupported::UnsupportedMutex as PlatformMutex;
