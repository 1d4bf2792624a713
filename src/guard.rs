// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// RAII guard that owns a named mutex for its lifetime.

use crate::{NamedMutex, Result};

/// Releases the mutex when dropped.
///
/// Returned by [`NamedMutex::lock`] and [`NamedMutex::try_lock_for`]. Use
/// [`unlock`](Self::unlock) to observe a release error instead of having it logged.
#[derive(Debug)]
#[must_use = "the mutex is released as soon as the guard is dropped"]
pub struct NamedMutexGuard<'a> {
    mtx: Option<&'a mut NamedMutex>,
}

impl<'a> NamedMutexGuard<'a> {
    pub(crate) fn new(mtx: &'a mut NamedMutex) -> Self {
        Self { mtx: Some(mtx) }
    }

    /// Name of the held mutex.
    pub fn name(&self) -> &str {
        self.mtx.as_deref().map_or("", NamedMutex::name)
    }

    /// Release now and report the outcome.
    pub fn unlock(mut self) -> Result<()> {
        match self.mtx.take() {
            Some(mtx) => mtx.release(),
            None => Ok(()),
        }
    }
}

impl Drop for NamedMutexGuard<'_> {
    fn drop(&mut self) {
        if let Some(mtx) = self.mtx.take() {
            if let Err(e) = mtx.release() {
                tracing::warn!(name = mtx.name(), "failed to release named mutex: {e}");
            }
        }
    }
}
