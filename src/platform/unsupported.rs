// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Placeholder for operating systems without a named mutex implementation.
// `open` fails immediately, so no other method is ever reached on a live value.

use std::path::{Path, PathBuf};
use std::time::Instant;

use super::RawNamedMutex;
use crate::{Error, MutexOptions, Result};

pub struct UnsupportedMutex {
    name: String,
    path: PathBuf,
}

impl RawNamedMutex for UnsupportedMutex {
    fn open(name: &str, _options: &MutexOptions) -> Result<Self> {
        tracing::debug!(name, "named mutex requested on an unsupported platform");
        Err(Error::UnsupportedPlatform)
    }

    fn wait(&mut self) -> Result<bool> {
        Err(Error::UnsupportedPlatform)
    }

    fn wait_until(&mut self, _deadline: Instant) -> Result<bool> {
        Err(Error::UnsupportedPlatform)
    }

    fn release(&mut self) -> Result<()> {
        Err(Error::UnsupportedPlatform)
    }

    fn close(&mut self) -> Result<()> {
        Ok(())
    }

    fn is_owned(&self) -> bool {
        false
    }

    fn is_closed(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_fails_fast() {
        let err = UnsupportedMutex::open("demo", &MutexOptions::default()).err();
        assert!(matches!(err, Some(Error::UnsupportedPlatform)));
    }
}
