// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Error taxonomy for named mutex operations.

use std::io;

use thiserror::Error;

/// Errors returned by [`NamedMutex`](crate::NamedMutex) operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The handle was closed; only `close` is still accepted.
    #[error("named mutex `{name}` has been closed")]
    Disposed { name: String },

    /// A millisecond timeout below [`INFINITE`](crate::INFINITE).
    #[error("invalid timeout {0} ms (must be >= -1)")]
    InvalidTimeout(i64),

    /// A blocking wait was interrupted by a signal before ownership was obtained.
    #[error("wait on named mutex `{name}` was interrupted")]
    Interrupted { name: String },

    /// No named mutex implementation exists for the current OS.
    #[error("named mutexes are not supported on this platform")]
    UnsupportedPlatform,

    /// Opening, locking or unlocking the backing lock file failed.
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    pub(crate) fn disposed(name: &str) -> Self {
        Self::Disposed {
            name: name.to_string(),
        }
    }

    pub(crate) fn interrupted(name: &str) -> Self {
        Self::Interrupted {
            name: name.to_string(),
        }
    }

    /// Whether this error reports use of a closed handle.
    pub fn is_disposed(&self) -> bool {
        matches!(self, Self::Disposed { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_pass_through() {
        let err: Error = io::Error::new(io::ErrorKind::PermissionDenied, "nope").into();
        match err {
            Error::Io(e) => assert_eq!(e.kind(), io::ErrorKind::PermissionDenied),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn messages_name_the_mutex() {
        assert_eq!(
            Error::disposed("demo").to_string(),
            "named mutex `demo` has been closed"
        );
        assert!(Error::interrupted("demo").to_string().contains("demo"));
        assert!(Error::disposed("demo").is_disposed());
        assert!(!Error::InvalidTimeout(-2).is_disposed());
    }
}
