// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Cross-process named mutex with Windows named-mutex semantics, built on
// advisory file locks. A per-lock-file in-process gate serializes the threads of
// one process; an exclusive lock on `<temp>/<name>.lock` excludes other processes.

mod error;
pub use error::{Error, Result};

pub mod lock_name;

mod options;
pub use options::MutexOptions;

mod backoff;
mod gate;
mod platform;

mod mutex;
pub use mutex::{NamedMutex, INFINITE};

mod guard;
pub use guard::NamedMutexGuard;
