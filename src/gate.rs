// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Process-local gate per lock file.
// Every handle opened on the same lock file in this process shares one gate, so
// only one thread at a time decides what happens to that file's inter-process
// lock. The gate is re-entrant and owned by a thread, and its hold may
// outlive the call that took it (see `platform::posix`).

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, OnceLock, PoisonError};
use std::thread::{self, ThreadId};
use std::time::Instant;

#[derive(Debug, Default)]
struct Holder {
    owner: Option<ThreadId>,
    depth: usize,
}

impl Holder {
    fn try_enter(&mut self, me: ThreadId) -> bool {
        match self.owner {
            None => {
                self.owner = Some(me);
                self.depth = 1;
                true
            }
            Some(owner) if owner == me => {
                self.depth += 1;
                true
            }
            Some(_) => false,
        }
    }
}

/// Re-entrant mutual exclusion owned by a thread.
#[derive(Debug, Default)]
pub(crate) struct Gate {
    holder: Mutex<Holder>,
    freed: Condvar,
}

impl Gate {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn holder(&self) -> MutexGuard<'_, Holder> {
        // The critical sections below never panic; recover the state anyway.
        self.holder.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Block until the calling thread holds the gate.
    pub(crate) fn lock(&self) {
        let me = thread::current().id();
        let mut h = self.holder();
        while !h.try_enter(me) {
            h = self.freed.wait(h).unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Take the gate without blocking.
    pub(crate) fn try_lock(&self) -> bool {
        self.holder().try_enter(thread::current().id())
    }

    /// Take the gate, giving up at `deadline`.
    pub(crate) fn try_lock_until(&self, deadline: Instant) -> bool {
        let me = thread::current().id();
        let mut h = self.holder();
        loop {
            if h.try_enter(me) {
                return true;
            }
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            h = self
                .freed
                .wait_timeout(h, deadline - now)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
    }

    /// Drop one level of the calling thread's hold.
    ///
    /// Returns `false` (and changes nothing) if the caller does not hold the gate.
    pub(crate) fn unlock(&self) -> bool {
        let me = thread::current().id();
        let mut h = self.holder();
        if h.owner != Some(me) {
            tracing::warn!("gate unlock from a thread that does not hold it");
            return false;
        }
        h.depth -= 1;
        if h.depth == 0 {
            h.owner = None;
            drop(h);
            self.freed.notify_all();
        }
        true
    }

    /// Hold depth of the calling thread (0 if another thread or nobody holds it).
    #[cfg(test)]
    pub(crate) fn depth_held_by_current(&self) -> usize {
        let h = self.holder();
        if h.owner == Some(thread::current().id()) {
            h.depth
        } else {
            0
        }
    }
}

fn registry() -> &'static Mutex<HashMap<PathBuf, Arc<Gate>>> {
    static GATES: OnceLock<Mutex<HashMap<PathBuf, Arc<Gate>>>> = OnceLock::new();
    GATES.get_or_init(|| Mutex::new(HashMap::new()))
}

/// Shared gate for the lock file at `path`, created on first use.
///
/// Keyed by the resolved path, so a name maps to one gate per lock directory
/// (exactly one under the default directory). Entries live for the rest of the
/// process; one small allocation per distinct path is never reclaimed.
pub(crate) fn gate_for(path: &Path) -> Arc<Gate> {
    let mut gates = registry().lock().unwrap_or_else(PoisonError::into_inner);
    let gate = gates
        .entry(path.to_path_buf())
        .or_insert_with(|| Arc::new(Gate::new()));
    Arc::clone(gate)
}
