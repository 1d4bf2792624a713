// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// POSIX named mutex: a process-local gate layered over an advisory `flock(2)`
// on `<lock_dir>/<name>.lock`.
//
// `flock` locks belong to the open file description, so each handle's own
// descriptor competes with every other descriptor on the same file, in this
// process or another. They are not re-entrant and know nothing about threads,
// which is why every decision about a handle's lock is taken under the gate
// shared by all handles of that lock file in this process.

use std::fs::{File, OpenOptions};
use std::io;
use std::marker::PhantomData;
use std::os::unix::io::{AsRawFd, RawFd};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use super::RawNamedMutex;
use crate::backoff::adaptive_yield;
use crate::gate::{gate_for, Gate};
use crate::lock_name::lock_path;
use crate::{Error, MutexOptions, Result};

// ---------------------------------------------------------------------------
// flock primitives
// ---------------------------------------------------------------------------

fn flock(file: &File, op: libc::c_int) -> io::Result<()> {
    // SAFETY: the descriptor belongs to `file`, which stays open for the call.
    let rc = unsafe { libc::flock(file.as_raw_fd(), op) };
    if rc == 0 {
        Ok(())
    } else {
        Err(io::Error::last_os_error())
    }
}

/// `LOCK_EX | LOCK_NB`. `Ok(false)` when another descriptor holds the lock.
fn try_lock_exclusive(file: &File) -> io::Result<bool> {
    match flock(file, libc::LOCK_EX | libc::LOCK_NB) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::WouldBlock => Ok(false),
        Err(e) if e.raw_os_error() == Some(libc::EWOULDBLOCK) => Ok(false),
        Err(e) => Err(e),
    }
}

/// Blocking `LOCK_EX`. A signal ends the wait with `ErrorKind::Interrupted`.
fn lock_exclusive(file: &File) -> io::Result<bool> {
    flock(file, libc::LOCK_EX).map(|()| true)
}

fn unlock(file: &File) -> io::Result<()> {
    flock(file, libc::LOCK_UN)
}

/// Worker body: poll the non-blocking lock until it is granted or `cancelled` is set.
fn poll_exclusive(file: &File, cancelled: &AtomicBool) -> io::Result<bool> {
    let mut k = 0u32;
    loop {
        if try_lock_exclusive(file)? {
            return Ok(true);
        }
        if cancelled.load(Ordering::Acquire) {
            return Ok(false);
        }
        adaptive_yield(&mut k);
    }
}

/// Acquire the file lock, giving up at `deadline`.
///
/// One non-blocking attempt is made on the calling thread. If that is contended,
/// a worker polls the lock and the caller races its report against the
/// deadline. On timeout the worker is cancelled and joined; it notices the flag
/// within one backoff step. A grant it obtained after the deadline is unlocked
/// here, so a timed-out call never leaves the descriptor locked.
fn lock_exclusive_until(file: &File, deadline: Instant) -> io::Result<bool> {
    if try_lock_exclusive(file)? {
        return Ok(true);
    }
    let remaining = deadline.saturating_duration_since(Instant::now());
    if remaining.is_zero() {
        return Ok(false);
    }

    let cancelled = AtomicBool::new(false);
    thread::scope(|s| {
        let cancelled = &cancelled;
        let (report, outcome) = mpsc::channel();
        s.spawn(move || {
            let _ = report.send(poll_exclusive(file, cancelled));
        });

        match outcome.recv_timeout(remaining) {
            Ok(result) => result,
            // A disconnect means the worker panicked; the scope re-raises that.
            Err(_) => {
                cancelled.store(true, Ordering::Release);
                settle_after_deadline(file, outcome.recv().unwrap_or(Ok(false)))
            }
        }
    })
}

/// Final worker report after cancellation. A late grant is unlocked and
/// reported as a timeout; lock errors propagate unchanged.
fn settle_after_deadline(file: &File, late: io::Result<bool>) -> io::Result<bool> {
    if late? {
        tracing::debug!("discarding file lock granted after the deadline");
        unlock(file)?;
    }
    Ok(false)
}

// ---------------------------------------------------------------------------
// FileLockMutex
// ---------------------------------------------------------------------------

/// Proof that the handle's descriptor holds the file lock.
#[derive(Debug, Clone, Copy)]
struct LockToken {
    fd: RawFd,
    acquired_at: Instant,
}

/// Where a handle stands with respect to its lock.
///
/// ```text
///   Free ──attempt──▶ Acquiring ──granted──▶ Owned ──release()──▶ Free
///                        │
///                        └──refused / error / interrupted──▶ Free
/// ```
///
/// The gate is taken for every attempt. If the attempt fails it is returned
/// before the call exits. If it succeeds the hold is kept for as long as the
/// handle is `Owned`, so no other thread can touch this name's lock state, and
/// `release()` returns it. Those two unlocks are a matched pair: removing either
/// one leaks the gate or unlocks it twice.
#[derive(Debug, Clone, Copy)]
enum Ownership {
    Free,
    Acquiring,
    Owned(LockToken),
}

pub struct FileLockMutex {
    name: String,
    path: PathBuf,
    file: Option<File>,
    ownership: Ownership,
    gate: Arc<Gate>,
    // The gate hold belongs to the thread that acquired; keep the handle on it.
    _thread_bound: PhantomData<*const ()>,
}

impl FileLockMutex {
    fn descriptor(&self) -> io::Result<&File> {
        self.file
            .as_ref()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "lock file is closed"))
    }

    /// A recorded token counts only while its descriptor is still ours and open.
    fn valid_token(&self) -> Option<LockToken> {
        match self.ownership {
            Ownership::Owned(token)
                if self.file.as_ref().map(AsRawFd::as_raw_fd) == Some(token.fd) =>
            {
                Some(token)
            }
            _ => None,
        }
    }

    /// Settle an attempt made while holding the gate.
    ///
    /// On a grant the gate hold is kept (see [`Ownership`]). Otherwise the gate
    /// is returned before the outcome is reported.
    fn finish_attempt(&mut self, attempt: io::Result<bool>) -> Result<bool> {
        match (attempt, self.file.as_ref()) {
            (Ok(true), Some(file)) => {
                let token = LockToken {
                    fd: file.as_raw_fd(),
                    acquired_at: Instant::now(),
                };
                self.ownership = Ownership::Owned(token);
                tracing::debug!(name = %self.name, "acquired named mutex");
                Ok(true)
            }
            (Ok(_), _) => {
                self.ownership = Ownership::Free;
                self.gate.unlock();
                Ok(false)
            }
            (Err(e), _) => {
                self.ownership = Ownership::Free;
                self.gate.unlock();
                if e.kind() == io::ErrorKind::Interrupted {
                    tracing::debug!(name = %self.name, "wait interrupted");
                    Err(Error::interrupted(&self.name))
                } else {
                    Err(e.into())
                }
            }
        }
    }

    /// Already owned: drop the hold this call just took and report success.
    /// The hold kept by the original acquisition stays in place.
    fn reenter(&self) -> Result<bool> {
        self.gate.unlock();
        Ok(true)
    }

    fn release_owned(&mut self) -> Result<()> {
        if !self.gate.try_lock() {
            // Another thread is mid-operation on this lock file; don't block here.
            tracing::trace!(name = %self.name, "gate busy, release skipped");
            return Ok(());
        }
        let mut result = Ok(());
        if let Some(token) = self.valid_token() {
            result = self.descriptor().and_then(unlock);
            self.ownership = Ownership::Free;
            // The hold retained since the acquisition.
            self.gate.unlock();
            tracing::debug!(
                name = %self.name,
                held_for = ?token.acquired_at.elapsed(),
                "released named mutex"
            );
        }
        self.gate.unlock();
        result.map_err(Error::from)
    }
}

impl RawNamedMutex for FileLockMutex {
    fn open(name: &str, options: &MutexOptions) -> Result<Self> {
        let path = lock_path(options.lock_dir(), name);
        let gate = gate_for(&path);
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)?;
        tracing::trace!(
            name,
            path = %path.display(),
            initially_owned = options.initially_owned(),
            "opened lock file"
        );

        let mut mutex = Self {
            name: name.to_string(),
            path,
            file: Some(file),
            ownership: Ownership::Free,
            gate,
            _thread_bound: PhantomData,
        };

        if mutex.gate.try_lock() {
            mutex.ownership = Ownership::Acquiring;
            let attempt = mutex.descriptor().and_then(try_lock_exclusive);
            mutex.finish_attempt(attempt)?;
        }
        Ok(mutex)
    }

    fn wait(&mut self) -> Result<bool> {
        self.gate.lock();
        if self.valid_token().is_some() {
            return self.reenter();
        }
        self.ownership = Ownership::Acquiring;
        let attempt = self.descriptor().and_then(lock_exclusive);
        self.finish_attempt(attempt)
    }

    fn wait_until(&mut self, deadline: Instant) -> Result<bool> {
        if !self.gate.try_lock_until(deadline) {
            return Ok(false);
        }
        if self.valid_token().is_some() {
            return self.reenter();
        }
        self.ownership = Ownership::Acquiring;
        let attempt = self
            .descriptor()
            .and_then(|file| lock_exclusive_until(file, deadline));
        self.finish_attempt(attempt)
    }

    fn release(&mut self) -> Result<()> {
        self.release_owned()
    }

    fn close(&mut self) -> Result<()> {
        if self.file.is_none() {
            return Ok(());
        }
        let released = self.release_owned();
        // Closing the descriptor drops any file lock still attached to it.
        self.file = None;
        self.ownership = Ownership::Free;
        tracing::trace!(name = %self.name, "closed lock file");
        released
    }

    fn is_owned(&self) -> bool {
        self.valid_token().is_some()
    }

    fn is_closed(&self) -> bool {
        self.file.is_none()
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for FileLockMutex {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            tracing::warn!(name = %self.name, "failed to release named mutex on drop: {e}");
        }
    }
}
