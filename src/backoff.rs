// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Adaptive backoff for polling loops: pause → yield → sleep.

use std::time::Duration;

/// Longest pause taken by [`adaptive_yield`].
pub(crate) const MAX_PAUSE: Duration = Duration::from_millis(1);

/// Back off a little more each call.
///
/// - k < 4:  busy spin (do nothing)
/// - k < 16: CPU pause hint
/// - k < 32: thread yield
/// - k >= 32: sleep [`MAX_PAUSE`]
#[inline]
pub(crate) fn adaptive_yield(k: &mut u32) {
    if *k < 4 {
        // busy spin
    } else if *k < 16 {
        std::hint::spin_loop();
    } else if *k < 32 {
        std::thread::yield_now();
    } else {
        std::thread::sleep(MAX_PAUSE);
        return;
    }
    *k += 1;
}
