/*
 * This file is part of ev3port.
 *
 * Copyright (C) 2025 ev3port contributors
 *
 * ev3port is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * ev3port is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with ev3port. If not, see <https://www.gnu.org/licenses/>.
 */

//! Monotonic time and sleeping
//!
//! The reset protocol is the only caller that waits. It takes its clock as a
//! [`Clock`] so tests run the full protocol in simulated time.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

#[cfg_attr(test, mockall::automock)]
pub trait Clock {
    fn now(&self) -> Instant;

    /// Block the calling thread for at least `duration`
    fn sleep(&self, duration: Duration);
}

/// The process monotonic clock and `thread::sleep`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) {
        thread::sleep(duration);
    }
}

/// Simulated clock: `sleep` advances time instantly and is recorded.
///
/// Clones share the same timeline, so a test can keep one clone and hand
/// another to a binding.
#[derive(Debug, Clone)]
pub struct ManualClock {
    inner: Arc<Mutex<ManualState>>,
}

#[derive(Debug)]
struct ManualState {
    origin: Instant,
    elapsed: Duration,
    sleeps: Vec<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(ManualState {
                origin: Instant::now(),
                elapsed: Duration::ZERO,
                sleeps: Vec::new(),
            })),
        }
    }

    /// Move time forward without recording a sleep
    pub fn advance(&self, duration: Duration) {
        self.inner.lock().elapsed += duration;
    }

    /// Simulated time since the clock was created
    pub fn elapsed(&self) -> Duration {
        self.inner.lock().elapsed
    }

    /// Every sleep requested so far, in order
    pub fn sleeps(&self) -> Vec<Duration> {
        self.inner.lock().sleeps.clone()
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        let state = self.inner.lock();
        state.origin + state.elapsed
    }

    fn sleep(&self, duration: Duration) {
        let mut state = self.inner.lock();
        state.elapsed += duration;
        state.sleeps.push(duration);
    }
}
