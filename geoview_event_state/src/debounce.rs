// Copyright 2025 the Geoview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trailing debounce over host-supplied timestamps.
//!
//! Rapid resize notifications should trigger one re-layout once they stop.
//! [`Debounce`] keeps a single pending deadline: every [`Debounce::schedule`]
//! replaces it with `now + delay`, and [`Debounce::poll`] fires once the
//! latest deadline has passed. Time is passed in explicitly as milliseconds,
//! so the host decides where it comes from (animation frames, a timer
//! callback, or a test clock).
//!
//! ```
//! use geoview_event_state::debounce::Debounce;
//!
//! let mut resize = Debounce::new(200);
//! resize.schedule(0);
//! resize.schedule(150);
//! assert!(!resize.poll(300));
//! assert!(resize.poll(350));
//! assert!(!resize.poll(400));
//! ```

/// Default trailing delay for resize coalescing, in milliseconds.
pub const DEFAULT_DELAY_MS: u64 = 200;

/// A single replaceable trailing timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Debounce {
    delay_ms: u64,
    deadline: Option<u64>,
}

impl Default for Debounce {
    fn default() -> Self {
        Self::new(DEFAULT_DELAY_MS)
    }
}

impl Debounce {
    /// Creates an idle debounce with the given delay.
    #[must_use]
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            deadline: None,
        }
    }

    /// Configured delay in milliseconds.
    #[must_use]
    pub fn delay_ms(&self) -> u64 {
        self.delay_ms
    }

    /// Schedules (or reschedules) the trailing call for `now_ms + delay`.
    pub fn schedule(&mut self, now_ms: u64) {
        self.deadline = Some(now_ms.saturating_add(self.delay_ms));
    }

    /// Drops any pending call.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Returns `true` while a call is pending.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Pending deadline, if any.
    #[must_use]
    pub fn deadline(&self) -> Option<u64> {
        self.deadline
    }

    /// Returns `true` exactly once when the pending deadline has been reached.
    pub fn poll(&mut self, now_ms: u64) -> bool {
        match self.deadline {
            Some(deadline) if now_ms >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}
