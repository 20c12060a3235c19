// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Login rate limiting.
//!
//! Fixed sliding window per client IP: at most 3 login attempts per minute.
//! Every attempt counts, successful or not. State lives in memory and resets
//! on restart.

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Attempts allowed per window.
const MAX_ATTEMPTS: usize = 3;

/// Window length.
const WINDOW: Duration = Duration::from_secs(60);

/// Per-IP sliding-window counter for login attempts.
pub struct LoginRateLimiter {
    max_attempts: usize,
    window: Duration,
    attempts: Mutex<HashMap<IpAddr, Vec<Instant>>>,
}

impl Default for LoginRateLimiter {
    fn default() -> Self {
        Self::new(MAX_ATTEMPTS, WINDOW)
    }
}

impl LoginRateLimiter {
    pub fn new(max_attempts: usize, window: Duration) -> Self {
        Self {
            max_attempts,
            window,
            attempts: Mutex::new(HashMap::new()),
        }
    }

    /// Record an attempt at `now`. Returns whether the attempt is allowed.
    ///
    /// A denied attempt is not recorded, so hammering the endpoint does not
    /// extend the lockout.
    pub fn check(&self, addr: IpAddr, now: Instant) -> bool {
        let mut attempts = match self.attempts.lock() {
            Ok(guard) => guard,
            // Poisoned lock only means another thread panicked mid-insert;
            // the map itself is still a valid set of timestamps.
            Err(poisoned) => poisoned.into_inner(),
        };

        let window = self.window;

        // Sweep fully-expired addresses so the map stays bounded by the set
        // of clients seen within the last window, not every client ever.
        attempts.retain(|_, timestamps| {
            timestamps.retain(|t| now.duration_since(*t) < window);
            !timestamps.is_empty()
        });

        let timestamps = attempts.entry(addr).or_default();
        if timestamps.len() >= self.max_attempts {
            return false;
        }
        timestamps.push(now);
        true
    }

    /// Number of addresses currently tracked.
    pub fn tracked_addresses(&self) -> usize {
        match self.attempts.lock() {
            Ok(guard) => guard.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }
}
