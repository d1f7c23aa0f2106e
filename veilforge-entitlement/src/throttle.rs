//! Debounce guard for the trial-grant path.
//!
//! One grant attempt per principal per rolling 60-second window, regardless
//! of whether the attempt succeeds. This is a plain debounce, not a sliding
//! window or token bucket: a throttled call leaves the stamp untouched, so a
//! burst of calls does not push the window forward.

use std::collections::HashMap;
use std::sync::Mutex;
use veilforge_types::PrincipalId;

/// Minimum spacing between grant-path attempts, in milliseconds.
pub const WINDOW_MS: i64 = 60_000;

/// Per-principal rate limiter for trial-grant attempts.
#[derive(Debug)]
pub struct ThrottleGuard {
    window_ms: i64,
    last_attempt: Mutex<HashMap<PrincipalId, i64>>,
}

impl Default for ThrottleGuard {
    fn default() -> Self {
        Self::new(WINDOW_MS)
    }
}

impl ThrottleGuard {
    /// Creates a guard with a custom window. Production uses [`WINDOW_MS`].
    #[must_use]
    pub fn new(window_ms: i64) -> Self {
        Self {
            window_ms,
            last_attempt: Mutex::new(HashMap::new()),
        }
    }

    /// Checks the window and, if clear, stamps the attempt time.
    ///
    /// Returns `true` when the caller is throttled. Throttled calls perform
    /// no write: `last_attempt` only moves when an attempt is admitted.
    pub fn check_and_stamp(&self, id: &PrincipalId, now_ms: i64) -> bool {
        let mut attempts = self
            .last_attempt
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(last) = attempts.get(id) {
            if now_ms - last < self.window_ms {
                return true;
            }
        }
        attempts.insert(id.clone(), now_ms);
        false
    }

    /// Last admitted attempt time for a principal, if any. Diagnostic only.
    pub fn last_attempt_ms(&self, id: &PrincipalId) -> Option<i64> {
        self.last_attempt
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(id)
            .copied()
    }
}
