//! Call statistics.
//!
//! [`CallStats`] counts the calls of one or more wrapped functions. It is
//! shared through an `Arc`; [`CallStats::hooks`] produces a [`HookSet`] that
//! feeds the counters, and can be combined with other hooks through
//! [`HookSet::merge`].
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use hookwrap_core::hooks::HookError;
//! use hookwrap_core::wrap;
//! use hookwrap_plugins::CallStats;
//!
//! fn checked_sub(a: u32, b: u32) -> Result<u32, HookError> {
//!     a.checked_sub(b).ok_or_else(|| HookError::rejected("underflow"))
//! }
//!
//! let stats = Arc::new(CallStats::new());
//! let sub = wrap(checked_sub, stats.hooks());
//!
//! assert_eq!(sub(5, 3).unwrap(), 2);
//! assert!(sub(3, 5).is_err());
//!
//! let snapshot = stats.snapshot();
//! assert_eq!(snapshot.calls, 2);
//! assert_eq!(snapshot.successes, 1);
//! assert_eq!(snapshot.failures, 1);
//! assert_eq!(snapshot.last_error.as_deref(), Some("underflow"));
//! ```

use core::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use hookwrap_core::hooks::HookSet;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// Thread-safe call counters.
///
/// - `calls` counts calls that reached the pre-hook stage
/// - `successes` counts calls whose results reached the post-hook stage
/// - `failures` counts errors reported to the observer
///
/// When the stats hooks are merged after another hook set, a call rejected
/// by the earlier pre-hook is counted as a failure but not as a call.
#[derive(Debug, Default)]
pub struct CallStats {
    calls: AtomicU64,
    successes: AtomicU64,
    failures: AtomicU64,
    last_error: Mutex<Option<String>>,
}

/// Point-in-time copy of [`CallStats`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    /// Calls started.
    pub calls: u64,
    /// Calls whose results reached the post-hook stage.
    pub successes: u64,
    /// Errors reported, from any stage.
    pub failures: u64,
    /// Message of the most recent error, if any.
    pub last_error: Option<String>,
}

impl StatsSnapshot {
    /// Serializes the snapshot as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl CallStats {
    /// Creates zeroed counters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds hooks that record into these counters.
    ///
    /// The hooks never reject a call.
    #[must_use]
    pub fn hooks(self: &Arc<Self>) -> HookSet {
        let pre = Arc::clone(self);
        let post = Arc::clone(self);
        let error = Arc::clone(self);

        HookSet::new()
            .with_pre_hook(move |_| {
                pre.calls.fetch_add(1, Ordering::Relaxed);
                Ok(())
            })
            .with_post_hook(move |_| {
                post.successes.fetch_add(1, Ordering::Relaxed);
                Ok(())
            })
            .with_error_hook(move |err| {
                error.failures.fetch_add(1, Ordering::Relaxed);
                *error.last_error.lock() = Some(err.to_string());
            })
    }

    /// Calls started.
    #[must_use]
    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }

    /// Calls whose results reached the post-hook stage.
    #[must_use]
    pub fn successes(&self) -> u64 {
        self.successes.load(Ordering::Relaxed)
    }

    /// Errors reported.
    #[must_use]
    pub fn failures(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }

    /// Returns a copy of the current counters.
    #[must_use]
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            calls: self.calls(),
            successes: self.successes(),
            failures: self.failures(),
            last_error: self.last_error.lock().clone(),
        }
    }

    /// Zeroes every counter and forgets the last error.
    pub fn reset(&self) {
        self.calls.store(0, Ordering::Relaxed);
        self.successes.store(0, Ordering::Relaxed);
        self.failures.store(0, Ordering::Relaxed);
        *self.last_error.lock() = None;
    }
}
