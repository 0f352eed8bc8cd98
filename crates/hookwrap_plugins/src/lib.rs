//! Ready-made hooks for wrapped functions.
//!
//! This crate provides the instrumentation most users of `hookwrap_core` need:
//!
//! - [`TracingHooks`] - Logs every call, its results and its errors via `tracing`
//! - [`TracingConfig`] - Installs a `tracing_subscriber` with level, format and filter
//! - [`CallStats`] - Thread-safe call, success and failure counters
//! - [`validate_args`] / [`validate_each`] - Pre-hooks built from predicates
//! - [`instrument`] - Logging and statistics combined into one hook set
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use hookwrap_core::wrap;
//! use hookwrap_plugins::{CallStats, TracingConfig, instrument};
//!
//! fn greet(name: String) -> String {
//!     format!("hello, {name}")
//! }
//!
//! TracingConfig::new().init();
//!
//! let stats = Arc::new(CallStats::new());
//! let greet = wrap(greet, instrument("greet", &stats));
//!
//! assert_eq!(greet("world".to_string()), "hello, world");
//! assert_eq!(stats.calls(), 1);
//! ```

mod stats;
mod tracing_config;
mod tracing_hooks;
mod validate;

pub use stats::{CallStats, StatsSnapshot};
pub use tracing_config::{TracingConfig, TracingFormat, TracingInitError};
pub use tracing_hooks::TracingHooks;
pub use validate::{validate_args, validate_each};

use std::sync::Arc;

use hookwrap_core::hooks::HookSet;

/// Hooks that log calls of `name` at `INFO` and record them in `stats`.
///
/// Logging runs first, then the counters.
#[must_use]
pub fn instrument(name: impl Into<Arc<str>>, stats: &Arc<CallStats>) -> HookSet {
    TracingHooks::new(name).build().merge(stats.hooks())
}
