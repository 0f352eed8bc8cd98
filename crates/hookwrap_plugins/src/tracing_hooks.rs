//! Logging hooks.
//!
//! [`TracingHooks`] builds a [`HookSet`] that reports every call of a wrapped
//! function through `tracing`:
//!
//! - the pre-hook emits `call started` with the arguments
//! - the post-hook emits `call finished` with the results
//! - the error observer emits `call failed` at `WARN`, whatever the configured level
//!
//! The hooks never reject a call, so wrapping with them leaves results unchanged.
//!
//! # Example
//!
//! ```
//! use hookwrap_core::wrap;
//! use hookwrap_plugins::TracingHooks;
//! use tracing::Level;
//!
//! fn area(width: u32, height: u32) -> u32 {
//!     width * height
//! }
//!
//! let area = wrap(
//!     area,
//!     TracingHooks::new("area")
//!         .with_level(Level::DEBUG)
//!         .with_results(false)
//!         .build(),
//! );
//!
//! assert_eq!(area(3, 4), 12);
//! ```

use std::sync::Arc;

use hookwrap_core::hooks::HookSet;
use tracing::Level;

/// Emits an event at a level only known at runtime.
macro_rules! event_at {
    ($level:expr, $($arg:tt)+) => {
        if $level == Level::ERROR {
            tracing::error!($($arg)+)
        } else if $level == Level::WARN {
            tracing::warn!($($arg)+)
        } else if $level == Level::INFO {
            tracing::info!($($arg)+)
        } else if $level == Level::DEBUG {
            tracing::debug!($($arg)+)
        } else {
            tracing::trace!($($arg)+)
        }
    };
}

/// Builder for hooks that log calls of one wrapped function.
#[derive(Debug, Clone)]
pub struct TracingHooks {
    /// Name reported in the `function` field.
    name: Arc<str>,
    /// Level of the start and finish events.
    level: Level,
    /// Whether arguments are recorded.
    log_args: bool,
    /// Whether results are recorded.
    log_results: bool,
}

impl TracingHooks {
    /// Creates hooks logging calls of `name` at `INFO`, with arguments and
    /// results.
    #[must_use]
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            level: Level::INFO,
            log_args: true,
            log_results: true,
        }
    }

    /// Sets the level of the start and finish events.
    #[must_use]
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Sets whether arguments are recorded in `call started`.
    #[must_use]
    pub fn with_args(mut self, enabled: bool) -> Self {
        self.log_args = enabled;
        self
    }

    /// Sets whether results are recorded in `call finished`.
    #[must_use]
    pub fn with_results(mut self, enabled: bool) -> Self {
        self.log_results = enabled;
        self
    }

    /// The function name reported in every event.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The level of the start and finish events.
    #[must_use]
    pub fn level(&self) -> Level {
        self.level
    }

    /// Builds the hook set.
    #[must_use]
    pub fn build(self) -> HookSet {
        let Self {
            name,
            level,
            log_args,
            log_results,
        } = self;
        let pre_name = Arc::clone(&name);
        let post_name = Arc::clone(&name);

        HookSet::new()
            .with_pre_hook(move |args| {
                if log_args {
                    event_at!(level, function = %pre_name, args = ?args, "call started");
                } else {
                    event_at!(level, function = %pre_name, "call started");
                }
                Ok(())
            })
            .with_post_hook(move |results| {
                if log_results {
                    event_at!(level, function = %post_name, results = ?results, "call finished");
                } else {
                    event_at!(level, function = %post_name, "call finished");
                }
                Ok(())
            })
            .with_error_hook(move |err| {
                tracing::warn!(function = %name, error = %err, "call failed");
            })
    }
}

impl From<TracingHooks> for HookSet {
    fn from(hooks: TracingHooks) -> Self {
        hooks.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hookwrap_core::hooks::HookError;

    #[test]
    fn defaults() {
        let hooks = TracingHooks::new("add");
        assert_eq!(hooks.name(), "add");
        assert_eq!(hooks.level(), Level::INFO);
        assert!(hooks.log_args);
        assert!(hooks.log_results);
    }

    #[test]
    fn builder_sets_fields() {
        let hooks = TracingHooks::new(String::from("add"))
            .with_level(Level::TRACE)
            .with_args(false)
            .with_results(false);

        assert_eq!(hooks.level(), Level::TRACE);
        assert!(!hooks.log_args);
        assert!(!hooks.log_results);
    }

    #[test]
    fn built_hooks_never_reject() {
        let hooks = TracingHooks::new("add").build();

        assert!(hooks.has_pre_hook());
        assert!(hooks.has_post_hook());
        assert!(hooks.has_error_hook());
        assert!(hooks.run_pre(&[&1_i32, &2_i32]).is_ok());
        assert!(hooks.run_post(&[&3_i32]).is_ok());
        hooks.notify(&HookError::rejected("ignored"));
    }

    #[test]
    fn every_level_is_accepted() {
        for level in [
            Level::ERROR,
            Level::WARN,
            Level::INFO,
            Level::DEBUG,
            Level::TRACE,
        ] {
            let hooks = HookSet::from(TracingHooks::new("noop").with_level(level));
            assert!(hooks.run_pre(&[]).is_ok());
        }
    }
}
