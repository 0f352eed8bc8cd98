//! # hookwrap Internal Library
//!
//! Re-exports the hookwrap crates for convenience.

/// Function wrapping, hooks and the signature cache.
pub use hookwrap_core;

/// Ready-made logging, statistics and validation hooks.
pub use hookwrap_plugins;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use hookwrap_core::prelude::*;
    pub use hookwrap_plugins::{
        CallStats, StatsSnapshot, TracingConfig, TracingFormat, TracingHooks, instrument,
        validate_args, validate_each,
    };
}
