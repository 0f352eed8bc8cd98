//! Signature-caching function wrapper.
//!
//! `hookwrap_core` decorates ordinary functions with hooks without touching
//! their call sites:
//!
//! - [`hooks`] - Hook set, hook options and the hook error type
//! - [`outcome`] - Result shapes (error slot or none) and result synthesis
//! - [`signature`] - Per-function shape metadata and the process-wide cache
//! - [`value`] - Type-erased views of arguments and results
//! - [`mod@wrap`] - The wrapper itself and the per-call hook sequence
//!
//! # Example
//!
//! ```
//! use hookwrap_core::prelude::*;
//!
//! #[derive(Debug, thiserror::Error)]
//! enum MathError {
//!     #[error("inputs must be non-negative")]
//!     Negative,
//!     #[error(transparent)]
//!     Hook(#[from] HookError),
//! }
//!
//! fn add(a: i32, b: i32) -> Result<i32, MathError> {
//!     if a < 0 || b < 0 {
//!         return Err(MathError::Negative);
//!     }
//!     Ok(a + b)
//! }
//!
//! let add = wrap(add, [with_pre_hook(|_args| Ok(()))]);
//!
//! assert_eq!(add(5, 6).unwrap(), 11);
//! assert_eq!(add(5, -6).unwrap_err().to_string(), "inputs must be non-negative");
//! ```

/// Hook configuration.
pub mod hooks;

/// Result shapes of wrappable functions.
pub mod outcome;

/// Function signature metadata and its cache.
pub mod signature;

/// Type-erased argument and result values.
pub mod value;

/// Function wrapping.
pub mod wrap;

pub use wrap::wrap;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use crate::hooks::*;
    pub use crate::outcome::*;
    pub use crate::signature::*;
    pub use crate::value::*;
    pub use crate::wrap::*;
}
