//! Wrap functions with pre-call, post-call and error hooks without touching
//! their call sites.
//!
//! ```
//! use hookwrap::prelude::*;
//!
//! fn area(width: u32, height: u32) -> u32 {
//!     width * height
//! }
//!
//! let area = wrap(area, TracingHooks::new("area").build());
//! assert_eq!(area(3, 4), 12);
//! ```

pub use hookwrap_internal::*;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use hookwrap_internal::prelude::*;
}
