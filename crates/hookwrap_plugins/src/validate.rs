//! Argument validation hooks.
//!
//! Builds pre-hooks from plain predicates, so a wrapped function can refuse
//! bad input before it runs.
//!
//! ```
//! use hookwrap_core::hooks::HookError;
//! use hookwrap_core::wrap;
//! use hookwrap_plugins::validate_each;
//!
//! #[derive(Debug, thiserror::Error)]
//! enum MathError {
//!     #[error("division by zero")]
//!     DivideByZero,
//!     #[error(transparent)]
//!     Hook(#[from] HookError),
//! }
//!
//! fn div(a: i64, b: i64) -> Result<i64, MathError> {
//!     if b == 0 {
//!         return Err(MathError::DivideByZero);
//!     }
//!     Ok(a / b)
//! }
//!
//! let div = wrap(div, [validate_each::<i64>("inputs must be non-negative", |x| *x >= 0)]);
//!
//! assert_eq!(div(6, 3).unwrap(), 2);
//! assert_eq!(div(-6, 3).unwrap_err().to_string(), "inputs must be non-negative");
//! ```

use hookwrap_core::hooks::{HookError, WrapOption, with_pre_hook};
use hookwrap_core::value::Value;

/// Pre-hook option rejecting the call with `message` unless `predicate`
/// accepts the full argument list.
#[must_use]
pub fn validate_args(
    message: impl Into<String>,
    predicate: impl Fn(&[&dyn Value]) -> bool + Send + Sync + 'static,
) -> WrapOption {
    let message = message.into();
    with_pre_hook(move |args| {
        if predicate(args) {
            Ok(())
        } else {
            tracing::debug!(reason = %message, "arguments rejected");
            Err(HookError::rejected(message.clone()))
        }
    })
}

/// Pre-hook option rejecting the call with `message` if any argument of type
/// `T` fails `predicate`. Arguments of other types are not checked.
#[must_use]
pub fn validate_each<T: Value>(
    message: impl Into<String>,
    predicate: impl Fn(&T) -> bool + Send + Sync + 'static,
) -> WrapOption {
    validate_args(message, move |args| {
        args.iter()
            .filter_map(|arg| arg.downcast_ref::<T>())
            .all(&predicate)
    })
}
