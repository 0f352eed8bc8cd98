//! Result shapes of wrapped functions.
//!
//! A wrapped function either reports failure through a trailing error slot
//! (`Result<T, E>`) or cannot fail at all (any `Default` value). [`Outcome`]
//! captures what the wrapper needs from each shape: how many result slots it
//! has, where the error slot is, how to detect a failure, and how to build a
//! replacement result when a hook fails.
//!
//! | Return type | `result_count` | `error_result_index` | Synthesized on hook failure |
//! |-------------|----------------|----------------------|-----------------------------|
//! | `()` | 0 | `None` | `()` |
//! | `T` | 1 | `None` | `T::default()` |
//! | `Result<(), E>` | 1 | `Some(0)` | `Err(E::from(hook_error))` |
//! | `Result<T, E>` | 2 | `Some(1)` | `Err(E::from(hook_error))` |
//!
//! A tuple payload counts as one slot.

use core::any::TypeId;
use core::error::Error;

use crate::hooks::HookError;
use crate::value::Value;

/// Marker for return types with an error slot (`Result<T, E>`).
pub struct Fallible;

/// Marker for return types without an error slot.
pub struct Infallible;

/// The result shape of a wrappable function.
///
/// The `Marker` parameter keeps the two blanket implementations apart, in the
/// same way `IntoWrapped` separates functions by arity.
pub trait Outcome<Marker>: Sized + 'static {
    /// Number of result slots.
    fn result_count() -> usize;

    /// Position of the error slot, if the shape has one.
    fn error_result_index() -> Option<usize>;

    /// Returns the error held in the error slot, if the call failed.
    fn failure(&self) -> Option<&(dyn Error + 'static)>;

    /// Materializes the result slots as a sequence of [`Value`]s and hands it
    /// to `f`.
    ///
    /// For a successful `Result<T, E>` the sequence is the payload followed by
    /// an empty (`None::<E>`) error slot.
    fn with_values<U>(&self, f: impl FnOnce(&[&dyn Value]) -> U) -> U;

    /// Builds the result returned in place of the real one when a hook fails.
    ///
    /// Every non-error slot holds its zero value; the error slot, if any,
    /// holds `error`.
    fn synthesize(error: HookError) -> Self;
}

/// Number of slots a plain value occupies: none for `()`, one otherwise.
fn payload_slots<T: 'static>() -> usize {
    usize::from(TypeId::of::<T>() != TypeId::of::<()>())
}

impl<T, E> Outcome<Fallible> for Result<T, E>
where
    T: Value,
    E: Error + From<HookError> + 'static,
{
    fn result_count() -> usize {
        payload_slots::<T>() + 1
    }

    fn error_result_index() -> Option<usize> {
        Some(payload_slots::<T>())
    }

    fn failure(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Ok(_) => None,
            Err(err) => Some(err),
        }
    }

    fn with_values<U>(&self, f: impl FnOnce(&[&dyn Value]) -> U) -> U {
        let no_error: Option<E> = None;
        match self {
            Ok(_) if payload_slots::<T>() == 0 => f(&[&no_error as &dyn Value]),
            Ok(value) => f(&[value as &dyn Value, &no_error]),
            Err(err) => f(&[err as &dyn Value]),
        }
    }

    fn synthesize(error: HookError) -> Self {
        Err(E::from(error))
    }
}

impl<R> Outcome<Infallible> for R
where
    R: Value + Default,
{
    fn result_count() -> usize {
        payload_slots::<R>()
    }

    fn error_result_index() -> Option<usize> {
        None
    }

    fn failure(&self) -> Option<&(dyn Error + 'static)> {
        None
    }

    fn with_values<U>(&self, f: impl FnOnce(&[&dyn Value]) -> U) -> U {
        if payload_slots::<R>() == 0 {
            f(&[])
        } else {
            f(&[self as &dyn Value])
        }
    }

    fn synthesize(_error: HookError) -> Self {
        R::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    enum ParseError {
        #[error("not a number")]
        NotANumber,
        #[error(transparent)]
        Hook(#[from] HookError),
    }

    fn count_of<R: Outcome<M>, M>() -> (usize, Option<usize>) {
        (R::result_count(), R::error_result_index())
    }

    #[test]
    fn shapes_report_slots() {
        assert_eq!(count_of::<(), _>(), (0, None));
        assert_eq!(count_of::<i32, _>(), (1, None));
        assert_eq!(count_of::<(i32, String), _>(), (1, None));
        assert_eq!(count_of::<Result<(), ParseError>, _>(), (1, Some(0)));
        assert_eq!(count_of::<Result<u64, ParseError>, _>(), (2, Some(1)));
    }

    #[test]
    fn failure_only_for_err() {
        let ok: Result<u8, ParseError> = Ok(1);
        let err: Result<u8, ParseError> = Err(ParseError::NotANumber);

        assert!(ok.failure().is_none());
        assert_eq!(err.failure().unwrap().to_string(), "not a number");
        assert!(42_i32.failure().is_none());
    }

    #[test]
    fn fallible_values_include_empty_error_slot() {
        let ok: Result<u8, ParseError> = Ok(9);
        let rendered = ok.with_values(|values| {
            values.iter().map(|v| format!("{v:?}")).collect::<Vec<_>>()
        });
        assert_eq!(rendered, vec!["9".to_string(), "None".to_string()]);

        let unit: Result<(), ParseError> = Ok(());
        assert_eq!(unit.with_values(|values| values.len()), 1);
    }

    #[test]
    fn infallible_values() {
        assert_eq!(().with_values(|values| values.len()), 0);
        let payload = 5_i64.with_values(|values| values[0].downcast_ref::<i64>().copied());
        assert_eq!(payload, Some(5));
    }

    #[test]
    fn synthesize_fills_error_slot() {
        let synthesized =
            <Result<u8, ParseError> as Outcome<Fallible>>::synthesize(HookError::rejected("nope"));
        match synthesized {
            Err(ParseError::Hook(HookError::Rejected(msg))) => assert_eq!(msg, "nope"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn synthesize_zero_fills_without_error_slot() {
        let synthesized = <String as Outcome<Infallible>>::synthesize(HookError::rejected("x"));
        assert!(synthesized.is_empty());
    }
}
