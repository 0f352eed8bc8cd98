//! Type-erased views of call arguments and results.
//!
//! Hooks observe a call without knowing the wrapped function's types. Every
//! argument and result slot is handed to them as a `&dyn Value`, which can be
//! printed through [`Debug`] or downcast back to its concrete type.
//!
//! ```
//! use hookwrap_core::value::{Arguments, Value};
//!
//! let args = (5_i32, String::from("five"));
//! let values = args.values();
//!
//! assert_eq!(values.len(), 2);
//! assert_eq!(values[0].downcast_ref::<i32>(), Some(&5));
//! assert!(values[1].is::<String>());
//! ```

use core::fmt::Debug;

use downcast_rs::{Downcast, impl_downcast};
use variadics_please::all_tuples;

/// A single argument or result slot, viewed without its static type.
///
/// Implemented for every `Debug + 'static` type.
pub trait Value: Downcast + Debug {}

impl<T: Debug + 'static> Value for T {}

impl_downcast!(Value);

/// An argument list that can be materialized as a sequence of [`Value`]s.
///
/// Implemented for tuples of 0 to 8 [`Value`] types. The tuple is the packed
/// parameter list of a wrapped function: `fn(i32, String)` takes
/// `(i32, String)`.
pub trait Arguments: 'static {
    /// Number of arguments in the list.
    const LEN: usize;

    /// Borrows every argument as a `&dyn Value`, in parameter order.
    fn values(&self) -> Vec<&dyn Value>;
}

macro_rules! one {
    ($P:ident) => {
        1
    };
}

macro_rules! impl_arguments_tuple {
    ($(($P:ident, $p:ident)),*) => {
        impl<$($P: Value),*> Arguments for ($($P,)*) {
            const LEN: usize = 0 $(+ one!($P))*;

            fn values(&self) -> Vec<&dyn Value> {
                let ($($p,)*) = self;
                vec![$($p as &dyn Value),*]
            }
        }
    };
}

all_tuples!(impl_arguments_tuple, 0, 8, P, p);

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Point {
        x: i32,
        y: i32,
    }

    #[test]
    fn empty_argument_list() {
        let values = ().values();
        assert!(values.is_empty());
        assert_eq!(<() as Arguments>::LEN, 0);
    }

    #[test]
    fn values_keep_parameter_order() {
        let args = (1_u8, "two", 3.0_f64);
        let values = args.values();

        assert_eq!(<(u8, &str, f64) as Arguments>::LEN, 3);
        assert_eq!(values[0].downcast_ref::<u8>(), Some(&1));
        assert_eq!(values[1].downcast_ref::<&str>(), Some(&"two"));
        assert_eq!(values[2].downcast_ref::<f64>(), Some(&3.0));
    }

    #[test]
    fn downcast_to_wrong_type_is_none() {
        let args = (Point { x: 1, y: 2 },);
        let values = args.values();

        assert!(values[0].downcast_ref::<i32>().is_none());
        assert_eq!(
            values[0].downcast_ref::<Point>(),
            Some(&Point { x: 1, y: 2 })
        );
    }

    #[test]
    fn values_are_debug_printable() {
        let args = (7_i32, vec!["a"]);
        let rendered: Vec<String> = args.values().iter().map(|v| format!("{v:?}")).collect();
        assert_eq!(rendered, vec!["7".to_string(), "[\"a\"]".to_string()]);
    }

    #[test]
    fn eight_arguments() {
        let args = (1, 2, 3, 4, 5, 6, 7, 8);
        let sum: i32 = args
            .values()
            .iter()
            .filter_map(|v| v.downcast_ref::<i32>())
            .sum();
        assert_eq!(sum, 36);
    }
}
