//! Function wrapping and the per-call hook sequence.
//!
//! [`wrap`] takes any function of 0 to 8 parameters and returns a callable
//! with the same parameter and result types. Every call of the returned
//! callable runs:
//!
//! ```text
//! PreHook ──► Invoke ──► ErrorCheck ──► PostHook ──► Return
//!    │                       │              │           ▲
//!    └───────────────────────┴──────────────┴───────────┘
//!                 (error: notify observer, synthesize result)
//! ```
//!
//! # Example
//!
//! ```
//! use hookwrap_core::hooks::{HookError, with_error_hook, with_pre_hook};
//! use hookwrap_core::wrap::wrap;
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
//! let checked_add = wrap(
//!     add,
//!     [
//!         with_pre_hook(|args| {
//!             if args.iter().any(|arg| arg.downcast_ref::<i32>() == Some(&0)) {
//!                 return Err(HookError::rejected("zero is not allowed"));
//!             }
//!             Ok(())
//!         }),
//!         with_error_hook(|err| eprintln!("add failed: {err}")),
//!     ],
//! );
//!
//! assert_eq!(checked_add(5, 6).unwrap(), 11);
//! assert!(matches!(checked_add(5, -6), Err(MathError::Negative)));
//! assert!(matches!(checked_add(0, 6), Err(MathError::Hook(_))));
//! ```

use core::marker::PhantomData;
use std::sync::Arc;

use variadics_please::all_tuples;

use crate::hooks::{HookError, HookSet, WrapOption};
use crate::outcome::Outcome;
use crate::signature::{CallableId, FunctionSignature, SignatureCache};
use crate::value::{Arguments, Value};

/// A function that can be wrapped with hooks.
///
/// Implemented for every `Fn` of 0 to 8 [`Value`] parameters whose return
/// type is an [`Outcome`]. Most users never name this trait; [`wrap`] and
/// [`Wrapped::new`] accept any such function directly.
///
/// # Marker Types
///
/// The `Marker` type parameter allows one implementation per arity and result
/// shape. It is always inferred.
pub trait IntoWrapped<Marker>: Send + Sync + Sized + 'static {
    /// The parameter list, packed as a tuple.
    type Args: Arguments;

    /// Marker selecting the [`Outcome`] implementation of the return type.
    type OutcomeMarker;

    /// The return type.
    type Output: Outcome<Self::OutcomeMarker>;

    /// The type-erased callable with the same signature as `Self`.
    type Callable: ?Sized + Send + Sync;

    /// Calls the function with a packed argument list.
    fn invoke(&self, args: Self::Args) -> Self::Output;

    /// Turns a wrapper back into a plain callable of the original signature.
    fn erase(wrapped: Wrapped<Self, Marker>) -> Box<Self::Callable>;
}

// ─────────────────────────────────────────────────────────────────────────────
// IntoWrapped implementations for functions with 0-8 parameters
// ─────────────────────────────────────────────────────────────────────────────

macro_rules! impl_into_wrapped {
    ($(($P:ident, $p:ident)),*) => {
        impl<Func, R, M, $($P),*> IntoWrapped<(M, fn($($P),*) -> R)> for Func
        where
            Func: Fn($($P),*) -> R + Send + Sync + 'static,
            R: Outcome<M>,
            M: 'static,
            $($P: Value),*
        {
            type Args = ($($P,)*);
            type OutcomeMarker = M;
            type Output = R;
            type Callable = dyn Fn($($P),*) -> R + Send + Sync;

            fn invoke(&self, args: Self::Args) -> R {
                let ($($p,)*) = args;
                (self)($($p),*)
            }

            fn erase(
                wrapped: Wrapped<Self, (M, fn($($P),*) -> R)>,
            ) -> Box<dyn Fn($($P),*) -> R + Send + Sync> {
                Box::new(move |$($p: $P),*| wrapped.call(($($p,)*)))
            }
        }
    };
}

all_tuples!(impl_into_wrapped, 0, 8, P, p);

// ─────────────────────────────────────────────────────────────────────────────
// Wrapped
// ─────────────────────────────────────────────────────────────────────────────

/// A function together with its hooks and cached signature.
///
/// Call it with a packed argument tuple through [`call`](Self::call), or turn
/// it into a plain callable with [`into_fn`](Self::into_fn).
///
/// ```
/// use hookwrap_core::hooks::HookSet;
/// use hookwrap_core::wrap::Wrapped;
///
/// fn greet(name: String) -> String {
///     format!("hello {name}")
/// }
///
/// let wrapped = Wrapped::new(greet, HookSet::new());
/// assert_eq!(wrapped.call(("ada".to_string(),)), "hello ada");
/// assert_eq!(wrapped.signature().result_count(), 1);
/// assert_eq!(wrapped.signature().error_result_index(), None);
/// ```
pub struct Wrapped<F, Marker> {
    func: F,
    hooks: HookSet,
    id: CallableId,
    signature: Arc<FunctionSignature>,
    _marker: PhantomData<fn() -> Marker>,
}

impl<F, Marker> core::fmt::Debug for Wrapped<F, Marker> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Wrapped")
            .field("callable", &self.id.type_name())
            .field("signature", &self.signature)
            .field("hooks", &self.hooks)
            .finish()
    }
}

impl<F, Marker> Wrapped<F, Marker>
where
    F: IntoWrapped<Marker>,
{
    /// Wraps `func`, resolving its signature through the process-wide cache.
    #[must_use]
    pub fn new(func: F, hooks: HookSet) -> Self {
        Self::with_cache(func, hooks, SignatureCache::global())
    }

    /// Wraps `func`, resolving its signature through `cache`.
    #[must_use]
    pub fn with_cache(func: F, hooks: HookSet, cache: &SignatureCache) -> Self {
        let id = CallableId::of::<F>();
        let signature = cache.get_or_insert(id, || {
            FunctionSignature::new(
                <F::Output as Outcome<F::OutcomeMarker>>::result_count(),
                <F::Output as Outcome<F::OutcomeMarker>>::error_result_index(),
                id.type_name(),
            )
        });

        Self {
            func,
            hooks,
            id,
            signature,
            _marker: PhantomData,
        }
    }

    /// Identity of the wrapped function.
    #[must_use]
    pub fn id(&self) -> CallableId {
        self.id
    }

    /// Cached result shape of the wrapped function.
    #[must_use]
    pub fn signature(&self) -> &FunctionSignature {
        &self.signature
    }

    /// Hooks attached to this wrapper.
    #[must_use]
    pub fn hooks(&self) -> &HookSet {
        &self.hooks
    }

    /// Calls the wrapped function with a packed argument list, running the
    /// configured hooks around it.
    ///
    /// On success the function's own result is returned. If the pre-hook,
    /// the function itself, or the post-hook fails, the error observer is
    /// notified once and a synthesized result carrying the error is returned
    /// instead. When the pre-hook fails the function is not called at all.
    pub fn call(&self, args: F::Args) -> F::Output {
        if self.hooks.has_pre_hook() {
            tracing::trace!(callable = self.id.type_name(), "running pre-hook");
            let checked = self.hooks.run_pre(&args.values());
            if let Err(err) = checked {
                return self.fail("pre-hook", err);
            }
        }

        tracing::trace!(callable = self.id.type_name(), "invoking wrapped function");
        let output = self.func.invoke(args);

        if self.signature.has_error_slot()
            && let Some(err) = output.failure()
        {
            tracing::debug!(callable = self.id.type_name(), error = %err, "wrapped call failed");
            self.hooks.notify(err);
            return output;
        }

        if self.hooks.has_post_hook() {
            tracing::trace!(callable = self.id.type_name(), "running post-hook");
            let checked = output.with_values(|results| self.hooks.run_post(results));
            if let Err(err) = checked {
                return self.fail("post-hook", err);
            }
        }

        tracing::trace!(callable = self.id.type_name(), "wrapped call succeeded");
        output
    }

    /// Converts this wrapper into a callable with the original signature.
    #[must_use]
    pub fn into_fn(self) -> Box<F::Callable> {
        F::erase(self)
    }

    fn fail(&self, stage: &'static str, err: HookError) -> F::Output {
        tracing::debug!(callable = self.id.type_name(), stage, error = %err, "hook rejected call");
        self.hooks.notify(&err);
        <F::Output as Outcome<F::OutcomeMarker>>::synthesize(err)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Entry points
// ─────────────────────────────────────────────────────────────────────────────

/// Wraps `func` with the given hooks and returns a callable of the same
/// signature.
///
/// `hooks` accepts anything convertible into a [`HookSet`]: a prebuilt set,
/// an array or `Vec` of [`WrapOption`]s, or a single
/// option. The signature is looked up in (or added to) the process-wide
/// [`SignatureCache`].
///
/// ```
/// use hookwrap_core::hooks::HookSet;
/// use hookwrap_core::wrap::wrap;
///
/// fn square(x: u32) -> u32 {
///     x * x
/// }
///
/// let wrapped_square = wrap(square, HookSet::new());
/// assert_eq!(wrapped_square(7), square(7));
///
/// // The result is itself a function, usable wherever `square` was.
/// let squares: Vec<u32> = (1..=3).map(&wrapped_square).collect();
/// assert_eq!(squares, [1, 4, 9]);
/// ```
///
/// The returned `Box` implements the same `Fn` signature as `func`, so it can
/// be passed to generic code, stored, or wrapped again. Use `Arc::from` to
/// share it between threads.
///
/// # Wrappable functions
///
/// A hook failure must be expressible as a return value, which limits the
/// return types `wrap` accepts, even with an empty hook set:
///
/// - `Result<T, E>` requires `E: From<HookError>`, so `io::Result<T>` cannot be
///   wrapped directly; map it into an error type with a `HookError` variant.
/// - Any other return type must implement [`Default`].
pub fn wrap<F, Marker>(func: F, hooks: impl IntoHookSet) -> Box<F::Callable>
where
    F: IntoWrapped<Marker>,
{
    Wrapped::new(func, hooks.into_hook_set()).into_fn()
}

/// Like [`wrap`], but resolves the signature through `cache` instead of the
/// process-wide cache.
pub fn wrap_with_cache<F, Marker>(
    func: F,
    hooks: impl IntoHookSet,
    cache: &SignatureCache,
) -> Box<F::Callable>
where
    F: IntoWrapped<Marker>,
{
    Wrapped::with_cache(func, hooks.into_hook_set(), cache).into_fn()
}

/// Conversion into a [`HookSet`], accepted by [`wrap`].
pub trait IntoHookSet {
    /// Builds the hook set.
    fn into_hook_set(self) -> HookSet;
}

impl IntoHookSet for HookSet {
    fn into_hook_set(self) -> HookSet {
        self
    }
}

impl IntoHookSet for WrapOption {
    fn into_hook_set(self) -> HookSet {
        HookSet::from(self)
    }
}

impl<I> IntoHookSet for I
where
    I: IntoIterator<Item = WrapOption>,
{
    fn into_hook_set(self) -> HookSet {
        self.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::{with_error_hook, with_post_hook, with_pre_hook};
    use core::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, thiserror::Error)]
    enum MathError {
        #[error("inputs must be non-negative")]
        Negative,
        #[error(transparent)]
        Hook(#[from] HookError),
    }

    fn add(a: i32, b: i32) -> Result<i32, MathError> {
        if a < 0 || b < 0 {
            return Err(MathError::Negative);
        }
        Ok(a + b)
    }

    fn answer() -> u64 {
        42
    }

    #[test]
    fn zero_param_function() {
        let wrapped = wrap(answer, HookSet::new());
        assert_eq!(wrapped(), 42);
    }

    #[test]
    fn signature_of_fallible_function() {
        let cache = SignatureCache::new();
        let wrapped = Wrapped::with_cache(add, HookSet::new(), &cache);

        assert_eq!(wrapped.signature().result_count(), 2);
        assert_eq!(wrapped.signature().error_result_index(), Some(1));
        assert!(wrapped.signature().type_name().contains("add"));
        assert_eq!(wrapped.id(), CallableId::of_val(&add));
        assert!(cache.contains(wrapped.id()));
    }

    #[test]
    fn signature_of_unit_function() {
        let cache = SignatureCache::new();
        let wrapped = Wrapped::with_cache(|_: u8| {}, HookSet::new(), &cache);

        assert_eq!(wrapped.signature().result_count(), 0);
        assert_eq!(wrapped.signature().error_result_index(), None);
    }

    #[test]
    fn call_with_packed_arguments() {
        let wrapped = Wrapped::new(add, HookSet::new());
        assert_eq!(wrapped.call((2, 3)).unwrap(), 5);
    }

    #[test]
    fn pre_hook_sees_arguments() {
        let seen = std::sync::Arc::new(parking_lot::Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);

        let wrapped = wrap(
            add,
            [with_pre_hook(move |args| {
                sink.lock().extend(args.iter().filter_map(|a| a.downcast_ref::<i32>().copied()));
                Ok(())
            })],
        );

        assert_eq!(wrapped(4, 9).unwrap(), 13);
        assert_eq!(*seen.lock(), vec![4, 9]);
    }

    #[test]
    fn post_hook_sees_results_and_empty_error_slot() {
        let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);

        let wrapped = wrap(
            add,
            [with_post_hook(move |results| {
                sink.lock().extend(results.iter().map(|r| format!("{r:?}")));
                Ok(())
            })],
        );

        assert_eq!(wrapped(1, 1).unwrap(), 2);
        assert_eq!(*seen.lock(), vec!["2".to_string(), "None".to_string()]);
    }

    #[test]
    fn failing_call_skips_post_hook() {
        let post_calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&post_calls);

        let wrapped = wrap(
            add,
            [with_post_hook(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })],
        );

        assert!(matches!(wrapped(-1, 1), Err(MathError::Negative)));
        assert_eq!(post_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn infallible_function_zero_filled_on_hook_failure() {
        let errors = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&errors);

        let wrapped = wrap(
            |name: String| format!("hi {name}"),
            [
                with_pre_hook(|_| Err(HookError::rejected("blocked"))),
                with_error_hook(move |_| {
                    counter.fetch_add(1, Ordering::SeqCst);
                }),
            ],
        );

        assert_eq!(wrapped("bob".to_string()), String::new());
        assert_eq!(errors.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn into_fn_matches_wrap() {
        let wrapped = Wrapped::new(add, HookSet::new()).into_fn();
        assert_eq!(wrapped(20, 22).unwrap(), 42);
    }

    #[test]
    fn debug_names_callable() {
        let wrapped = Wrapped::new(answer, HookSet::new());
        let rendered = format!("{wrapped:?}");
        assert!(rendered.contains("answer"));
        assert!(rendered.contains("result_count: 1"));
    }

    #[test]
    fn eight_parameters() {
        let sum8 = |a: u8, b: u8, c: u8, d: u8, e: u8, f: u8, g: u8, h: u8| -> u32 {
            [a, b, c, d, e, f, g, h].iter().map(|&x| u32::from(x)).sum()
        };
        let wrapped = wrap(sum8, HookSet::new());
        assert_eq!(wrapped(1, 2, 3, 4, 5, 6, 7, 8), 36);
    }

    fn sum_with<F>(f: F, pairs: &[(i32, i32)]) -> i32
    where
        F: Fn(i32, i32) -> Result<i32, MathError>,
    {
        pairs.iter().filter_map(|&(a, b)| f(a, b).ok()).sum()
    }

    #[test]
    fn wrapped_is_accepted_where_original_is() {
        let pairs = [(1, 2), (3, -4), (5, 6)];
        let wrapped = wrap(add, HookSet::new());

        assert_eq!(sum_with(add, &pairs), 14);
        assert_eq!(sum_with(&wrapped, &pairs), 14);
        assert_eq!(sum_with(wrapped, &pairs), 14);
    }

    #[test]
    fn wrapping_a_wrapped_function() {
        let order = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let inner_order = Arc::clone(&order);
        let outer_order = Arc::clone(&order);

        let inner = wrap(
            add,
            [with_pre_hook(move |_| {
                inner_order.lock().push("inner");
                Ok(())
            })],
        );
        let outer = wrap(
            inner,
            [with_pre_hook(move |args| {
                outer_order.lock().push("outer");
                match args[0].downcast_ref::<i32>() {
                    Some(0) => Err(HookError::rejected("outer rejected")),
                    _ => Ok(()),
                }
            })],
        );

        assert_eq!(outer(2, 3).unwrap(), 5);
        assert_eq!(*order.lock(), vec!["outer", "inner"]);

        match outer(0, 3) {
            Err(MathError::Hook(err)) => assert_eq!(err.to_string(), "outer rejected"),
            other => panic!("expected outer hook error, got {other:?}"),
        }
        assert_eq!(order.lock().len(), 3);
    }

    #[test]
    fn shared_through_arc() {
        let wrapped: Arc<dyn Fn(i32, i32) -> Result<i32, MathError> + Send + Sync> =
            Arc::from(wrap(add, HookSet::new()));
        let clone = Arc::clone(&wrapped);

        let handle = std::thread::spawn(move || clone(1, 2).unwrap());
        assert_eq!(handle.join().unwrap(), 3);
        assert_eq!(wrapped(2, 2).unwrap(), 4);
    }
}
