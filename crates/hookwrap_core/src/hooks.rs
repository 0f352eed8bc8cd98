//! Hook configuration for wrapped functions.
//!
//! A [`HookSet`] holds the three optional callbacks that run around every call
//! of a wrapped function:
//!
//! | Hook | Runs | Receives | Can fail |
//! |------|------|----------|----------|
//! | pre-hook | before the function | the arguments | yes, skips the call |
//! | post-hook | after a successful call | the results | yes, replaces the results |
//! | error observer | whenever a stage fails | the error | no |
//!
//! Hook sets are built either with the `with_*` builder methods or from an
//! iterator of [`WrapOption`]s, mirroring the option-list style accepted by
//! [`wrap`](crate::wrap::wrap):
//!
//! ```
//! use hookwrap_core::hooks::{HookError, HookSet, with_error_hook, with_pre_hook};
//!
//! let from_builder = HookSet::new()
//!     .with_pre_hook(|args| {
//!         if args.is_empty() {
//!             return Err(HookError::rejected("no arguments"));
//!         }
//!         Ok(())
//!     })
//!     .with_error_hook(|err| eprintln!("call failed: {err}"));
//!
//! let from_options: HookSet = [
//!     with_pre_hook(|_args| Ok(())),
//!     with_error_hook(|err| eprintln!("call failed: {err}")),
//! ]
//! .into_iter()
//! .collect();
//!
//! assert!(from_builder.has_pre_hook());
//! assert!(from_options.has_error_hook());
//! ```

use core::error::Error;
use core::fmt;

use crate::value::Value;

/// Boxed error type carried by [`HookError::Other`].
pub type BoxError = Box<dyn Error + Send + Sync + 'static>;

/// Hook invoked with the call's arguments before the wrapped function runs.
pub type PreHook = Box<dyn Fn(&[&dyn Value]) -> Result<(), HookError> + Send + Sync>;

/// Hook invoked with the call's results after the wrapped function succeeds.
pub type PostHook = Box<dyn Fn(&[&dyn Value]) -> Result<(), HookError> + Send + Sync>;

/// Observer notified of every error a wrapped call produces.
pub type ErrorHook = Box<dyn Fn(&(dyn Error + 'static)) + Send + Sync>;

// ─────────────────────────────────────────────────────────────────────────────
// HookError
// ─────────────────────────────────────────────────────────────────────────────

/// Error returned by a pre-hook or post-hook.
///
/// A hook error aborts the current call. Wrapped functions returning
/// `Result<T, E>` surface it as `Err(E::from(hook_error))`, so `E` must
/// implement `From<HookError>`:
///
/// ```
/// use hookwrap_core::hooks::HookError;
///
/// #[derive(Debug, thiserror::Error)]
/// enum MathError {
///     #[error("inputs must be non-negative")]
///     Negative,
///     #[error(transparent)]
///     Hook(#[from] HookError),
/// }
/// ```
#[derive(Debug, thiserror::Error)]
pub enum HookError {
    /// The hook refused the call.
    #[error("{0}")]
    Rejected(String),

    /// The hook failed with an underlying error.
    #[error(transparent)]
    Other(BoxError),
}

impl HookError {
    /// Creates a [`HookError::Rejected`] with the given message.
    #[must_use]
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected(message.into())
    }

    /// Wraps an arbitrary error in [`HookError::Other`].
    #[must_use]
    pub fn other(error: impl Into<BoxError>) -> Self {
        Self::Other(error.into())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// WrapOption
// ─────────────────────────────────────────────────────────────────────────────

/// A single hook setting, applied to a [`HookSet`] in order.
///
/// Built with [`with_pre_hook`], [`with_post_hook`] and [`with_error_hook`].
/// When the same kind of hook appears twice, the later one wins.
pub enum WrapOption {
    /// Sets the pre-invocation hook.
    PreHook(PreHook),
    /// Sets the post-invocation hook.
    PostHook(PostHook),
    /// Sets the error observer.
    ErrorHook(ErrorHook),
}

impl fmt::Debug for WrapOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WrapOption::PreHook(_) => f.write_str("PreHook(..)"),
            WrapOption::PostHook(_) => f.write_str("PostHook(..)"),
            WrapOption::ErrorHook(_) => f.write_str("ErrorHook(..)"),
        }
    }
}

/// Option setting the pre-invocation hook.
#[must_use]
pub fn with_pre_hook(
    hook: impl Fn(&[&dyn Value]) -> Result<(), HookError> + Send + Sync + 'static,
) -> WrapOption {
    WrapOption::PreHook(Box::new(hook))
}

/// Option setting the post-invocation hook.
#[must_use]
pub fn with_post_hook(
    hook: impl Fn(&[&dyn Value]) -> Result<(), HookError> + Send + Sync + 'static,
) -> WrapOption {
    WrapOption::PostHook(Box::new(hook))
}

/// Option setting the error observer.
#[must_use]
pub fn with_error_hook(hook: impl Fn(&(dyn Error + 'static)) + Send + Sync + 'static) -> WrapOption {
    WrapOption::ErrorHook(Box::new(hook))
}

// ─────────────────────────────────────────────────────────────────────────────
// HookSet
// ─────────────────────────────────────────────────────────────────────────────

/// The optional callbacks attached to one wrapped function.
///
/// A hook set is moved into the wrapper it configures; two wraps of the same
/// function never share hooks.
#[derive(Default)]
pub struct HookSet {
    pre: Option<PreHook>,
    post: Option<PostHook>,
    error: Option<ErrorHook>,
}

impl fmt::Debug for HookSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookSet")
            .field("pre", &self.pre.is_some())
            .field("post", &self.post.is_some())
            .field("error", &self.error.is_some())
            .finish()
    }
}

impl HookSet {
    /// Creates an empty hook set. A function wrapped with it behaves exactly
    /// like the original.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the pre-invocation hook.
    #[must_use]
    pub fn with_pre_hook(
        mut self,
        hook: impl Fn(&[&dyn Value]) -> Result<(), HookError> + Send + Sync + 'static,
    ) -> Self {
        self.pre = Some(Box::new(hook));
        self
    }

    /// Sets the post-invocation hook.
    #[must_use]
    pub fn with_post_hook(
        mut self,
        hook: impl Fn(&[&dyn Value]) -> Result<(), HookError> + Send + Sync + 'static,
    ) -> Self {
        self.post = Some(Box::new(hook));
        self
    }

    /// Sets the error observer.
    #[must_use]
    pub fn with_error_hook(
        mut self,
        hook: impl Fn(&(dyn Error + 'static)) + Send + Sync + 'static,
    ) -> Self {
        self.error = Some(Box::new(hook));
        self
    }

    /// Applies a single option, replacing any hook of the same kind.
    pub fn apply(&mut self, option: WrapOption) {
        match option {
            WrapOption::PreHook(hook) => self.pre = Some(hook),
            WrapOption::PostHook(hook) => self.post = Some(hook),
            WrapOption::ErrorHook(hook) => self.error = Some(hook),
        }
    }

    /// Combines two hook sets so that both run.
    ///
    /// Pre-hooks and post-hooks run `self` first, then `other`; the first
    /// error stops the chain. Both error observers are notified.
    #[must_use]
    pub fn merge(self, other: HookSet) -> Self {
        Self {
            pre: chain_checks(self.pre, other.pre),
            post: chain_checks(self.post, other.post),
            error: match (self.error, other.error) {
                (Some(first), Some(second)) => Some(Box::new(move |err: &(dyn Error + 'static)| {
                    first(err);
                    second(err);
                })),
                (first, second) => first.or(second),
            },
        }
    }

    /// Returns `true` if a pre-hook is configured.
    #[must_use]
    pub fn has_pre_hook(&self) -> bool {
        self.pre.is_some()
    }

    /// Returns `true` if a post-hook is configured.
    #[must_use]
    pub fn has_post_hook(&self) -> bool {
        self.post.is_some()
    }

    /// Returns `true` if an error observer is configured.
    #[must_use]
    pub fn has_error_hook(&self) -> bool {
        self.error.is_some()
    }

    /// Runs the pre-hook, if any.
    ///
    /// # Errors
    ///
    /// Returns the hook's error when it rejects the call.
    pub fn run_pre(&self, args: &[&dyn Value]) -> Result<(), HookError> {
        match &self.pre {
            Some(hook) => hook(args),
            None => Ok(()),
        }
    }

    /// Runs the post-hook, if any.
    ///
    /// # Errors
    ///
    /// Returns the hook's error when it rejects the results.
    pub fn run_post(&self, results: &[&dyn Value]) -> Result<(), HookError> {
        match &self.post {
            Some(hook) => hook(results),
            None => Ok(()),
        }
    }

    /// Forwards an error to the observer, if any.
    pub fn notify(&self, err: &(dyn Error + 'static)) {
        if let Some(hook) = &self.error {
            hook(err);
        }
    }
}

impl FromIterator<WrapOption> for HookSet {
    fn from_iter<I: IntoIterator<Item = WrapOption>>(options: I) -> Self {
        let mut hooks = HookSet::new();
        for option in options {
            hooks.apply(option);
        }
        hooks
    }
}

impl Extend<WrapOption> for HookSet {
    fn extend<I: IntoIterator<Item = WrapOption>>(&mut self, options: I) {
        for option in options {
            self.apply(option);
        }
    }
}

impl From<WrapOption> for HookSet {
    fn from(option: WrapOption) -> Self {
        let mut hooks = HookSet::new();
        hooks.apply(option);
        hooks
    }
}

/// Sequences two fallible hooks; the second only runs if the first passes.
fn chain_checks(first: Option<PreHook>, second: Option<PreHook>) -> Option<PreHook> {
    match (first, second) {
        (Some(first), Some(second)) => Some(Box::new(move |values: &[&dyn Value]| {
            first(values)?;
            second(values)
        })),
        (first, second) => first.or(second),
    }
}
