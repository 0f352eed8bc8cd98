//! Cached shape metadata for wrapped functions.
//!
//! Wrapping a function needs its result shape: how many result slots it has
//! and which of them, if any, carries the error. The shape is a property of
//! the function's type, so it is computed once per distinct callable and kept
//! in a [`SignatureCache`] keyed by [`CallableId`].
//!
//! # Identity
//!
//! A [`CallableId`] wraps the `TypeId` of the callable. Every fn item and every
//! closure expression has its own type, so the key is fixed at compile time:
//!
//! - wrapping the same function twice yields the same id (cache hit)
//! - two different functions or closures never share an id
//! - a closure created in a loop has one id no matter how many times the loop runs
//!
//! Function pointers (`fn(i32) -> i32`) share an id per pointer type. Their
//! metadata depends only on that type, so sharing it is harmless.
//!
//! # Example
//!
//! ```
//! use hookwrap_core::signature::{CallableId, FunctionSignature, SignatureCache};
//!
//! fn parse(input: String) -> Result<u32, hookwrap_core::hooks::HookError> {
//!     Err(hookwrap_core::hooks::HookError::rejected(input))
//! }
//!
//! let cache = SignatureCache::new();
//! let id = CallableId::of_val(&parse);
//!
//! let signature = cache.get_or_insert(id, || FunctionSignature::new(2, Some(1), id.type_name()));
//! assert_eq!(signature.result_count(), 2);
//! assert_eq!(signature.error_result_index(), Some(1));
//! assert!(cache.contains(id));
//! ```

use core::any::TypeId;
use std::sync::{Arc, LazyLock};

use hashbrown::HashMap;
use parking_lot::{RwLock, RwLockUpgradableReadGuard};

/// Identity of a wrapped callable, derived from its type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallableId {
    type_id: TypeId,
    type_name: &'static str,
}

impl CallableId {
    /// Creates the id of callable type `F`.
    #[must_use]
    pub fn of<F: 'static>() -> Self {
        Self {
            type_id: TypeId::of::<F>(),
            type_name: core::any::type_name::<F>(),
        }
    }

    /// Creates the id of the given callable's type.
    #[must_use]
    pub fn of_val<F: 'static>(_callable: &F) -> Self {
        Self::of::<F>()
    }

    /// Returns the underlying `TypeId`.
    #[must_use]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Returns the callable's type name for debugging.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

/// Result shape of one wrapped function.
///
/// Immutable once created; shared through `Arc` between the cache and every
/// wrapper of the same function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSignature {
    result_count: usize,
    error_result_index: Option<usize>,
    type_name: &'static str,
}

impl FunctionSignature {
    /// Creates a signature with `result_count` slots and an optional error slot.
    #[must_use]
    pub fn new(
        result_count: usize,
        error_result_index: Option<usize>,
        type_name: &'static str,
    ) -> Self {
        Self {
            result_count,
            error_result_index,
            type_name,
        }
    }

    /// Number of result slots the function returns.
    #[must_use]
    pub fn result_count(&self) -> usize {
        self.result_count
    }

    /// Index of the error slot, or `None` if the function cannot fail.
    #[must_use]
    pub fn error_result_index(&self) -> Option<usize> {
        self.error_result_index
    }

    /// Returns `true` if the function reports errors through an error slot.
    #[must_use]
    pub fn has_error_slot(&self) -> bool {
        self.error_result_index.is_some()
    }

    /// Type name of the function this signature describes.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

static GLOBAL: LazyLock<SignatureCache> = LazyLock::new(SignatureCache::new);

/// Concurrent map from [`CallableId`] to [`FunctionSignature`].
///
/// Entries are inserted once and never replaced or removed. Lookups take a
/// shared lock; a miss takes the upgradable lock and checks again before
/// computing, so each signature is computed at most once per cache.
///
/// # Thread Safety
///
/// Uses a [`RwLock`] around the map so any number of threads can wrap and look
/// up functions concurrently.
#[derive(Default)]
pub struct SignatureCache {
    entries: RwLock<HashMap<CallableId, Arc<FunctionSignature>>>,
}

impl core::fmt::Debug for SignatureCache {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SignatureCache")
            .field("entries", &self.len())
            .finish()
    }
}

impl SignatureCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the process-wide cache used by [`wrap`](crate::wrap::wrap).
    ///
    /// Lives until the process exits.
    #[must_use]
    pub fn global() -> &'static SignatureCache {
        &GLOBAL
    }

    /// Returns the signature for `id`, computing and inserting it on a miss.
    ///
    /// `compute` runs under an upgradable lock: it may read this cache
    /// (`get`, `contains`, `len`) but must not call `get_or_insert` on it.
    /// Concurrent misses for any id wait for the running `compute`, so each
    /// signature is computed at most once.
    pub fn get_or_insert(
        &self,
        id: CallableId,
        compute: impl FnOnce() -> FunctionSignature,
    ) -> Arc<FunctionSignature> {
        if let Some(signature) = self.entries.read().get(&id) {
            tracing::trace!(callable = id.type_name(), "signature cache hit");
            return Arc::clone(signature);
        }

        let entries = self.entries.upgradable_read();
        if let Some(signature) = entries.get(&id) {
            return Arc::clone(signature);
        }

        let signature = Arc::new(compute());
        tracing::debug!(
            callable = id.type_name(),
            result_count = signature.result_count(),
            error_result_index = ?signature.error_result_index(),
            "signature cached"
        );

        let mut entries = RwLockUpgradableReadGuard::upgrade(entries);
        entries.insert(id, Arc::clone(&signature));
        signature
    }

    /// Returns the cached signature for `id`, if any.
    #[must_use]
    pub fn get(&self, id: CallableId) -> Option<Arc<FunctionSignature>> {
        self.entries.read().get(&id).cloned()
    }

    /// Returns `true` if a signature for `id` is cached.
    #[must_use]
    pub fn contains(&self, id: CallableId) -> bool {
        self.entries.read().contains_key(&id)
    }

    /// Number of cached signatures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns `true` if nothing has been cached yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
