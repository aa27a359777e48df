//! The per-(value type, condition type) claim registry.
//!
//! A `ClaimRegistry<T, C>` holds the set of condition keys currently claimed
//! for guards of value type `T`, protected by a single timed lock. It is pure
//! bookkeeping: keys are added when a guard successfully claims them and
//! removed when the guard is dropped. The registry never constructs or stores
//! the guarded values themselves.
//!
//! Registries are explicit objects shared via `Arc`, so tests get a fresh
//! registry per test and applications decide the sharing scope themselves.
//! For the process-wide-static style, see [`define_claim_registry!`].
//!
//! [`define_claim_registry!`]: crate::define_claim_registry
//!
//! # Examples
//!
//! ```
//! use claim_guard::{ClaimRegistry, Claimed};
//! use std::sync::Arc;
//!
//! let registry = Arc::new(ClaimRegistry::<u32, String>::new());
//!
//! let first = Claimed::new(&registry, "slot-a".to_string(), 1u32).unwrap();
//! // "slot-a" is taken while `first` is alive.
//! assert!(Claimed::new(&registry, "slot-a".to_string(), 2u32).is_err());
//!
//! drop(first);
//! assert!(Claimed::new(&registry, "slot-a".to_string(), 2u32).is_ok());
//! ```

use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, MutexGuard};

use crate::{ClaimError, ClaimEvent, TraceCallback};

/// Default deadline for claim attempts that do not specify one.
///
/// Deliberately generous (5000 minutes): the lock is only ever held for a
/// handful of vector operations, so waiting this long effectively means
/// "block until the registry is reachable".
pub const DEFAULT_CLAIM_TIMEOUT: Duration = Duration::from_secs(5000 * 60);

/// Set of currently claimed condition keys for one (value type, condition
/// type) pairing.
///
/// `T` is the guarded value type; it only serves to separate registries at
/// the type level (a `ClaimRegistry<File, String>` cannot be used by guards
/// of another value type, even with equal-looking keys). `C` is the condition
/// key type; multi-component keys are ordinary tuples, compared
/// component-wise.
///
/// Raw-pointer condition components are not supported in intended use:
/// equality would compare addresses, not values. Use owned keys such as
/// `String` or `PathBuf`.
pub struct ClaimRegistry<T, C> {
    claims: Mutex<Vec<C>>,
    trace: Mutex<Option<Arc<TraceCallback>>>,
    _value: PhantomData<fn() -> T>,
}

impl<T, C> ClaimRegistry<T, C> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        ClaimRegistry {
            claims: Mutex::new(Vec::new()),
            trace: Mutex::new(None),
            _value: PhantomData,
        }
    }

    // -------------------------------------------------------------------------------------------------
    // Tracing
    // -------------------------------------------------------------------------------------------------

    /// Sets a tracing callback invoked on every claim, release and contains
    /// check against this registry.
    ///
    /// The callback must not call back into the same registry; it is invoked
    /// while the trace slot is locked (the claims lock is never held during
    /// callback execution).
    pub fn set_trace_callback(&self, callback: impl Fn(&ClaimEvent) + Send + Sync + 'static) {
        *self.trace.lock() = Some(Arc::new(callback));
    }

    /// Clears the tracing callback (disables tracing for this registry).
    pub fn clear_trace_callback(&self) {
        *self.trace.lock() = None;
    }

    /// Emits an event to the current callback, if any.
    fn emit(&self, event: &ClaimEvent) {
        let guard = self.trace.lock();
        if let Some(callback) = guard.as_ref() {
            callback(event);
        }
    }

    fn type_name() -> &'static str {
        std::any::type_name::<T>()
    }
}

impl<T, C: PartialEq> ClaimRegistry<T, C> {
    // -------------------------------------------------------------------------------------------------
    // Bookkeeping
    // -------------------------------------------------------------------------------------------------

    /// Checks whether `key` is currently claimed.
    ///
    /// This takes the lock only for the duration of the scan. It gives no
    /// atomicity with any subsequent mutation; callers that need
    /// check-then-add as one unit must hold the lock themselves via
    /// [`lock`](Self::lock).
    pub fn contains(&self, key: &C) -> bool {
        let found = self.claims.lock().iter().any(|claimed| claimed == key);
        self.emit(&ClaimEvent::Contains {
            type_name: Self::type_name(),
            found,
        });
        found
    }

    /// Number of currently claimed keys.
    pub fn claim_count(&self) -> usize {
        self.claims.lock().len()
    }

    /// True when no keys are claimed.
    pub fn is_empty(&self) -> bool {
        self.claims.lock().is_empty()
    }

    /// Acquires the registry lock, blocking without a deadline.
    ///
    /// While the returned guard is alive, all claim attempts against this
    /// registry block (and eventually fail with
    /// [`ClaimError::LockTimeout`]). Use this to perform check-then-add as
    /// one atomic sequence, or to simulate lock contention in tests.
    pub fn lock(&self) -> ClaimsGuard<'_, C> {
        ClaimsGuard {
            claims: self.claims.lock(),
        }
    }

    /// Attempts to acquire the registry lock within `timeout`.
    pub fn try_lock_for(&self, timeout: Duration) -> Option<ClaimsGuard<'_, C>> {
        self.claims
            .try_lock_for(timeout)
            .map(|claims| ClaimsGuard { claims })
    }

    // -------------------------------------------------------------------------------------------------
    // Claim protocol
    // -------------------------------------------------------------------------------------------------

    /// Attempts to register `key` as claimed, waiting at most `timeout` for
    /// the registry lock.
    ///
    /// The protocol is: a duplicate check under a timed acquisition, then a
    /// second timed acquisition for an unconditional add. The check runs on
    /// every attempt, but the lock is released between the two steps. On
    /// failure nothing is added and the attempt can be retried.
    ///
    /// # Weak uniqueness guarantee
    ///
    /// The duplicate check is deliberately not atomic with the add: the lock
    /// is released between the two steps. Two threads racing to claim the
    /// same key can both pass the check and both register the key. Callers
    /// that need strict atomicity must serialize their claim attempts or
    /// hold [`lock`](Self::lock) across a manual check-then-add.
    ///
    /// # Errors
    ///
    /// - [`ClaimError::DuplicateCondition`] if `key` was observed as already
    ///   claimed
    /// - [`ClaimError::LockTimeout`] if either lock acquisition did not
    ///   complete within `timeout`
    pub fn claim(&self, key: C, timeout: Duration) -> Result<(), ClaimError> {
        // Duplicate check on every attempt. The lock is dropped before the
        // add below, so the check/add window stays open.
        {
            let Some(claims) = self.claims.try_lock_for(timeout) else {
                self.emit(&ClaimEvent::Claim {
                    type_name: Self::type_name(),
                    granted: false,
                });
                return Err(ClaimError::LockTimeout(timeout));
            };
            let duplicate = claims.iter().any(|claimed| claimed == &key);
            drop(claims);
            if duplicate {
                self.emit(&ClaimEvent::Claim {
                    type_name: Self::type_name(),
                    granted: false,
                });
                return Err(ClaimError::DuplicateCondition);
            }
        }

        let Some(mut claims) = self.claims.try_lock_for(timeout) else {
            self.emit(&ClaimEvent::Claim {
                type_name: Self::type_name(),
                granted: false,
            });
            return Err(ClaimError::LockTimeout(timeout));
        };
        claims.push(key);
        drop(claims);

        self.emit(&ClaimEvent::Claim {
            type_name: Self::type_name(),
            granted: true,
        });
        Ok(())
    }

    /// Removes `key` from the claimed set.
    ///
    /// Blocks without a deadline: release happens on guard destruction and
    /// must always complete rather than risk a leaked registry entry.
    /// Removes every entry equal to `key` (defensive; normally exactly one).
    pub fn release(&self, key: &C) {
        let mut claims = self.claims.lock();
        claims.retain(|claimed| claimed != key);
        drop(claims);

        self.emit(&ClaimEvent::Release {
            type_name: Self::type_name(),
        });
    }
}

impl<T, C> Default for ClaimRegistry<T, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C> std::fmt::Debug for ClaimRegistry<T, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClaimRegistry")
            .field("value_type", &Self::type_name())
            .field("claims", &self.claims.lock().len())
            .finish()
    }
}

/// Exclusive hold on a registry's lock.
///
/// Exposes the raw bookkeeping operations so a caller can perform
/// check-then-add as one atomic sequence. The guard-facing
/// [`claim`](ClaimRegistry::claim)/[`release`](ClaimRegistry::release)
/// protocol does not use a long-lived hold; this type exists for callers
/// that want stronger atomicity than the protocol provides.
pub struct ClaimsGuard<'a, C> {
    claims: MutexGuard<'a, Vec<C>>,
}

impl<C: PartialEq> ClaimsGuard<'_, C> {
    /// True iff `key` is present.
    pub fn contains(&self, key: &C) -> bool {
        self.claims.iter().any(|claimed| claimed == key)
    }

    /// Appends `key` unconditionally (no duplicate check).
    pub fn add(&mut self, key: C) {
        self.claims.push(key);
    }

    /// Removes every entry equal to `key`.
    pub fn remove(&mut self, key: &C) {
        self.claims.retain(|claimed| claimed != key);
    }

    /// Number of claimed keys.
    pub fn len(&self) -> usize {
        self.claims.len()
    }

    /// True when no keys are claimed.
    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }
}

// -------------------------------------------------------------------------------------------------
// Tests
// -------------------------------------------------------------------------------------------------
