//! The owning guard: claims a condition and owns the guarded value.

use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use std::time::Duration;

use crate::{ClaimError, ClaimRegistry, Construct, DEFAULT_CLAIM_TIMEOUT};

/// An exclusively owned value whose condition key is claimed for the guard's
/// lifetime.
///
/// Constructing a `Claimed` registers its condition key in the shared
/// [`ClaimRegistry`]; dropping it removes the key and drops the owned value.
/// While the guard is alive, any other guard construction with an equal
/// condition against the same registry fails with
/// [`ClaimError::DuplicateCondition`].
///
/// The value lives behind its own allocation. For direct in-guard storage
/// without the allocation, see [`ClaimedInline`](crate::ClaimedInline); for
/// borrowing a caller-owned value instead of owning one, see
/// [`ClaimedRef`](crate::ClaimedRef).
///
/// # Examples
///
/// ```
/// use claim_guard::{ClaimRegistry, Claimed};
/// use std::sync::Arc;
///
/// struct Handle {
///     path: String,
/// }
///
/// let registry = Arc::new(ClaimRegistry::<Handle, String>::new());
///
/// let guard = Claimed::new(
///     &registry,
///     "/tmp/data.log".to_string(),
///     Handle { path: "/tmp/data.log".to_string() },
/// )
/// .unwrap();
///
/// // A second open of the same path is rejected while `guard` lives.
/// let second = Claimed::new(
///     &registry,
///     "/tmp/data.log".to_string(),
///     Handle { path: "/tmp/data.log".to_string() },
/// );
/// assert!(second.is_err());
///
/// assert_eq!(guard.get().path, "/tmp/data.log");
/// ```
///
/// # Retryable initialization
///
/// An inert guard created with [`unclaimed`](Self::unclaimed) holds no claim
/// and no value. [`init`](Self::init) may be called on it repeatedly until it
/// succeeds; every failed attempt leaves the guard exactly as it was.
///
/// ```
/// use claim_guard::{ClaimRegistry, Claimed, Construct, DEFAULT_CLAIM_TIMEOUT};
/// use std::sync::Arc;
///
/// let registry = Arc::new(ClaimRegistry::<i32, String>::new());
/// let blocker = Claimed::new(&registry, "slot".to_string(), 1).unwrap();
///
/// let mut guard = Claimed::unclaimed(&registry);
/// let attempt = guard.init("slot".to_string(), DEFAULT_CLAIM_TIMEOUT, Construct::value(2));
/// assert!(attempt.is_err());
/// assert!(!guard.is_claimed());
///
/// drop(blocker);
/// guard
///     .init("slot".to_string(), DEFAULT_CLAIM_TIMEOUT, Construct::value(2))
///     .unwrap();
/// assert_eq!(*guard.get(), 2);
/// ```
pub struct Claimed<T, C: PartialEq> {
    registry: Arc<ClaimRegistry<T, C>>,
    state: Option<(C, Box<T>)>,
}

impl<T, C: PartialEq + Clone> Claimed<T, C> {
    /// Claims `condition` and owns a prepared `value`, using the default
    /// timeout.
    ///
    /// # Errors
    ///
    /// [`ClaimError::DuplicateCondition`] or [`ClaimError::LockTimeout`];
    /// on error the prepared value is dropped and nothing is registered.
    pub fn new(
        registry: &Arc<ClaimRegistry<T, C>>,
        condition: C,
        value: T,
    ) -> Result<Self, ClaimError> {
        Self::create(
            registry,
            condition,
            DEFAULT_CLAIM_TIMEOUT,
            Construct::value(value),
        )
    }

    /// Claims `condition` and default-constructs the value.
    ///
    /// The condition is used for uniqueness only.
    pub fn with_default(
        registry: &Arc<ClaimRegistry<T, C>>,
        condition: C,
    ) -> Result<Self, ClaimError>
    where
        T: Default + 'static,
    {
        Self::create(
            registry,
            condition,
            DEFAULT_CLAIM_TIMEOUT,
            Construct::defaulted(),
        )
    }

    /// Claims `condition` and constructs the value from a copy of it.
    pub fn from_condition(
        registry: &Arc<ClaimRegistry<T, C>>,
        condition: C,
    ) -> Result<Self, ClaimError>
    where
        T: From<C> + 'static,
        C: 'static,
    {
        let seed = condition.clone();
        Self::create(
            registry,
            condition,
            DEFAULT_CLAIM_TIMEOUT,
            Construct::with(move || T::from(seed)),
        )
    }

    /// Single construction entry point: claims `condition` within `timeout`,
    /// then resolves the construction intent.
    ///
    /// All other constructors funnel through here.
    ///
    /// # Errors
    ///
    /// - [`ClaimError::DuplicateCondition`] / [`ClaimError::LockTimeout`]
    ///   from the claim protocol
    /// - [`ClaimError::ConstructionFailed`] if a fallible builder fails;
    ///   the fresh claim is released before this is returned
    pub fn create(
        registry: &Arc<ClaimRegistry<T, C>>,
        condition: C,
        timeout: Duration,
        construct: Construct<T>,
    ) -> Result<Self, ClaimError> {
        let mut guard = Self::unclaimed(registry);
        guard.init(condition, timeout, construct)?;
        Ok(guard)
    }

    /// Creates an inert guard holding no claim and no value.
    ///
    /// Accessors panic until a later [`init`](Self::init) succeeds.
    pub fn unclaimed(registry: &Arc<ClaimRegistry<T, C>>) -> Self {
        Claimed {
            registry: registry.clone(),
            state: None,
        }
    }

    /// Claims `condition` and installs a value, reporting failure instead of
    /// panicking.
    ///
    /// May be called repeatedly until it succeeds; a failed attempt is
    /// side-effect-free (no registry entry, no constructed value, previous
    /// state untouched). Calling `init` on an already claimed guard first
    /// claims the new condition, and only on success releases the previous
    /// claim and drops the previous value. Re-initializing with the same
    /// condition therefore fails with [`ClaimError::DuplicateCondition`],
    /// since the guard's own claim is still registered.
    pub fn init(
        &mut self,
        condition: C,
        timeout: Duration,
        construct: Construct<T>,
    ) -> Result<(), ClaimError> {
        self.registry.claim(condition.clone(), timeout)?;

        let value = match construct.build() {
            Ok(value) => value,
            Err(source) => {
                // Roll the fresh claim back before surfacing the failure.
                self.registry.release(&condition);
                return Err(ClaimError::ConstructionFailed(source));
            }
        };

        if let Some((previous, _)) = self.state.replace((condition, Box::new(value))) {
            self.registry.release(&previous);
        }
        Ok(())
    }
}

impl<T, C: PartialEq> Claimed<T, C> {
    /// True once a claim and value are installed.
    pub fn is_claimed(&self) -> bool {
        self.state.is_some()
    }

    /// The claimed condition key, if any.
    pub fn condition(&self) -> Option<&C> {
        self.state.as_ref().map(|(condition, _)| condition)
    }

    /// The owned value, or `None` before a successful initialization.
    pub fn try_get(&self) -> Option<&T> {
        self.state.as_ref().map(|(_, value)| value.as_ref())
    }

    /// Mutable access to the owned value, or `None` before a successful
    /// initialization.
    pub fn try_get_mut(&mut self) -> Option<&mut T> {
        self.state.as_mut().map(|(_, value)| value.as_mut())
    }

    /// The owned value.
    ///
    /// # Panics
    ///
    /// Panics if the guard was never successfully initialized. Calling any
    /// accessor on an inert guard is a programming error.
    pub fn get(&self) -> &T {
        match self.try_get() {
            Some(value) => value,
            None => panic!("claim guard accessed before a successful claim"),
        }
    }

    /// Mutable access to the owned value.
    ///
    /// # Panics
    ///
    /// Panics if the guard was never successfully initialized.
    pub fn get_mut(&mut self) -> &mut T {
        match self.try_get_mut() {
            Some(value) => value,
            None => panic!("claim guard accessed before a successful claim"),
        }
    }

    /// Releases the claim and returns the owned value.
    ///
    /// Returns `None` for an inert guard.
    pub fn into_inner(mut self) -> Option<T> {
        let (condition, value) = self.state.take()?;
        self.registry.release(&condition);
        Some(*value)
    }
}

impl<T, C: PartialEq> Deref for Claimed<T, C> {
    type Target = T;

    fn deref(&self) -> &T {
        self.get()
    }
}

impl<T, C: PartialEq> DerefMut for Claimed<T, C> {
    fn deref_mut(&mut self) -> &mut T {
        self.get_mut()
    }
}

impl<T, C: PartialEq> Drop for Claimed<T, C> {
    fn drop(&mut self) {
        if let Some((condition, value)) = self.state.take() {
            // Unconditional (non-timed) acquire: cleanup must always
            // complete rather than leak a registry entry.
            self.registry.release(&condition);
            drop(value);
        }
    }
}

impl<T: std::fmt::Debug, C: PartialEq + std::fmt::Debug> std::fmt::Debug for Claimed<T, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Claimed")
            .field("condition", &self.condition())
            .field("value", &self.try_get())
            .finish()
    }
}

// -------------------------------------------------------------------------------------------------
// Tests
// -------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> Arc<ClaimRegistry<String, String>> {
        Arc::new(ClaimRegistry::new())
    }

    #[test]
    fn test_new_claims_and_drop_releases() {
        let registry = registry();

        let guard = Claimed::new(&registry, "k".to_string(), "v".to_string()).unwrap();
        assert!(registry.contains(&"k".to_string()));
        assert_eq!(guard.get(), "v");

        drop(guard);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_duplicate_condition_rejected_while_alive() {
        let registry = registry();

        let _guard = Claimed::new(&registry, "k".to_string(), "v".to_string()).unwrap();
        let second = Claimed::new(&registry, "k".to_string(), "w".to_string());
        assert!(second.unwrap_err().is_duplicate());

        // The failed construction left exactly one entry behind.
        assert_eq!(registry.claim_count(), 1);
    }

    #[test]
    fn test_with_default_and_from_condition() {
        let registry = registry();

        let defaulted = Claimed::with_default(&registry, "d".to_string()).unwrap();
        assert_eq!(defaulted.get(), "");

        let derived = Claimed::from_condition(&registry, "seed".to_string()).unwrap();
        assert_eq!(derived.get(), "seed");
    }

    #[test]
    fn test_failed_builder_rolls_back_claim() {
        let registry = registry();

        let result = Claimed::create(
            &registry,
            "k".to_string(),
            DEFAULT_CLAIM_TIMEOUT,
            Construct::try_with(|| Err("backend down".into())),
        );
        assert!(matches!(
            result.unwrap_err(),
            ClaimError::ConstructionFailed(_)
        ));
        assert!(registry.is_empty());

        // The condition is claimable again right away.
        let guard = Claimed::new(&registry, "k".to_string(), "v".to_string()).unwrap();
        assert_eq!(guard.get(), "v");
    }

    #[test]
    fn test_init_retries_until_success() {
        let registry = registry();
        let blocker = Claimed::new(&registry, "k".to_string(), "v".to_string()).unwrap();

        let mut guard = Claimed::unclaimed(&registry);
        for _ in 0..3 {
            let attempt = guard.init(
                "k".to_string(),
                DEFAULT_CLAIM_TIMEOUT,
                Construct::value("w".to_string()),
            );
            assert!(attempt.unwrap_err().is_duplicate());
            assert!(!guard.is_claimed());
            assert_eq!(registry.claim_count(), 1);
        }

        drop(blocker);
        guard
            .init(
                "k".to_string(),
                DEFAULT_CLAIM_TIMEOUT,
                Construct::value("w".to_string()),
            )
            .unwrap();
        assert_eq!(guard.get(), "w");
        assert_eq!(registry.claim_count(), 1);
    }

    #[test]
    fn test_reinit_swaps_condition_and_value() {
        let registry = registry();

        let mut guard = Claimed::new(&registry, "old".to_string(), "a".to_string()).unwrap();
        guard
            .init(
                "new".to_string(),
                DEFAULT_CLAIM_TIMEOUT,
                Construct::value("b".to_string()),
            )
            .unwrap();

        assert_eq!(guard.condition(), Some(&"new".to_string()));
        assert_eq!(guard.get(), "b");
        assert!(!registry.contains(&"old".to_string()));
        assert_eq!(registry.claim_count(), 1);
    }

    #[test]
    fn test_reinit_with_same_condition_is_duplicate() {
        let registry = registry();

        let mut guard = Claimed::new(&registry, "k".to_string(), "a".to_string()).unwrap();
        let attempt = guard.init(
            "k".to_string(),
            DEFAULT_CLAIM_TIMEOUT,
            Construct::value("b".to_string()),
        );
        assert!(attempt.unwrap_err().is_duplicate());

        // Previous state untouched.
        assert_eq!(guard.get(), "a");
        assert_eq!(registry.claim_count(), 1);
    }

    #[test]
    fn test_into_inner_releases_and_returns_value() {
        let registry = registry();

        let guard = Claimed::new(&registry, "k".to_string(), "v".to_string()).unwrap();
        let value = guard.into_inner().unwrap();
        assert_eq!(value, "v");
        assert!(registry.is_empty());
    }

    #[test]
    fn test_deref_and_mutation() {
        let registry = Arc::new(ClaimRegistry::<Vec<i32>, String>::new());

        let mut guard = Claimed::with_default(&registry, "k".to_string()).unwrap();
        guard.push(1);
        guard.get_mut().push(2);
        assert_eq!(&*guard, &[1, 2]);
    }

    #[test]
    #[should_panic(expected = "claim guard accessed before a successful claim")]
    fn test_get_on_inert_guard_panics() {
        let registry = registry();
        let guard = Claimed::unclaimed(&registry);
        let _ = guard.get();
    }

    #[test]
    fn test_inert_guard_drop_is_a_noop() {
        let registry = registry();
        let guard = Claimed::unclaimed(&registry);
        drop(guard);
        assert!(registry.is_empty());
    }
}
