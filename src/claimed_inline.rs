//! The inline guard: like [`Claimed`](crate::Claimed), but the value is
//! stored directly in the guard instead of behind its own allocation.

use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use std::time::Duration;

use crate::{ClaimError, ClaimRegistry, Construct, DEFAULT_CLAIM_TIMEOUT};

/// An owning guard whose value is a direct member.
///
/// Semantics match [`Claimed`](crate::Claimed): the condition key is claimed
/// on construction and released on drop, and both guard kinds contend for the
/// same keys when they share a registry. The difference is storage: the value
/// sits inside the guard, so there is no separate allocation, and a
/// re-initialization overwrites the previous value by move. There is no
/// bind-to-external-reference mode; the value is always constructed in place.
///
/// # Examples
///
/// ```
/// use claim_guard::{ClaimRegistry, ClaimedInline};
/// use std::sync::Arc;
///
/// let registry = Arc::new(ClaimRegistry::<u64, String>::new());
///
/// let counter = ClaimedInline::new(&registry, "hits".to_string(), 0u64).unwrap();
/// assert!(ClaimedInline::new(&registry, "hits".to_string(), 0u64).is_err());
/// assert_eq!(*counter.get(), 0);
/// ```
pub struct ClaimedInline<T, C: PartialEq> {
    registry: Arc<ClaimRegistry<T, C>>,
    state: Option<(C, T)>,
}

impl<T, C: PartialEq + Clone> ClaimedInline<T, C> {
    /// Claims `condition` and stores a prepared `value`, using the default
    /// timeout.
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

    /// Claims `condition` and default-constructs the value in place.
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

    /// Single construction entry point; see [`Claimed::create`].
    ///
    /// [`Claimed::create`]: crate::Claimed::create
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
    pub fn unclaimed(registry: &Arc<ClaimRegistry<T, C>>) -> Self {
        ClaimedInline {
            registry: registry.clone(),
            state: None,
        }
    }

    /// Claims `condition` and installs a value, reporting failure instead of
    /// panicking.
    ///
    /// Retryable and side-effect-free on failure. On an already claimed
    /// guard, success overwrites the stored value by move and releases the
    /// previous claim.
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
                self.registry.release(&condition);
                return Err(ClaimError::ConstructionFailed(source));
            }
        };

        if let Some((previous, _)) = self.state.replace((condition, value)) {
            self.registry.release(&previous);
        }
        Ok(())
    }
}

impl<T, C: PartialEq> ClaimedInline<T, C> {
    /// True once a claim and value are installed.
    pub fn is_claimed(&self) -> bool {
        self.state.is_some()
    }

    /// The claimed condition key, if any.
    pub fn condition(&self) -> Option<&C> {
        self.state.as_ref().map(|(condition, _)| condition)
    }

    /// The stored value, or `None` before a successful initialization.
    pub fn try_get(&self) -> Option<&T> {
        self.state.as_ref().map(|(_, value)| value)
    }

    /// Mutable access to the stored value, or `None` before a successful
    /// initialization.
    pub fn try_get_mut(&mut self) -> Option<&mut T> {
        self.state.as_mut().map(|(_, value)| value)
    }

    /// The stored value.
    ///
    /// # Panics
    ///
    /// Panics if the guard was never successfully initialized.
    pub fn get(&self) -> &T {
        match self.try_get() {
            Some(value) => value,
            None => panic!("claim guard accessed before a successful claim"),
        }
    }

    /// Mutable access to the stored value.
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

    /// Releases the claim and returns the stored value.
    pub fn into_inner(mut self) -> Option<T> {
        let (condition, value) = self.state.take()?;
        self.registry.release(&condition);
        Some(value)
    }
}

impl<T, C: PartialEq> Deref for ClaimedInline<T, C> {
    type Target = T;

    fn deref(&self) -> &T {
        self.get()
    }
}

impl<T, C: PartialEq> DerefMut for ClaimedInline<T, C> {
    fn deref_mut(&mut self) -> &mut T {
        self.get_mut()
    }
}

impl<T, C: PartialEq> Drop for ClaimedInline<T, C> {
    fn drop(&mut self) {
        if let Some((condition, _value)) = self.state.take() {
            self.registry.release(&condition);
        }
    }
}

impl<T: std::fmt::Debug, C: PartialEq + std::fmt::Debug> std::fmt::Debug for ClaimedInline<T, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClaimedInline")
            .field("condition", &self.condition())
            .field("value", &self.try_get())
            .finish()
    }
}

// -------------------------------------------------------------------------------------------------
// Tests
// -------------------------------------------------------------------------------------------------
