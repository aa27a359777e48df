//! The reference guard: claims a condition for a caller-owned value.

use std::ops::Deref;
use std::sync::Arc;
use std::time::Duration;

use crate::{ClaimError, ClaimRegistry, DEFAULT_CLAIM_TIMEOUT};

/// A condition claim bound to an externally owned value.
///
/// Unlike [`Claimed`](crate::Claimed), this guard never owns the value: the
/// caller keeps ownership and must keep the value alive for the guard's
/// lifetime (the borrow checker enforces this). Dropping the guard releases
/// only the condition claim; the bound value stays valid and usable.
///
/// Guards of both kinds contend for the same keys when they share a
/// registry.
///
/// # Examples
///
/// ```
/// use claim_guard::{ClaimRegistry, ClaimedRef};
/// use std::sync::Arc;
///
/// let registry = Arc::new(ClaimRegistry::<String, String>::new());
/// let connection = "conn-7".to_string();
///
/// {
///     let bound = ClaimedRef::bind(&registry, "conn-7".to_string(), &connection).unwrap();
///     assert_eq!(bound.get(), "conn-7");
/// }
///
/// // The claim is gone, the value is not.
/// assert!(registry.is_empty());
/// assert_eq!(connection, "conn-7");
/// ```
pub struct ClaimedRef<'v, T, C: PartialEq> {
    registry: Arc<ClaimRegistry<T, C>>,
    state: Option<(C, &'v T)>,
}

impl<'v, T, C: PartialEq + Clone> ClaimedRef<'v, T, C> {
    /// Claims `condition` and binds to `value`, using the default timeout.
    ///
    /// Arguments follow the same condition-first order as
    /// [`Claimed::new`](crate::Claimed::new).
    pub fn bind(
        registry: &Arc<ClaimRegistry<T, C>>,
        condition: C,
        value: &'v T,
    ) -> Result<Self, ClaimError> {
        Self::bind_for(registry, condition, DEFAULT_CLAIM_TIMEOUT, value)
    }

    /// Claims `condition` within `timeout` and binds to `value`.
    ///
    /// # Errors
    ///
    /// [`ClaimError::DuplicateCondition`] or [`ClaimError::LockTimeout`];
    /// on error nothing is registered and the value is untouched.
    pub fn bind_for(
        registry: &Arc<ClaimRegistry<T, C>>,
        condition: C,
        timeout: Duration,
        value: &'v T,
    ) -> Result<Self, ClaimError> {
        let mut guard = Self::unclaimed(registry);
        guard.init(condition, timeout, value)?;
        Ok(guard)
    }

    /// Creates an inert guard holding no claim and no binding.
    pub fn unclaimed(registry: &Arc<ClaimRegistry<T, C>>) -> Self {
        ClaimedRef {
            registry: registry.clone(),
            state: None,
        }
    }

    /// Claims `condition` and binds to `value`, reporting failure instead of
    /// panicking.
    ///
    /// Retryable: a failed attempt leaves the guard exactly as it was. On an
    /// already claimed guard, success rebinds and releases the previous
    /// claim.
    pub fn init(&mut self, condition: C, timeout: Duration, value: &'v T) -> Result<(), ClaimError> {
        self.registry.claim(condition.clone(), timeout)?;
        if let Some((previous, _)) = self.state.replace((condition, value)) {
            self.registry.release(&previous);
        }
        Ok(())
    }
}

impl<'v, T, C: PartialEq> ClaimedRef<'v, T, C> {
    /// True once a claim and binding are installed.
    pub fn is_claimed(&self) -> bool {
        self.state.is_some()
    }

    /// The claimed condition key, if any.
    pub fn condition(&self) -> Option<&C> {
        self.state.as_ref().map(|(condition, _)| condition)
    }

    /// The bound value, or `None` before a successful initialization.
    pub fn try_get(&self) -> Option<&'v T> {
        self.state.as_ref().map(|&(_, value)| value)
    }

    /// The bound value.
    ///
    /// # Panics
    ///
    /// Panics if the guard was never successfully initialized.
    pub fn get(&self) -> &'v T {
        match self.try_get() {
            Some(value) => value,
            None => panic!("claim guard accessed before a successful claim"),
        }
    }
}

impl<T, C: PartialEq> Deref for ClaimedRef<'_, T, C> {
    type Target = T;

    fn deref(&self) -> &T {
        self.get()
    }
}

impl<T, C: PartialEq> Drop for ClaimedRef<'_, T, C> {
    fn drop(&mut self) {
        // Releases the claim only; the bound value is caller-owned.
        if let Some((condition, _)) = self.state.take() {
            self.registry.release(&condition);
        }
    }
}

impl<T: std::fmt::Debug, C: PartialEq + std::fmt::Debug> std::fmt::Debug
    for ClaimedRef<'_, T, C>
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClaimedRef")
            .field("condition", &self.condition())
            .field("value", &self.try_get())
            .finish()
    }
}

// -------------------------------------------------------------------------------------------------
// Tests
// -------------------------------------------------------------------------------------------------
