//! Construction intents for guard values.
//!
//! Every guard constructor ultimately passes one `Construct<T>` to a single
//! `create`/`init` entry point: the intent says how the value comes into
//! being once the claim has succeeded. Keeping this explicit (instead of a
//! spread of constructor overloads) means the claim protocol exists exactly
//! once per guard type.

use crate::claim_error::BuildError;

/// How a guard obtains its value after a successful claim.
///
/// The intent is resolved strictly after the condition key has been
/// registered; a failing builder causes the fresh claim to be rolled back.
///
/// # Examples
///
/// ```
/// use claim_guard::{ClaimRegistry, Claimed, Construct, DEFAULT_CLAIM_TIMEOUT};
/// use std::sync::Arc;
///
/// let registry = Arc::new(ClaimRegistry::<Vec<u8>, String>::new());
///
/// // Explicit default-construct marker.
/// let guard = Claimed::create(
///     &registry,
///     "buffer".to_string(),
///     DEFAULT_CLAIM_TIMEOUT,
///     Construct::defaulted(),
/// )
/// .unwrap();
/// assert!(guard.get().is_empty());
/// ```
pub struct Construct<T> {
    kind: Kind<T>,
}

enum Kind<T> {
    /// A value prepared before the claim; moved in on success.
    Value(T),
    /// A builder run on the claiming thread once the claim succeeds.
    Build(Box<dyn FnOnce() -> Result<T, BuildError>>),
}

impl<T> Construct<T> {
    /// Moves a prepared value into the guard.
    ///
    /// Use this when the value (or its construction arguments) exists before
    /// the claim is attempted.
    pub fn value(value: T) -> Self {
        Construct {
            kind: Kind::Value(value),
        }
    }

    /// Resolves the intent into a value.
    pub(crate) fn build(self) -> Result<T, BuildError> {
        match self.kind {
            Kind::Value(value) => Ok(value),
            Kind::Build(build) => build(),
        }
    }
}

impl<T: 'static> Construct<T> {
    /// Runs `build` after the claim succeeds.
    ///
    /// Nothing is constructed on a failed claim, which makes this the right
    /// intent for values that are expensive or side-effectful to create.
    pub fn with(build: impl FnOnce() -> T + 'static) -> Self {
        Construct {
            kind: Kind::Build(Box::new(move || Ok(build()))),
        }
    }

    /// Runs a fallible `build` after the claim succeeds.
    ///
    /// If the builder returns `Err`, the claim is rolled back and the guard
    /// reports [`ClaimError::ConstructionFailed`].
    ///
    /// [`ClaimError::ConstructionFailed`]: crate::ClaimError::ConstructionFailed
    pub fn try_with(build: impl FnOnce() -> Result<T, BuildError> + 'static) -> Self {
        Construct {
            kind: Kind::Build(Box::new(build)),
        }
    }

    /// Explicitly requests `T::default()`.
    ///
    /// The marker disambiguates "default-construct the value, the condition
    /// is only for uniqueness" from the value-carrying intents.
    pub fn defaulted() -> Self
    where
        T: Default,
    {
        Self::with(T::default)
    }
}

impl<T: Default + 'static> Default for Construct<T> {
    fn default() -> Self {
        Self::defaulted()
    }
}

impl<T> std::fmt::Debug for Construct<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self.kind {
            Kind::Value(_) => "Value",
            Kind::Build(_) => "Build",
        };
        f.debug_tuple("Construct").field(&kind).finish()
    }
}
