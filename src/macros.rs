//! Macro for declaring process-wide static claim registries.
//!
//! The core types take an explicit registry object so tests and libraries
//! can scope their claims however they want. Applications that want the
//! "one registry for the whole process, per (value type, condition type)"
//! style declare it once with this macro.

/// Declares a module wrapping a lazily initialized, process-wide claim
/// registry for one (value type, condition type) pairing.
///
/// The generated module contains:
/// - a hidden `LazyLock` static holding the registry
/// - `registry()` returning a shared handle for use with the guard types
/// - free helper functions delegating to that registry
///
/// # Examples
///
/// ```rust
/// use claim_guard::define_claim_registry;
///
/// // One process-wide registry of open-log-file claims, keyed by path.
/// define_claim_registry!(log_files, String, String);
///
/// let first = log_files::claim("/var/log/app.log".to_string(), "handle".to_string()).unwrap();
/// assert!(log_files::contains(&"/var/log/app.log".to_string()));
///
/// // Second claim for the same path is rejected while `first` lives.
/// assert!(log_files::claim("/var/log/app.log".to_string(), "other".to_string()).is_err());
/// drop(first);
/// ```
///
/// # Multiple registries
///
/// Each invocation is completely isolated, even for identical type
/// pairings:
///
/// ```rust
/// use claim_guard::define_claim_registry;
///
/// define_claim_registry!(readers, String, String);
/// define_claim_registry!(writers, String, String);
///
/// let _r = readers::claim("x".to_string(), "r".to_string()).unwrap();
/// // Same key, different registry: no conflict.
/// let _w = writers::claim("x".to_string(), "w".to_string()).unwrap();
/// ```
#[macro_export]
macro_rules! define_claim_registry {
    ($name:ident, $value:ty, $condition:ty) => {
        pub mod $name {
            use std::sync::{Arc, LazyLock};

            // Process-wide registry for this pairing (module-private)
            static REGISTRY: LazyLock<Arc<$crate::ClaimRegistry<$value, $condition>>> =
                LazyLock::new(|| Arc::new($crate::ClaimRegistry::new()));

            /// Shared handle to this registry, for use with the guard types.
            pub fn registry() -> Arc<$crate::ClaimRegistry<$value, $condition>> {
                REGISTRY.clone()
            }

            /// Claim `condition` and take ownership of `value`.
            pub fn claim(
                condition: $condition,
                value: $value,
            ) -> Result<$crate::Claimed<$value, $condition>, $crate::ClaimError> {
                $crate::Claimed::new(&registry(), condition, value)
            }

            /// Claim `condition` and take ownership of `value`, waiting at
            /// most `timeout` for the registry lock.
            pub fn claim_for(
                condition: $condition,
                value: $value,
                timeout: std::time::Duration,
            ) -> Result<$crate::Claimed<$value, $condition>, $crate::ClaimError> {
                $crate::Claimed::create(
                    &registry(),
                    condition,
                    timeout,
                    $crate::Construct::value(value),
                )
            }

            /// Claim `condition` for a caller-owned `value`.
            pub fn bind<'v>(
                condition: $condition,
                value: &'v $value,
            ) -> Result<$crate::ClaimedRef<'v, $value, $condition>, $crate::ClaimError> {
                $crate::ClaimedRef::bind(&registry(), condition, value)
            }

            /// Check whether `condition` is currently claimed.
            pub fn contains(condition: &$condition) -> bool {
                registry().contains(condition)
            }

            /// Number of currently claimed conditions.
            pub fn claim_count() -> usize {
                registry().claim_count()
            }

            /// Set a tracing callback for this registry.
            pub fn set_trace_callback(
                callback: impl Fn(&$crate::ClaimEvent) + Send + Sync + 'static,
            ) {
                registry().set_trace_callback(callback)
            }

            /// Clear the tracing callback.
            pub fn clear_trace_callback() {
                registry().clear_trace_callback()
            }
        }
    };
}
