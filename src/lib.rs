//! # Claim Guard
//!
//! Single-active-instance guards: for a chosen (value type, condition key
//! type) pairing, at most one live guarded object exists per distinct
//! condition value at any time, across threads, for the lifetime of the
//! guard. The intended use is resources that must not be concurrently
//! opened or mutated under the same identity, such as "the file named X
//! should have at most one open handle in this process".
//!
//! ## Quick Start
//!
//! ```rust
//! use claim_guard::{ClaimRegistry, Claimed};
//! use std::sync::Arc;
//!
//! // One registry per (value type, condition type) pairing.
//! let registry = Arc::new(ClaimRegistry::<String, String>::new());
//!
//! // Claim the key "config" and own the value for the guard's lifetime.
//! let guard = Claimed::new(&registry, "config".to_string(), "loaded".to_string()).unwrap();
//! assert_eq!(guard.get(), "loaded");
//!
//! // A second claim of the same key fails while the guard is alive.
//! assert!(Claimed::new(&registry, "config".to_string(), "again".to_string()).is_err());
//!
//! // Dropping the guard releases the claim.
//! drop(guard);
//! assert!(registry.is_empty());
//! ```
//!
//! ## What this does and does not guarantee
//!
//! - **Identity uniqueness, in-process**: the registry tracks condition keys
//!   claimed through the guards. A resource opened without going through a
//!   guard is invisible to it, and nothing is shared across processes.
//! - **No data-race protection**: the guarded value itself gets no
//!   concurrency protection; the mechanism only guards *which* values exist.
//! - **Weak uniqueness under a same-key race**: the claim protocol's
//!   duplicate check is deliberately not atomic with its add; see
//!   [`ClaimRegistry::claim`] for the exact guarantee.
//!
//! ## Main Types
//!
//! - [`ClaimRegistry`] - the per-(value type, condition type) claimed-key set
//! - [`Claimed`] - owning guard (value behind its own allocation)
//! - [`ClaimedInline`] - owning guard with the value stored directly inside
//! - [`ClaimedRef`] - non-owning guard bound to a caller-owned value
//! - [`Construct`] - construction intent resolved after a successful claim
//! - [`ClaimError`] - duplicate-condition / lock-timeout / construction
//!   failures
//! - [`define_claim_registry!`] - process-wide static registry declaration

mod claim_error;
mod claim_event;
mod claimed;
mod claimed_inline;
mod claimed_ref;
mod construct;
mod macros;
mod registry;

pub use claim_error::{BuildError, ClaimError};
pub use claim_event::{ClaimEvent, TraceCallback};
pub use claimed::Claimed;
pub use claimed_inline::ClaimedInline;
pub use claimed_ref::ClaimedRef;
pub use construct::Construct;
pub use registry::{ClaimRegistry, ClaimsGuard, DEFAULT_CLAIM_TIMEOUT};
