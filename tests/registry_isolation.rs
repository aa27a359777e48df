//! Integration tests for registry isolation: distinct (value type,
//! condition type) pairings never see each other's claims, even for
//! equal-looking condition values.

use claim_guard::{ClaimRegistry, Claimed};
use std::path::PathBuf;
use std::sync::Arc;

#[test]
fn test_condition_type_isolation() {
    // Same logical path, keyed once as text and once as a PathBuf.
    let by_text = Arc::new(ClaimRegistry::<u32, String>::new());
    let by_path = Arc::new(ClaimRegistry::<u32, PathBuf>::new());

    let _text_guard = Claimed::new(&by_text, "/tmp/shared".to_string(), 1u32).unwrap();

    // The PathBuf-keyed registry has no idea about the text claim.
    let path_guard = Claimed::new(&by_path, PathBuf::from("/tmp/shared"), 2u32);
    assert!(path_guard.is_ok());

    assert_eq!(by_text.claim_count(), 1);
    assert_eq!(by_path.claim_count(), 1);
}

#[test]
fn test_value_type_isolation() {
    // Equal keys, different guarded value types: separate registries,
    // no interference.
    let for_strings = Arc::new(ClaimRegistry::<String, String>::new());
    let for_numbers = Arc::new(ClaimRegistry::<u64, String>::new());

    let _s = Claimed::new(&for_strings, "shared-key".to_string(), "v".to_string()).unwrap();
    let n = Claimed::new(&for_numbers, "shared-key".to_string(), 7u64);
    assert!(n.is_ok());
}

#[test]
fn test_separate_registries_of_identical_pairing() {
    // Two registry objects of the same instantiation are still fully
    // independent claim domains.
    let left = Arc::new(ClaimRegistry::<u32, String>::new());
    let right = Arc::new(ClaimRegistry::<u32, String>::new());

    let _l = Claimed::new(&left, "k".to_string(), 1u32).unwrap();
    let r = Claimed::new(&right, "k".to_string(), 2u32);
    assert!(r.is_ok());

    assert!(left.contains(&"k".to_string()));
    assert!(right.contains(&"k".to_string()));
}

#[test]
fn test_fresh_registry_per_test_scope() {
    // Explicit registry objects mean no hidden cross-test state: a new
    // registry starts empty regardless of what other tests claimed.
    let registry = Arc::new(ClaimRegistry::<u32, String>::new());
    assert!(registry.is_empty());

    let _guard = Claimed::new(&registry, "k".to_string(), 1u32).unwrap();
    assert_eq!(registry.claim_count(), 1);
}
