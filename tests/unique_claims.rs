//! Integration tests for the core uniqueness contract: at most one live
//! guard per condition key, with the claim released exactly when the guard
//! goes away.

use claim_guard::{ClaimRegistry, Claimed, ClaimedInline, ClaimedRef};
use std::sync::Arc;

#[derive(Debug, PartialEq)]
struct FileHandle {
    path: String,
}

#[test]
fn test_second_claim_fails_until_first_guard_dropped() {
    let registry = Arc::new(ClaimRegistry::<FileHandle, String>::new());

    let first = Claimed::new(
        &registry,
        "/data/a.log".to_string(),
        FileHandle {
            path: "/data/a.log".to_string(),
        },
    )
    .unwrap();

    let second = Claimed::new(
        &registry,
        "/data/a.log".to_string(),
        FileHandle {
            path: "/data/a.log".to_string(),
        },
    );
    assert!(second.unwrap_err().is_duplicate());

    drop(first);

    let third = Claimed::new(
        &registry,
        "/data/a.log".to_string(),
        FileHandle {
            path: "/data/a.log".to_string(),
        },
    );
    assert!(third.is_ok());
}

#[test]
fn test_scope_exit_releases_claim() {
    let registry = Arc::new(ClaimRegistry::<FileHandle, String>::new());

    {
        let _guard = Claimed::new(
            &registry,
            "/data/b.log".to_string(),
            FileHandle {
                path: "/data/b.log".to_string(),
            },
        )
        .unwrap();
        assert_eq!(registry.claim_count(), 1);
    }

    // Identical condition succeeds without error after scope exit.
    let again = Claimed::new(
        &registry,
        "/data/b.log".to_string(),
        FileHandle {
            path: "/data/b.log".to_string(),
        },
    );
    assert!(again.is_ok());
}

#[test]
fn test_all_guard_kinds_contend_for_the_same_keys() {
    let registry = Arc::new(ClaimRegistry::<String, String>::new());
    let external = "external".to_string();

    let _owning = Claimed::new(&registry, "k1".to_string(), "a".to_string()).unwrap();
    let _inline = ClaimedInline::new(&registry, "k2".to_string(), "b".to_string()).unwrap();
    let _bound = ClaimedRef::bind(&registry, "k3".to_string(), &external).unwrap();

    assert_eq!(registry.claim_count(), 3);

    // Every kind is rejected by every other kind's claim.
    assert!(ClaimedInline::new(&registry, "k1".to_string(), "x".to_string()).is_err());
    assert!(ClaimedRef::bind(&registry, "k2".to_string(), &external).is_err());
    assert!(Claimed::new(&registry, "k3".to_string(), "x".to_string()).is_err());
}

#[test]
fn test_distinct_keys_coexist() {
    let registry = Arc::new(ClaimRegistry::<String, (String, u16)>::new());

    let _a = Claimed::new(
        &registry,
        ("db".to_string(), 1u16),
        "replica-1".to_string(),
    )
    .unwrap();
    let _b = Claimed::new(
        &registry,
        ("db".to_string(), 2u16),
        "replica-2".to_string(),
    )
    .unwrap();

    assert_eq!(registry.claim_count(), 2);
}

#[test]
fn test_into_inner_hands_back_value_and_frees_key() {
    let registry = Arc::new(ClaimRegistry::<FileHandle, String>::new());

    let guard = Claimed::new(
        &registry,
        "/data/c.log".to_string(),
        FileHandle {
            path: "/data/c.log".to_string(),
        },
    )
    .unwrap();

    let handle = guard.into_inner().unwrap();
    assert_eq!(handle.path, "/data/c.log");
    assert!(registry.is_empty());
}
