//! Basic usage example for claim-guard.
//!
//! Demonstrates:
//! - Creating a registry and claiming a condition with an owning guard
//! - Rejection of duplicate claims while a guard is alive
//! - Release on scope exit
//! - The retryable `init` path on an inert guard
//!
//! Run with: `cargo run --example basic_usage`

use claim_guard::{ClaimRegistry, Claimed, Construct, DEFAULT_CLAIM_TIMEOUT};
use std::sync::Arc;

#[derive(Debug)]
struct Session {
    user: String,
}

fn main() {
    println!("=== claim-guard: Basic Usage ===\n");

    // One registry per (value type, condition type) pairing.
    let registry = Arc::new(ClaimRegistry::<Session, String>::new());

    // -------------------------------------------------------------------------
    // 1. Claim a condition and own the value
    // -------------------------------------------------------------------------
    println!("1. Claiming \"alice\"...");

    let alice = Claimed::new(
        &registry,
        "alice".to_string(),
        Session {
            user: "alice".to_string(),
        },
    )
    .expect("first claim always succeeds");

    println!("   Claimed: {:?}", alice.get());

    // -------------------------------------------------------------------------
    // 2. Duplicate claims are rejected
    // -------------------------------------------------------------------------
    println!("\n2. Claiming \"alice\" again...");

    match Claimed::new(
        &registry,
        "alice".to_string(),
        Session {
            user: "alice".to_string(),
        },
    ) {
        Ok(_) => println!("   Unexpected success"),
        Err(err) => println!("   Rejected: {err}"),
    }

    // -------------------------------------------------------------------------
    // 3. Scope exit releases the claim
    // -------------------------------------------------------------------------
    println!("\n3. Dropping the guard...");
    drop(alice);
    println!("   Claims left: {}", registry.claim_count());

    // -------------------------------------------------------------------------
    // 4. Retryable initialization
    // -------------------------------------------------------------------------
    println!("\n4. Retrying with an inert guard...");

    let mut guard = Claimed::unclaimed(&registry);
    let attempt = guard.init(
        "alice".to_string(),
        DEFAULT_CLAIM_TIMEOUT,
        Construct::with(|| Session {
            user: "alice".to_string(),
        }),
    );
    println!("   init succeeded: {}", attempt.is_ok());
    println!("   user: {}", guard.get().user);
}
