//! Guarding real file handles: at most one open writer per path in this
//! process, enforced by a process-wide static registry.
//!
//! Run with: `cargo run --example file_handles`

use claim_guard::define_claim_registry;
use std::fs::File;
use std::io::Write;

// One registry of open-writer claims for the whole process, keyed by path.
define_claim_registry!(writers, std::fs::File, String);

fn main() -> std::io::Result<()> {
    println!("=== claim-guard: File Handles ===\n");

    let path = std::env::temp_dir().join("claim-guard-demo.log");
    let key = path.display().to_string();

    // Open the file and claim its path in one step.
    let mut writer = writers::claim(key.clone(), File::create(&path)?)
        .expect("path is not claimed by anyone else");
    writeln!(writer.get_mut(), "first writer was here")?;
    println!("Opened and claimed {key}");

    // Anywhere else in the process, a second writer for the same path is
    // refused while the first guard is alive.
    match File::create(&path).map(|file| writers::claim(key.clone(), file)) {
        Ok(Err(err)) => println!("Second open refused: {err}"),
        _ => println!("Unexpected: second open was admitted"),
    }

    drop(writer);
    println!("Guard dropped, claims left: {}", writers::claim_count());

    std::fs::remove_file(&path)?;
    Ok(())
}
