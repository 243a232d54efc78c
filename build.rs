//! Stamps benchmark binaries with the source revision and build profile.
//!
//! Both end up in the startup log and in every JSON run summary, so latency
//! numbers can be traced back to the exact harness build that produced them.

use std::process::Command;

fn git(args: &[&str]) -> Option<String> {
    let out = Command::new("git").args(args).output().ok()?;
    out.status
        .success()
        .then(|| String::from_utf8_lossy(&out.stdout).trim().to_string())
}

fn main() {
    let git_hash = match git(&["rev-parse", "--short", "HEAD"]) {
        // Query text and harness changes both count as a modified tree
        Some(hash) if git(&["status", "--porcelain", "--", "src", "config"])
            .is_some_and(|s| !s.is_empty()) =>
        {
            format!("{}-dirty", hash)
        }
        Some(hash) => hash,
        None => "unknown".to_string(),
    };

    // Debug builds add harness overhead to every sample; make it visible
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "unknown".to_string());

    println!("cargo:rustc-env=BENCH_GIT_HASH={}", git_hash);
    println!("cargo:rustc-env=BENCH_BUILD_PROFILE={}", profile);
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/heads");
    println!("cargo:rerun-if-changed=src/catalog");
}
