//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `habithero_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

fn main() {
    println!("habithero_core ping={}", habithero_core::ping());
    println!("habithero_core version={}", habithero_core::core_version());
    println!("habithero_core today={}", habithero_core::today());
}
