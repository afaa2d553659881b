//! Anonymous nickname generator.
//!
//! Twitch chat accepts read-only connections under a `justinfan` nickname
//! with a numeric suffix and no password. Used whenever no authenticated
//! nickname is configured.

use rand::RngExt;

/// Generate an anonymous read-only nickname like `justinfan31337`.
pub fn anonymous_nickname() -> String {
    let mut rng = rand::rng();
    let num: u32 = rng.random_range(10_000..100_000);
    format!("justinfan{}", num)
}
