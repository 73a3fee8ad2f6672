//! Utility functions and helpers
//!
//! This module provides small helpers shared by the codec and its callers.

use std::time::Instant;
use log::debug;

/// Measure execution time of a closure
pub fn measure_time<F, T>(name: &str, f: F) -> T
where
    F: FnOnce() -> T,
{
    let start = Instant::now();
    let result = f();
    let elapsed = start.elapsed();
    debug!("{} took {}ms", name, elapsed.as_millis());
    result
}

/// Strip an optional `0x` prefix from a hex string
pub fn strip_hex_prefix(s: &str) -> &str {
    s.strip_prefix("0x").unwrap_or(s)
}

/// Convert a byte array to a hex string
pub fn bytes_to_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}
