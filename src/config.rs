//! Configuration constants for the auction engine.
//!
//! This module centralizes magic numbers and default values so the
//! lifecycle and settlement code stays free of inline literals.

/// Default delay before an auction opens when the submitter gives no
/// explicit window: one day.
pub const DEFAULT_START_DELAY_SECS: u64 = 86_400;

/// Default auction duration when the submitter gives no explicit window:
/// seven days.
pub const DEFAULT_AUCTION_DURATION_SECS: u64 = 7 * 86_400;

/// Sentinel buyer address meaning "no explicit buyer supplied".
///
/// Settlement requests carrying this address fall back to highest-bid
/// winner resolution, the same as requests with no buyer at all.
pub const UNKNOWN_BUYER: &str = "unknown";

/// Maximum size in bytes accepted when decoding a CBOR-encoded record
/// snapshot from an untrusted source.
pub const MAX_WIRE_VALUE_SIZE: usize = 65_536;

/// Return the current Unix timestamp in seconds.
///
/// Convenience wrapper for call sites that do not need an injectable
/// clock. For testable code, prefer accepting a `TimeProvider` instead.
pub fn now_unix() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
