//! Round-robin credential pool for the recognition API.
//!
//! API keys are supplied as a comma-separated list in the `API_KEYS`
//! environment variable, parsed once at startup. The pool is shared across
//! all in-flight requests behind an `Arc`; rotation uses an atomic cursor so
//! concurrent callers never corrupt the index.

use crate::error::ConfigError;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Environment variable holding the comma-separated API keys.
pub const API_KEYS_ENV: &str = "API_KEYS";

/// Ordered pool of API credentials with a rotating cursor.
///
/// The cursor always stays in `[0, len)`: `next` stores the already-wrapped
/// successor, so no reader ever observes an out-of-range index.
#[derive(Debug)]
pub struct CredentialPool {
    keys: Vec<String>,
    cursor: AtomicUsize,
}

impl CredentialPool {
    /// Build a pool from an ordered list of keys.
    ///
    /// Fails if the list is empty — a misconfigured pool must abort startup,
    /// never surface per-request.
    pub fn new(keys: Vec<String>) -> Result<Self, ConfigError> {
        if keys.is_empty() {
            return Err(ConfigError::Credentials(format!(
                "set {API_KEYS_ENV} to a comma-separated list of API keys"
            )));
        }
        Ok(Self {
            keys,
            cursor: AtomicUsize::new(0),
        })
    }

    /// Build a pool from the `API_KEYS` environment variable.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_var(API_KEYS_ENV)
    }

    /// Build a pool from a named environment variable.
    pub fn from_env_var(name: &str) -> Result<Self, ConfigError> {
        let raw = std::env::var(name).map_err(|_| {
            ConfigError::Credentials(format!(
                "{name} is not set; set it to a comma-separated list of API keys"
            ))
        })?;
        Self::new(parse_keys(&raw))
    }

    /// Return the next credential, advancing the cursor.
    ///
    /// Cycles deterministically through the pool in insertion order. Safe
    /// under concurrent calls: the compare-and-swap loop inside
    /// `fetch_update` guarantees each caller claims a distinct increment.
    pub fn next(&self) -> &str {
        let len = self.keys.len();
        let idx = self
            .cursor
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |c| Some((c + 1) % len))
            .unwrap_or(0);
        &self.keys[idx]
    }

    /// Number of credentials in the pool.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether the pool is empty. Always false for a constructed pool.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Parse a comma-separated key list, trimming whitespace and dropping empty
/// entries (trailing commas, double commas).
fn parse_keys(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;

    #[test]
    fn test_empty_pool_is_rejected() {
        let err = CredentialPool::new(vec![]).unwrap_err();
        assert!(err.to_string().contains("API_KEYS"));
    }

    #[test]
    fn test_parse_keys_trims_and_drops_empty() {
        assert_eq!(parse_keys("a, b ,c"), vec!["a", "b", "c"]);
        assert_eq!(parse_keys("a,,b,"), vec!["a", "b"]);
        assert!(parse_keys(" , ,").is_empty());
    }

    #[test]
    fn test_single_key_always_returned() {
        let pool = CredentialPool::new(vec!["only".into()]).unwrap();
        for _ in 0..5 {
            assert_eq!(pool.next(), "only");
        }
    }

    #[test]
    fn test_two_keys_alternate() {
        let pool = CredentialPool::new(vec!["A".into(), "B".into()]).unwrap();
        assert_eq!(pool.next(), "A");
        assert_eq!(pool.next(), "B");
        assert_eq!(pool.next(), "A");
        assert_eq!(pool.next(), "B");
    }

    #[test]
    fn test_full_cycle_in_insertion_order() {
        let keys: Vec<String> = (0..7).map(|i| format!("key{i}")).collect();
        let pool = CredentialPool::new(keys.clone()).unwrap();

        // N consecutive calls return each key exactly once, in order
        for key in &keys {
            assert_eq!(pool.next(), key);
        }
        // Call N+1 wraps back to the first key
        assert_eq!(pool.next(), "key0");
    }

    #[test]
    fn test_concurrent_rotation_is_fair() {
        // 4 keys, 8 threads x 100 calls = 800 calls: each key must be
        // handed out exactly 200 times if no increment is lost or doubled.
        let keys: Vec<String> = (0..4).map(|i| format!("k{i}")).collect();
        let pool = Arc::new(CredentialPool::new(keys).unwrap());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let pool = pool.clone();
                std::thread::spawn(move || {
                    let mut counts: HashMap<String, usize> = HashMap::new();
                    for _ in 0..100 {
                        *counts.entry(pool.next().to_string()).or_default() += 1;
                    }
                    counts
                })
            })
            .collect();

        let mut totals: HashMap<String, usize> = HashMap::new();
        for handle in handles {
            for (key, count) in handle.join().unwrap() {
                *totals.entry(key).or_default() += count;
            }
        }

        assert_eq!(totals.len(), 4);
        for (key, count) in totals {
            assert_eq!(count, 200, "credential {key} handed out {count} times");
        }
    }
}
