//! Cache Module
//!
//! Read-through caching for Xero API calls: a namespaced key-value store with
//! per-entry TTL, hit/miss statistics, pattern invalidation, and a global
//! disable switch.

mod entry;
mod key;
mod stats;
mod store;


// Re-export public types
pub use entry::{current_timestamp_ms, CacheEntry};
pub use key::cache_key;
pub use stats::CacheStats;
pub use store::CacheStore;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use regex::Regex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::RwLock;

use crate::error::{Result, XeroError};

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;

// == TTL Presets ==
/// Named TTLs consumed by call sites, so cache policies read as durations
/// rather than raw numbers.
pub const TTL_FIVE_MINUTES: Duration = Duration::from_secs(5 * 60);
pub const TTL_ONE_HOUR: Duration = Duration::from_secs(60 * 60);
pub const TTL_ONE_DAY: Duration = Duration::from_secs(24 * 60 * 60);
pub const TTL_SEVEN_DAYS: Duration = Duration::from_secs(7 * 24 * 60 * 60);

// == Fetch Options ==
/// Per-call overrides for [`Cache::get_or_fetch`].
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    /// TTL override; falls back to the cache's default when unset
    pub ttl: Option<Duration>,
    /// Skip lookup and storage for this call
    pub bypass_cache: bool,
}

impl FetchOptions {
    /// Options with a TTL override.
    pub fn ttl(ttl: Duration) -> Self {
        Self {
            ttl: Some(ttl),
            bypass_cache: false,
        }
    }

    /// Sets the bypass flag, threading a per-request "no cache" switch.
    pub fn with_bypass(mut self, bypass: bool) -> Self {
        self.bypass_cache = bypass;
        self
    }
}

// == Cache ==
/// Read-through cache front over a shared [`CacheStore`].
///
/// Explicitly constructed and cloned into whoever needs it; clones share the
/// same underlying store. All mutation interleaves through the internal lock,
/// which is never held across a producer await.
#[derive(Debug, Clone)]
pub struct Cache {
    store: Arc<RwLock<CacheStore>>,
}

impl Cache {
    // == Constructor ==
    /// Creates a cache for the given namespace.
    pub fn new(namespace: impl Into<String>, default_ttl: Duration) -> Self {
        Self {
            store: Arc::new(RwLock::new(CacheStore::new(namespace, default_ttl))),
        }
    }

    // == Get Or Fetch ==
    /// Returns the cached value for `key`, or invokes `producer` and stores
    /// its result.
    ///
    /// Bypass (per-call flag or globally disabled cache) skips lookup,
    /// invokes the producer, and stores nothing, so bypass mode never
    /// pollutes state or serves stale data. A producer failure propagates
    /// unchanged and leaves no entry behind.
    ///
    /// Concurrent misses for the same key are not coalesced: each caller
    /// invokes its own producer and the last write wins for the stored
    /// entry. The lock is released while the producer is in flight.
    pub async fn get_or_fetch<T, F, Fut>(
        &self,
        key: &str,
        producer: F,
        options: FetchOptions,
    ) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        CacheStore::validate_key(key)?;

        let bypass = options.bypass_cache || !self.is_enabled().await;
        if bypass {
            // A bypassed read behaves as a miss
            self.store.write().await.record_miss();
            return producer().await;
        }

        if let Some(cached) = self.store.write().await.lookup(key)? {
            return serde_json::from_value(cached).map_err(|e| {
                XeroError::Internal(format!("corrupt cache entry for '{}': {}", key, e))
            });
        }

        let produced = producer().await?;
        let value = serde_json::to_value(&produced)?;
        self.store.write().await.insert(key, value, options.ttl)?;
        Ok(produced)
    }

    // == Invalidate ==
    /// Removes the entry for a key. Returns whether an entry was removed.
    pub async fn invalidate(&self, key: &str) -> bool {
        self.store.write().await.invalidate(key)
    }

    // == Invalidate Pattern ==
    /// Removes every entry whose key matches the pattern; returns the count.
    pub async fn invalidate_pattern(&self, pattern: &Regex) -> usize {
        self.store.write().await.invalidate_pattern(pattern)
    }

    // == Invalidate Prefix ==
    /// Removes every entry whose key starts with `prefix`; returns the count.
    pub async fn invalidate_prefix(&self, prefix: &str) -> usize {
        self.store.write().await.invalidate_prefix(prefix)
    }

    // == Clear ==
    /// Removes all entries in the namespace; returns the count removed.
    pub async fn clear(&self) -> usize {
        self.store.write().await.clear()
    }

    // == Disable / Enable ==
    /// Makes all subsequent reads behave as bypass until re-enabled.
    /// Stored entries are retained, not cleared.
    pub async fn disable(&self) {
        self.store.write().await.set_enabled(false);
    }

    /// Re-enables lookups; previously stored live entries are served again.
    pub async fn enable(&self) {
        self.store.write().await.set_enabled(true);
    }

    /// Returns whether reads currently consult the store.
    pub async fn is_enabled(&self) -> bool {
        self.store.read().await.is_enabled()
    }

    // == Stats ==
    /// Returns current statistics; the entry count covers live entries only.
    pub async fn stats(&self) -> CacheStats {
        self.store.read().await.stats()
    }

    /// Resets hit/miss counters to zero.
    pub async fn reset_stats(&self) {
        self.store.write().await.reset_stats()
    }

    // == Purge Expired ==
    /// Removes expired entries; returns the count removed.
    pub async fn purge_expired(&self) -> usize {
        self.store.write().await.purge_expired()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn test_cache() -> Cache {
        Cache::new("xero", Duration::from_secs(300))
    }

    #[tokio::test]
    async fn test_read_through_invokes_producer_once() {
        let cache = test_cache();
        let calls = AtomicUsize::new(0);

        let first: String = cache
            .get_or_fetch(
                "contacts:list",
                || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok("from-producer".to_string())
                },
                FetchOptions::default(),
            )
            .await
            .unwrap();

        let second: String = cache
            .get_or_fetch(
                "contacts:list",
                || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok("never-called".to_string())
                },
                FetchOptions::default(),
            )
            .await
            .unwrap();

        assert_eq!(first, "from-producer");
        assert_eq!(second, "from-producer");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_expired_entry_refetches() {
        let cache = test_cache();
        let calls = AtomicUsize::new(0);

        for _ in 0..2 {
            let _: u32 = cache
                .get_or_fetch(
                    "k",
                    || async {
                        calls.fetch_add(1, Ordering::SeqCst);
                        Ok(1)
                    },
                    FetchOptions::ttl(Duration::from_millis(50)),
                )
                .await
                .unwrap();
            tokio::time::sleep(Duration::from_millis(80)).await;
        }

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_bypass_never_stores() {
        let cache = test_cache();

        let first: String = cache
            .get_or_fetch(
                "k",
                || async { Ok("bypassed".to_string()) },
                FetchOptions::default().with_bypass(true),
            )
            .await
            .unwrap();
        assert_eq!(first, "bypassed");

        // The follow-up non-bypass read must invoke its own producer
        let second: String = cache
            .get_or_fetch(
                "k",
                || async { Ok("stored".to_string()) },
                FetchOptions::default(),
            )
            .await
            .unwrap();
        assert_eq!(second, "stored");
    }

    async fn counted_fetch(cache: &Cache, calls: &AtomicUsize) -> String {
        cache
            .get_or_fetch(
                "k",
                || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok("value".to_string())
                },
                FetchOptions::default(),
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_disable_enable_round_trip() {
        let cache = test_cache();
        let calls = AtomicUsize::new(0);

        counted_fetch(&cache, &calls).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        cache.disable().await;

        // Disabled: always invokes the producer, even with a live entry
        counted_fetch(&cache, &calls).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        cache.enable().await;

        // Re-enabled: the previously stored entry is served again
        counted_fetch(&cache, &calls).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_producer_failure_propagates_and_stores_nothing() {
        let cache = test_cache();

        let result: Result<String> = cache
            .get_or_fetch(
                "k",
                || async { Err(XeroError::Internal("boom".to_string())) },
                FetchOptions::default(),
            )
            .await;
        assert!(result.is_err());

        // No negative caching: the next call invokes its producer
        let value: String = cache
            .get_or_fetch(
                "k",
                || async { Ok("recovered".to_string()) },
                FetchOptions::default(),
            )
            .await
            .unwrap();
        assert_eq!(value, "recovered");
    }

    #[tokio::test]
    async fn test_empty_key_fails_fast() {
        let cache = test_cache();

        let result: Result<String> = cache
            .get_or_fetch(
                "",
                || async { Ok("never".to_string()) },
                FetchOptions::default(),
            )
            .await;
        assert!(matches!(result, Err(XeroError::InvalidKey(_))));
    }

    #[tokio::test]
    async fn test_stats_one_miss_one_hit() {
        let cache = test_cache();

        for _ in 0..2 {
            let _: u32 = cache
                .get_or_fetch("k", || async { Ok(7) }, FetchOptions::default())
                .await
                .unwrap();
        }

        let stats = cache.stats().await;
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.entry_count, 1);
    }

    #[tokio::test]
    async fn test_clear_preserves_stats() {
        let cache = test_cache();

        let _: u32 = cache
            .get_or_fetch("k", || async { Ok(7) }, FetchOptions::default())
            .await
            .unwrap();

        let removed = cache.clear().await;
        assert_eq!(removed, 1);

        let stats = cache.stats().await;
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.entry_count, 0);
    }

    #[tokio::test]
    async fn test_pattern_invalidation_across_families() {
        let cache = test_cache();

        for key in ["contacts:a", "contacts:b", "accounts:c"] {
            let _: String = cache
                .get_or_fetch(
                    key,
                    || async { Ok(format!("value-{}", key)) },
                    FetchOptions::default(),
                )
                .await
                .unwrap();
        }

        let removed = cache
            .invalidate_pattern(&Regex::new("^contacts").unwrap())
            .await;
        assert_eq!(removed, 2);

        // The accounts entry survives and is served without a producer call
        let value: String = cache
            .get_or_fetch(
                "accounts:c",
                || async { Ok("refetched".to_string()) },
                FetchOptions::default(),
            )
            .await
            .unwrap();
        assert_eq!(value, "value-accounts:c");
    }

    #[tokio::test]
    async fn test_concurrent_misses_last_write_wins() {
        let cache = test_cache();

        let slow = cache.get_or_fetch(
            "k",
            || async {
                tokio::time::sleep(Duration::from_millis(50)).await;
                Ok("slow".to_string())
            },
            FetchOptions::default(),
        );
        let fast = cache.get_or_fetch(
            "k",
            || async { Ok("fast".to_string()) },
            FetchOptions::default(),
        );

        let (slow_result, fast_result) = tokio::join!(slow, fast);
        assert_eq!(slow_result.unwrap(), "slow");
        assert_eq!(fast_result.unwrap(), "fast");

        // Whichever producer resolved last determines the stored value
        let stored: String = cache
            .get_or_fetch(
                "k",
                || async { Ok("never".to_string()) },
                FetchOptions::default(),
            )
            .await
            .unwrap();
        assert_eq!(stored, "slow");
    }
}
