//! Cache Store Module
//!
//! Namespaced key-value store with TTL expiry, invalidation, and statistics.
//! This is the synchronous core; [`crate::cache::Cache`] wraps it for
//! concurrent async access.

use std::collections::HashMap;
use std::time::Duration;

use regex::Regex;
use serde_json::Value;

use crate::cache::{CacheEntry, CacheStats, MAX_KEY_LENGTH};
use crate::error::{Result, XeroError};

// == Cache Store ==
/// Key-value storage scoped to a single namespace.
///
/// Expired entries are treated as absent on read (lazy expiry) and removed
/// when observed; `purge_expired` sweeps the rest.
#[derive(Debug)]
pub struct CacheStore {
    /// Prefix isolating this store's keys from other cache users
    namespace: String,
    /// Key-value storage (keys stored with the namespace prefix applied)
    entries: HashMap<String, CacheEntry>,
    /// Performance statistics
    stats: CacheStats,
    /// TTL used when a call site does not specify one
    default_ttl: Duration,
    /// When false, every read behaves as a bypass (entries are retained)
    enabled: bool,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a new CacheStore for the given namespace.
    pub fn new(namespace: impl Into<String>, default_ttl: Duration) -> Self {
        Self {
            namespace: namespace.into(),
            entries: HashMap::new(),
            stats: CacheStats::new(),
            default_ttl,
            enabled: true,
        }
    }

    // == Key Validation ==
    /// Rejects degenerate keys before they reach storage.
    ///
    /// An empty or oversized key is a caller programming error and fails
    /// fast instead of being stored.
    pub fn validate_key(key: &str) -> Result<()> {
        if key.is_empty() {
            return Err(XeroError::InvalidKey("key cannot be empty".to_string()));
        }
        if key.len() > MAX_KEY_LENGTH {
            return Err(XeroError::InvalidKey(format!(
                "key exceeds maximum length of {} bytes",
                MAX_KEY_LENGTH
            )));
        }
        Ok(())
    }

    fn namespaced(&self, key: &str) -> String {
        format!("{}:{}", self.namespace, key)
    }

    fn strip_namespace<'a>(&self, stored: &'a str) -> &'a str {
        stored
            .strip_prefix(self.namespace.as_str())
            .and_then(|rest| rest.strip_prefix(':'))
            .unwrap_or(stored)
    }

    // == Lookup ==
    /// Retrieves the live value for a key, recording a hit or miss.
    ///
    /// An expired entry is removed and reported as a miss.
    pub fn lookup(&mut self, key: &str) -> Result<Option<Value>> {
        Self::validate_key(key)?;

        let stored_key = self.namespaced(key);
        match self.entries.get(&stored_key) {
            Some(entry) if entry.is_expired() => {
                self.entries.remove(&stored_key);
                self.stats.record_miss();
                Ok(None)
            }
            Some(entry) => {
                let value = entry.value.clone();
                self.stats.record_hit();
                Ok(Some(value))
            }
            None => {
                self.stats.record_miss();
                Ok(None)
            }
        }
    }

    // == Insert ==
    /// Stores a value under a key, replacing any previous entry.
    ///
    /// Uses the store's default TTL when `ttl` is not given.
    pub fn insert(&mut self, key: &str, value: Value, ttl: Option<Duration>) -> Result<()> {
        Self::validate_key(key)?;

        let ttl = ttl.unwrap_or(self.default_ttl);
        let entry = CacheEntry::new(value, ttl.as_millis() as u64);
        self.entries.insert(self.namespaced(key), entry);
        Ok(())
    }

    // == Record Miss ==
    /// Counts a read that skipped the store entirely (bypass or disabled).
    pub fn record_miss(&mut self) {
        self.stats.record_miss();
    }

    // == Invalidate ==
    /// Removes the entry for a key. Returns whether an entry was removed.
    pub fn invalidate(&mut self, key: &str) -> bool {
        let stored_key = self.namespaced(key);
        self.entries.remove(&stored_key).is_some()
    }

    // == Invalidate Pattern ==
    /// Removes every entry whose namespace-stripped key matches the pattern.
    ///
    /// Returns the number of entries removed; zero matches is not an error.
    pub fn invalidate_pattern(&mut self, pattern: &Regex) -> usize {
        let matching: Vec<String> = self
            .entries
            .keys()
            .filter(|stored| pattern.is_match(self.strip_namespace(stored.as_str())))
            .cloned()
            .collect();

        for stored_key in &matching {
            self.entries.remove(stored_key);
        }

        matching.len()
    }

    // == Invalidate Prefix ==
    /// Prefix-match sugar over pattern invalidation.
    ///
    /// Used after write operations to evict a whole key family, e.g. all
    /// `contacts*` entries after a contact is created or updated.
    pub fn invalidate_prefix(&mut self, prefix: &str) -> usize {
        let matching: Vec<String> = self
            .entries
            .keys()
            .filter(|stored| self.strip_namespace(stored.as_str()).starts_with(prefix))
            .cloned()
            .collect();

        for stored_key in &matching {
            self.entries.remove(stored_key);
        }

        matching.len()
    }

    // == Clear ==
    /// Removes all entries in the namespace. Stats persist.
    pub fn clear(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        count
    }

    // == Purge Expired ==
    /// Removes all expired entries from the cache.
    ///
    /// Returns the number of entries removed.
    pub fn purge_expired(&mut self) -> usize {
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect();

        let count = expired_keys.len();

        for key in expired_keys {
            self.entries.remove(&key);
        }

        count
    }

    // == Enable / Disable ==
    /// Toggles the global bypass switch. Existing entries are retained.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Returns whether reads consult the store at all.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    // == Stats ==
    /// Returns current cache statistics.
    ///
    /// The entry count reflects only live entries, so an expired entry that
    /// has not yet been purged does not inflate the number.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        let live = self.entries.values().filter(|e| !e.is_expired()).count();
        stats.set_entry_count(live);
        stats
    }

    // == Reset Stats ==
    /// Resets hit/miss counters to zero.
    pub fn reset_stats(&mut self) {
        self.stats.reset();
    }

    // == Length ==
    /// Returns the raw number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
