//! Content-hash keyed cache of compiled layers.
//!
//! A layer is fully determined by the used-class set and the theme text, so
//! the key is the sorted class list joined with `,`, then `-`, then the theme
//! hash. [`MemoryCache`] bounds the store with an LRU capacity and a TTL that
//! is checked on read.

use std::collections::{BTreeSet, HashMap, VecDeque};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::error::{CompileError, Result};

/// One compiled layer, as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    pub key: String,
    pub css: String,
    /// Milliseconds since the Unix epoch at which the entry was created.
    pub timestamp: u64,
    pub theme_hash: String,
}

impl CacheEntry {
    pub fn new(key: impl Into<String>, css: impl Into<String>, theme_hash: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            css: css.into(),
            timestamp: now_millis(),
            theme_hash: theme_hash.into(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| CompileError::Cache(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| CompileError::Cache(e.to_string()))
    }

    pub fn is_expired(&self, ttl: Duration, now: u64) -> bool {
        let age = now.saturating_sub(self.timestamp);
        u128::from(age) > ttl.as_millis()
    }
}

/// Where compiled layers are kept between passes.
pub trait CacheStore: Send + Sync {
    /// Returns the live entry stored under `key`.
    fn get(&mut self, key: &str) -> Option<CacheEntry>;

    /// Stores `entry` under its own key, replacing any previous entry.
    fn put(&mut self, entry: CacheEntry) -> Result<()>;
}

/// Stable 64-bit FNV-1a hash of `text`, as 16 hex digits.
///
/// # Example
///
/// ```
/// use utilcss::cache::content_hash;
///
/// assert_eq!(content_hash(""), "cbf29ce484222325");
/// assert_ne!(content_hash(":root{}"), content_hash(":root{ }"));
/// ```
pub fn content_hash(text: &str) -> String {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;

    let hash = text
        .bytes()
        .fold(OFFSET, |hash, byte| (hash ^ u64::from(byte)).wrapping_mul(PRIME));
    format!("{hash:016x}")
}

/// Builds the cache key for a class set compiled against a theme.
pub fn cache_key(classes: &BTreeSet<String>, theme_hash: &str) -> String {
    let joined = classes.iter().map(String::as_str).collect::<Vec<_>>().join(",");
    format!("{joined}-{theme_hash}")
}

pub(crate) fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
}

/// In-memory LRU cache with a time-to-live.
#[derive(Debug)]
pub struct MemoryCache {
    capacity: usize,
    ttl: Duration,
    map: HashMap<String, CacheEntry>,
    order: VecDeque<String>,
}

impl MemoryCache {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            capacity: capacity.max(1),
            ttl,
            map: HashMap::new(),
            order: VecDeque::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    fn touch(&mut self, key: &str) {
        if let Some(pos) = self.order.iter().position(|existing| existing == key) {
            self.order.remove(pos);
        }
        self.order.push_back(key.to_string());
    }

    fn forget(&mut self, key: &str) {
        self.map.remove(key);
        self.order.retain(|existing| existing != key);
    }

    fn evict_if_needed(&mut self) {
        while self.map.len() > self.capacity {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            log::trace!("cache: evicting `{oldest}`");
            self.map.remove(&oldest);
        }
    }
}

impl CacheStore for MemoryCache {
    fn get(&mut self, key: &str) -> Option<CacheEntry> {
        let expired = self.map.get(key)?.is_expired(self.ttl, now_millis());
        if expired {
            log::debug!("cache: entry expired");
            self.forget(key);
            return None;
        }
        self.touch(key);
        self.map.get(key).cloned()
    }

    fn put(&mut self, entry: CacheEntry) -> Result<()> {
        let key = entry.key.clone();
        self.map.insert(key.clone(), entry);
        self.touch(&key);
        self.evict_if_needed();
        Ok(())
    }
}
