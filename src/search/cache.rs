// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 DriveCorp

//! TTL cache for resolver results.
//!
//! Deduplicates repeated identical queries within a fixed window so the
//! external resolver is not hit twice for the same text. Entries expire
//! lazily at read time; there is no background sweep. The LRU capacity
//! bound keeps the cache from growing without limit in a long-lived
//! process.

use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use lru::LruCache;
use serde_json::Value;

/// The three resolver call kinds, each with its own key namespace so
/// identical query text never collides across kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    /// Keyword/intent interpretation of a vague query
    Interpret,
    /// Full content resolution
    Resolve,
    /// Direct-link analysis, keyed by the literal target reference
    AnalyzeLink,
}

impl CallKind {
    fn prefix(self) -> &'static str {
        match self {
            CallKind::Interpret => "interpret",
            CallKind::Resolve => "query",
            CallKind::AnalyzeLink => "link",
        }
    }
}

/// Cached entry: resolver payload + insertion timestamp.
struct CacheEntry {
    payload: Value,
    inserted_at: Instant,
}

/// In-process memoization of external resolver results.
///
/// Session-scoped: the cache holds no durable state and starts empty on
/// every process start.
pub struct ResultCache {
    cache: Mutex<LruCache<String, CacheEntry>>,
    ttl: Duration,
}

impl ResultCache {
    /// Create a new cache with the given capacity and TTL.
    ///
    /// - `capacity`: Max number of entries held at once.
    /// - `ttl`: Time-to-live for each entry, measured from write time.
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            cache: Mutex::new(LruCache::new(
                NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::new(1).unwrap()),
            )),
            ttl,
        }
    }

    /// Cache with the fixed service capacity and TTL.
    pub fn with_defaults() -> Self {
        Self::new(
            crate::config::RESULT_CACHE_CAPACITY,
            crate::config::RESULT_CACHE_TTL,
        )
    }

    /// Normalized, namespaced key for a raw query.
    ///
    /// Whitespace is trimmed and the text lower-cased, so `"Foo "` and
    /// `"foo"` reference the same entry within a call kind.
    fn key(kind: CallKind, raw: &str) -> String {
        format!("{}_{}", kind.prefix(), raw.trim().to_lowercase())
    }

    /// Get the cached payload for a query.
    ///
    /// Returns `None` when absent or expired; an expired entry is dropped
    /// on observation.
    pub fn get(&self, kind: CallKind, raw: &str) -> Option<Value> {
        let key = Self::key(kind, raw);
        let mut cache = self.cache.lock().ok()?;
        if let Some(entry) = cache.get(&key) {
            if entry.inserted_at.elapsed() < self.ttl {
                return Some(entry.payload.clone());
            }
            // Expired — remove it
            cache.pop(&key);
        }
        None
    }

    /// Store a payload, unconditionally overwriting any existing entry
    /// for that key with a fresh timestamp.
    pub fn put(&self, kind: CallKind, raw: &str, payload: Value) {
        let key = Self::key(kind, raw);
        if let Ok(mut cache) = self.cache.lock() {
            cache.put(
                key,
                CacheEntry {
                    payload,
                    inserted_at: Instant::now(),
                },
            );
        }
    }
}
