// ABOUTME: TTL-bounded cache of prior extraction results keyed by a hash of the URL.
// ABOUTME: Defines the CacheStore trait over the external key/value collaborator plus an in-memory store.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::document::ExtractedDocument;
use crate::error::ScrapeError;

/// Deterministic cache key for a URL: hex SHA-256 of the URL string.
pub fn url_hash(url: &str) -> String {
    let digest = Sha256::digest(url.as_bytes());
    format!("{:x}", digest)
}

/// One cached extraction result. Replaced whole on overwrite, never partially mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub url_hash: String,
    pub url: String,
    pub document: ExtractedDocument,
    pub expires_at: DateTime<Utc>,
}

impl CacheEntry {
    /// Build an entry for a document, expiring `ttl` from now.
    pub fn new(document: ExtractedDocument, ttl: Duration) -> Self {
        let ttl = chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::hours(24));
        Self {
            url_hash: url_hash(&document.url),
            url: document.url.clone(),
            expires_at: Utc::now() + ttl,
            document,
        }
    }

    /// Returns true if the entry is past its expiry.
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

/// Key/value persistence of cache entries.
///
/// Writes are upserts, latest write wins. Implementations must never block a
/// scrape on failure; callers treat `put` errors as non-fatal.
pub trait CacheStore: Send + Sync {
    /// Return the cached document for a URL if present and unexpired.
    fn get(&self, url: &str) -> Option<ExtractedDocument>;

    /// Upsert an entry. Failures are logged and swallowed by the caller.
    fn put(&self, entry: CacheEntry) -> Result<(), ScrapeError>;
}

/// In-memory cache store, used by default and in tests.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CacheStore for MemoryCache {
    fn get(&self, url: &str) -> Option<ExtractedDocument> {
        let key = url_hash(url);
        let entries = self.entries.read().ok()?;
        let entry = entries.get(&key)?;
        if entry.is_expired() {
            return None;
        }
        Some(entry.document.clone())
    }

    fn put(&self, entry: CacheEntry) -> Result<(), ScrapeError> {
        let mut entries = self.entries.write().map_err(|_| {
            ScrapeError::cache_write(
                entry.url.clone(),
                "CachePut",
                Some(anyhow::anyhow!("cache lock poisoned")),
            )
        })?;
        entries.insert(entry.url_hash.clone(), entry);
        Ok(())
    }
}
