// ── Invalidation stamp cache ──
//
// One network-scoped token in shared transient storage. The token value
// is a creation timestamp (Unix milliseconds) -- opaque to clients, who
// only ever compare it for equality. Storage trouble fails open: readers
// get a fresh uncached stamp instead of an error.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use dashmap::DashMap;
use tracing::{debug, warn};

use crate::error::ServerError;

/// Network-wide storage key for the invalidation token.
pub const STAMP_KEY: &str = "netmenu:refresh-stamp";

// ── TransientStore ──────────────────────────────────────────────────

/// Shared, network-scoped key-value storage with per-entry TTL.
///
/// Injected into both the endpoint state and the invalidation hooks;
/// there is no process-wide singleton.
pub trait TransientStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, ServerError>;
    fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> Result<(), ServerError>;
    fn delete(&self, key: &str) -> Result<(), ServerError>;
}

/// In-process [`TransientStore`]. Expiry is evaluated lazily on read.
#[derive(Default)]
pub struct MemoryStore {
    entries: DashMap<String, StoredValue>,
}

struct StoredValue {
    value: String,
    expires_at: Option<Instant>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TransientStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, ServerError> {
        if let Some(entry) = self.entries.get(key) {
            let expired = entry
                .expires_at
                .is_some_and(|deadline| Instant::now() >= deadline);
            if !expired {
                return Ok(Some(entry.value.clone()));
            }
        } else {
            return Ok(None);
        }
        // Expired: evict outside the read guard.
        self.entries.remove(key);
        Ok(None)
    }

    fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> Result<(), ServerError> {
        let expires_at = Some(Instant::now() + ttl);
        self.entries.insert(
            key.to_owned(),
            StoredValue {
                value: value.to_owned(),
                expires_at,
            },
        );
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), ServerError> {
        self.entries.remove(key);
        Ok(())
    }
}

// ── StampCache ──────────────────────────────────────────────────────

/// The single invalidation token, lazily created and coarsely retired.
pub struct StampCache {
    store: Arc<dyn TransientStore>,
    ttl: Duration,
}

impl StampCache {
    pub fn new(store: Arc<dyn TransientStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    /// Read the current stamp, minting one when absent or expired.
    ///
    /// Concurrent callers may race to mint; last writer wins and every
    /// value issued within one invalidation epoch is equally valid.
    pub fn stamp(&self) -> String {
        match self.store.get(STAMP_KEY) {
            Ok(Some(value)) => value,
            Ok(None) => self.mint(),
            Err(e) => {
                warn!(error = %e, "transient store read failed; issuing uncached stamp");
                fresh_value()
            }
        }
    }

    /// Retire the token unconditionally. Deleting an absent token is a no-op.
    pub fn invalidate(&self) {
        debug!("retiring invalidation stamp");
        if let Err(e) = self.store.delete(STAMP_KEY) {
            warn!(error = %e, "transient store delete failed; stamp retires on expiry");
        }
    }

    fn mint(&self) -> String {
        let value = fresh_value();
        if let Err(e) = self.store.set_with_ttl(STAMP_KEY, &value, self.ttl) {
            warn!(error = %e, "transient store write failed; stamp will not be cached");
        }
        value
    }
}

fn fresh_value() -> String {
    Utc::now().timestamp_millis().to_string()
}
