//! TTL envelope adapter over a raw backend.

use super::backend::{KeyValueBackend, MemoryBackend};
use super::{DEFAULT_TTL_MS, ENCODE_THRESHOLD, KEY_PREFIX};
use crate::clock::{system_clock, SharedClock};
use crate::error::{ArkaError, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// Envelope persisted under every key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredItem {
    /// The stored value, or a base64 string of its JSON text when `encoded`
    pub value: Value,
    /// Write time (Unix milliseconds)
    pub timestamp: u64,
    /// Lifetime in milliseconds; `None` means the adapter default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl_millis: Option<u64>,
    /// Whether `value` holds an encoded payload
    #[serde(default)]
    pub encoded: bool,
}

impl StoredItem {
    /// An item is visible while `now - timestamp <= ttl`.
    pub fn is_expired(&self, now: u64, default_ttl: u64) -> bool {
        now.saturating_sub(self.timestamp) > self.ttl_millis.unwrap_or(default_ttl)
    }
}

/// Storage adapter: envelopes, expiry and payload encoding.
#[derive(Clone)]
pub struct Storage {
    backend: Arc<dyn KeyValueBackend>,
    clock: SharedClock,
    default_ttl_ms: u64,
    encode_threshold: usize,
}

impl std::fmt::Debug for Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storage")
            .field("default_ttl_ms", &self.default_ttl_ms)
            .field("encode_threshold", &self.encode_threshold)
            .finish_non_exhaustive()
    }
}

impl Storage {
    /// Create an adapter over `backend` using `clock` for timestamps.
    pub fn new(backend: Arc<dyn KeyValueBackend>, clock: SharedClock) -> Self {
        Self {
            backend,
            clock,
            default_ttl_ms: DEFAULT_TTL_MS,
            encode_threshold: ENCODE_THRESHOLD,
        }
    }

    /// In-memory storage on the wall clock.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryBackend::new()), system_clock())
    }

    /// Override the TTL used when `set` is called without one.
    pub fn with_default_ttl(mut self, millis: u64) -> Self {
        self.default_ttl_ms = millis;
        self
    }

    /// Override the size above which structured values are encoded.
    pub fn with_encode_threshold(mut self, chars: usize) -> Self {
        self.encode_threshold = chars;
        self
    }

    /// The clock this adapter stamps envelopes with.
    pub fn clock(&self) -> &SharedClock {
        &self.clock
    }

    /// Store `value` under `key`. Returns `false` if anything went wrong.
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T, ttl_millis: Option<u64>) -> bool {
        match self.try_set(key, value, ttl_millis) {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to store {}: {}", key, e);
                false
            }
        }
    }

    /// Read the value under `key`, or `None` if missing, expired or unreadable.
    ///
    /// Expired entries are removed as a side effect.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.try_get(key) {
            Ok(value) => value,
            Err(e) => {
                warn!("Failed to read {}: {}", key, e);
                None
            }
        }
    }

    /// Remove `key`.
    pub fn remove(&self, key: &str) {
        if let Err(e) = self.backend.delete(key) {
            warn!("Failed to remove {}: {}", key, e);
        }
    }

    /// Remove every key carrying the crate prefix.
    pub fn clear(&self) {
        let keys = match self.backend.keys() {
            Ok(keys) => keys,
            Err(e) => {
                warn!("Failed to list keys: {}", e);
                return;
            }
        };
        for key in keys.iter().filter(|k| k.starts_with(KEY_PREFIX)) {
            self.remove(key);
        }
        debug!("Cleared stored state");
    }

    fn try_set<T: Serialize + ?Sized>(&self, key: &str, value: &T, ttl_millis: Option<u64>) -> Result<()> {
        let value = serde_json::to_value(value)?;
        let text = serde_json::to_string(&value)?;

        let structured = value.is_object() || value.is_array();
        let chars = text.chars().count();
        let (value, encoded) = if structured && chars > self.encode_threshold {
            debug!("Encoding {} ({} chars)", key, chars);
            (Value::String(STANDARD.encode(text.as_bytes())), true)
        } else {
            (value, false)
        };

        let item = StoredItem {
            value,
            timestamp: self.clock.now_millis(),
            ttl_millis,
            encoded,
        };
        self.backend.write(key, &serde_json::to_string(&item)?)
    }

    fn try_get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(raw) = self.backend.read(key)? else {
            return Ok(None);
        };
        let item: StoredItem = serde_json::from_str(&raw)?;

        if item.is_expired(self.clock.now_millis(), self.default_ttl_ms) {
            debug!("Dropping expired entry {}", key);
            self.backend.delete(key)?;
            return Ok(None);
        }

        let value = if item.encoded {
            let payload = item
                .value
                .as_str()
                .ok_or_else(|| ArkaError::encoding_error("encoded payload is not a string"))?;
            let bytes = STANDARD
                .decode(payload)
                .map_err(|e| ArkaError::encoding_error(e.to_string()))?;
            serde_json::from_slice(&bytes)?
        } else {
            item.value
        };

        Ok(Some(serde_json::from_value(value)?))
    }
}
