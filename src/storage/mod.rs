//! Persistent key-value storage with TTL envelopes.
//!
//! The [`Storage`] adapter wraps a [`KeyValueBackend`] and stores every value
//! inside a [`StoredItem`] envelope. Reads never fail: anything that cannot be
//! decoded, or that has outlived its TTL, is reported as absent.

pub mod adapter;
pub mod backend;

pub use adapter::{Storage, StoredItem};
pub use backend::{FileBackend, KeyValueBackend, MemoryBackend};

/// Default lifetime of a stored item: 30 days.
pub const DEFAULT_TTL_MS: u64 = 30 * 24 * 60 * 60 * 1000;

/// Serialized size (in chars) above which structured values are encoded.
pub const ENCODE_THRESHOLD: usize = 5_000;

/// Prefix shared by every key the crate writes.
pub const KEY_PREFIX: &str = "arka_";

/// Well-known keys.
pub mod keys {
    pub const CHAT_HISTORY: &str = "arka_chat_history";
    pub const PINNED_COMMANDS: &str = "arka_pinned_commands";
    pub const SETTINGS: &str = "arka_settings";
    pub const ANALYTICS: &str = "arka_analytics";
    pub const ACTIVE_PROFILE: &str = "arka_active_profile";
}
