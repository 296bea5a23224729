//! Bounded, persisted chat log.

use super::templates::Intent;
use crate::storage::{keys, Storage};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, VecDeque};
use tracing::{debug, warn};
use uuid::Uuid;

/// Maximum number of entries kept.
pub const MAX_ENTRIES: usize = 100;

/// One query/response exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatEntry {
    pub id: String,
    pub user_input: String,
    pub ai_response: String,
    pub category: Intent,
    /// Unix timestamp in milliseconds
    pub created_at: u64,
    #[serde(default)]
    pub tags: BTreeSet<String>,
}

/// Chat log, newest entry first.
#[derive(Debug)]
pub struct ChatHistory {
    entries: VecDeque<ChatEntry>,
    capacity: usize,
    storage: Storage,
}

impl ChatHistory {
    /// Load the log from storage, or start empty.
    pub fn load(storage: Storage, capacity: usize) -> Self {
        let mut entries: VecDeque<ChatEntry> = storage.get(keys::CHAT_HISTORY).unwrap_or_default();
        entries.truncate(capacity);
        debug!("Loaded {} chat entries", entries.len());
        Self {
            entries,
            capacity,
            storage,
        }
    }

    /// Record an exchange and return the stored entry.
    pub fn add_entry(
        &mut self,
        user_input: impl Into<String>,
        ai_response: impl Into<String>,
        category: Intent,
    ) -> ChatEntry {
        self.add_tagged_entry(user_input, ai_response, category, BTreeSet::new())
    }

    /// Record an exchange with tags.
    pub fn add_tagged_entry(
        &mut self,
        user_input: impl Into<String>,
        ai_response: impl Into<String>,
        category: Intent,
        tags: BTreeSet<String>,
    ) -> ChatEntry {
        let created_at = self.storage.clock().now_millis();
        let entry = ChatEntry {
            id: new_entry_id(created_at),
            user_input: user_input.into(),
            ai_response: ai_response.into(),
            category,
            created_at,
            tags,
        };

        self.entries.push_front(entry.clone());
        self.entries.truncate(self.capacity);
        self.persist();
        entry
    }

    /// Entries of one category, newest first.
    pub fn get_by_category(&self, category: Intent) -> Vec<ChatEntry> {
        self.entries
            .iter()
            .filter(|e| e.category == category)
            .cloned()
            .collect()
    }

    /// Case-insensitive substring search over input and response.
    pub fn search(&self, keyword: &str) -> Vec<ChatEntry> {
        let needle = keyword.to_lowercase();
        self.entries
            .iter()
            .filter(|e| {
                e.user_input.to_lowercase().contains(&needle)
                    || e.ai_response.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect()
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.persist();
    }

    /// All entries, newest first.
    pub fn entries(&self) -> impl Iterator<Item = &ChatEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn persist(&self) {
        if !self.storage.set(keys::CHAT_HISTORY, &self.entries, None) {
            warn!("Chat history not persisted");
        }
    }
}

/// Time prefix plus a random suffix; unique within a session in practice.
fn new_entry_id(now: u64) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("msg_{}_{}", now, &suffix[..9])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::storage::MemoryBackend;
    use std::sync::Arc;

    fn storage() -> Storage {
        Storage::new(Arc::new(MemoryBackend::new()), Arc::new(ManualClock::new(42)))
    }

    #[test]
    fn test_capped_and_newest_first() {
        let mut history = ChatHistory::load(storage(), MAX_ENTRIES);
        for i in 0..150 {
            history.add_entry(format!("q{}", i), "a", Intent::General);
            assert!(history.len() <= MAX_ENTRIES);
            assert_eq!(history.entries().next().unwrap().user_input, format!("q{}", i));
        }
        assert_eq!(history.len(), 100);
        assert_eq!(history.entries().last().unwrap().user_input, "q50");
    }

    #[test]
    fn test_ids_are_unique() {
        let mut history = ChatHistory::load(storage(), MAX_ENTRIES);
        let ids: BTreeSet<String> = (0..50)
            .map(|_| history.add_entry("q", "a", Intent::General).id)
            .collect();
        assert_eq!(ids.len(), 50);
        assert!(ids.iter().all(|id| id.starts_with("msg_42_")));
    }

    #[test]
    fn test_filter_and_search() {
        let mut history = ChatHistory::load(storage(), MAX_ENTRIES);
        history.add_entry("scan for Malware", "Security review", Intent::SecurityScan);
        history.add_entry("hello", "Arka here", Intent::General);
        history.add_entry("virus?", "Security review again", Intent::SecurityScan);

        let security = history.get_by_category(Intent::SecurityScan);
        assert_eq!(security.len(), 2);
        assert_eq!(security[0].user_input, "virus?");

        assert_eq!(history.search("MALWARE").len(), 1);
        assert_eq!(history.search("security").len(), 2);
        assert_eq!(history.search("arka").len(), 1);
        assert!(history.search("nothing").is_empty());
    }

    #[test]
    fn test_persisted_across_loads() {
        let storage = storage();
        let mut history = ChatHistory::load(storage.clone(), MAX_ENTRIES);
        history.add_entry("first", "a", Intent::General);
        history.add_entry("second", "b", Intent::HardwareInfo);

        let reloaded = ChatHistory::load(storage.clone(), MAX_ENTRIES);
        let inputs: Vec<_> = reloaded.entries().map(|e| e.user_input.as_str()).collect();
        assert_eq!(inputs, vec!["second", "first"]);

        history.clear();
        assert!(ChatHistory::load(storage, MAX_ENTRIES).is_empty());
    }
}
