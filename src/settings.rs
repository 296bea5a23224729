//! User preferences, pinned commands and the analytics log.
//!
//! Each of these is a small JSON value written back through [`Storage`]
//! after every change.

use crate::storage::{keys, Storage};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::warn;

/// Maximum number of pinned commands.
pub const MAX_PINNED_COMMANDS: usize = 20;

/// Default analytics capacity.
pub const MAX_ANALYTICS_EVENTS: usize = 500;

/// Dashboard preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    pub theme: String,
    pub sound_enabled: bool,
    pub animations_enabled: bool,
    pub notifications_enabled: bool,
    /// Chart refresh interval in milliseconds
    pub refresh_interval_ms: u64,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            theme: "cyberpunk".to_string(),
            sound_enabled: true,
            animations_enabled: true,
            notifications_enabled: true,
            refresh_interval_ms: crate::DEFAULT_TICK_INTERVAL_MS,
        }
    }
}

impl UserSettings {
    /// Stored settings, or defaults.
    pub fn load(storage: &Storage) -> Self {
        storage.get(keys::SETTINGS).unwrap_or_default()
    }

    pub fn save(&self, storage: &Storage) -> bool {
        storage.set(keys::SETTINGS, self, None)
    }
}

/// Ordered, de-duplicated command shortcuts.
#[derive(Debug)]
pub struct PinnedCommands {
    commands: Vec<String>,
    storage: Storage,
}

impl PinnedCommands {
    pub fn load(storage: Storage) -> Self {
        let mut commands: Vec<String> = storage.get(keys::PINNED_COMMANDS).unwrap_or_default();
        commands.truncate(MAX_PINNED_COMMANDS);
        Self { commands, storage }
    }

    /// Pin a command. Returns `false` if it was already pinned, blank, or the
    /// list is full.
    pub fn pin(&mut self, command: &str) -> bool {
        let command = command.trim();
        if command.is_empty()
            || self.commands.iter().any(|c| c == command)
            || self.commands.len() >= MAX_PINNED_COMMANDS
        {
            return false;
        }
        self.commands.push(command.to_string());
        self.persist();
        true
    }

    /// Unpin a command. Returns `false` if it was not pinned.
    pub fn unpin(&mut self, command: &str) -> bool {
        let before = self.commands.len();
        self.commands.retain(|c| c != command.trim());
        if self.commands.len() == before {
            return false;
        }
        self.persist();
        true
    }

    pub fn list(&self) -> &[String] {
        &self.commands
    }

    fn persist(&self) {
        if !self.storage.set(keys::PINNED_COMMANDS, &self.commands, None) {
            warn!("Pinned commands not persisted");
        }
    }
}

/// One recorded user action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsEvent {
    pub event: String,
    pub detail: String,
    /// Unix timestamp in milliseconds
    pub at: u64,
}

/// Bounded log of user actions, oldest first.
#[derive(Debug)]
pub struct AnalyticsLog {
    events: VecDeque<AnalyticsEvent>,
    capacity: usize,
    storage: Storage,
}

impl AnalyticsLog {
    pub fn load(storage: Storage, capacity: usize) -> Self {
        let mut events: VecDeque<AnalyticsEvent> = storage.get(keys::ANALYTICS).unwrap_or_default();
        while events.len() > capacity.max(1) {
            events.pop_front();
        }
        Self {
            events,
            capacity,
            storage,
        }
    }

    pub fn record(&mut self, event: impl Into<String>, detail: impl Into<String>) {
        while self.events.len() >= self.capacity.max(1) {
            self.events.pop_front();
        }
        self.events.push_back(AnalyticsEvent {
            event: event.into(),
            detail: detail.into(),
            at: self.storage.clock().now_millis(),
        });
        if !self.storage.set(keys::ANALYTICS, &self.events, None) {
            warn!("Analytics not persisted");
        }
    }

    pub fn events(&self) -> impl Iterator<Item = &AnalyticsEvent> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
