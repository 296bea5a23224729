//! The application state container.
//!
//! One [`AppState`] holds everything the dashboard mutates. It is shared as
//! [`SharedState`]; within a tick the scheduler is its only writer, and
//! overlapping writers outside a tick (two operations finishing, say) apply in
//! arrival order with the last one winning.

use crate::alerts::AlertEvent;
use crate::assistant::ChatHistory;
use crate::clock::SharedClock;
use crate::config::AppConfig;
use crate::error::Result;
use crate::metrics::MetricSnapshot;
use crate::operations::OperationType;
use crate::profiles::ProfileRegistry;
use crate::settings::{AnalyticsLog, PinnedCommands, UserSettings};
use crate::storage::{FileBackend, KeyValueBackend, MemoryBackend, Storage};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Pending alerts kept for the UI before the oldest are dropped.
pub const MAX_PENDING_ALERTS: usize = 50;

/// Shared handle to the state.
pub type SharedState = Arc<Mutex<AppState>>;

/// Headline status shown by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "operation")]
pub enum SystemStatus {
    Optimal,
    Busy(OperationType),
    Degraded,
}

/// Everything the dashboard mutates.
#[derive(Debug)]
pub struct AppState {
    pub config: AppConfig,
    pub storage: Storage,
    /// Most recent snapshot; replaced wholesale each tick
    pub latest: Option<MetricSnapshot>,
    /// Alerts not yet shown, oldest first
    pub pending_alerts: VecDeque<AlertEvent>,
    /// Alerts raised during the current tick
    pub tick_alerts: Vec<AlertEvent>,
    /// High-load override for the simulator to pick up on its next tick
    pub high_load_request: Option<u32>,
    pub status: SystemStatus,
    pub history: ChatHistory,
    pub profiles: ProfileRegistry,
    pub settings: UserSettings,
    pub pinned: PinnedCommands,
    pub analytics: AnalyticsLog,
}

impl AppState {
    /// Build the state over an existing storage adapter, restoring whatever
    /// was persisted there.
    pub fn new(config: AppConfig, storage: Storage) -> Self {
        let storage = storage
            .with_default_ttl(config.default_ttl_ms)
            .with_encode_threshold(config.encode_threshold);
        let history = ChatHistory::load(storage.clone(), config.history_capacity);
        let profiles = ProfileRegistry::load(storage.clone());
        let settings = UserSettings::load(&storage);
        let pinned = PinnedCommands::load(storage.clone());
        let analytics = AnalyticsLog::load(storage.clone(), config.analytics_capacity);

        Self {
            config,
            storage,
            latest: None,
            pending_alerts: VecDeque::new(),
            tick_alerts: Vec::new(),
            high_load_request: None,
            status: SystemStatus::Optimal,
            history,
            profiles,
            settings,
            pinned,
            analytics,
        }
    }

    /// Open state using the backend the configuration asks for.
    pub fn open(config: AppConfig, clock: SharedClock) -> Result<Self> {
        config.validate()?;
        let backend: Arc<dyn KeyValueBackend> = match &config.data_dir {
            Some(dir) => {
                info!("Persisting state under {}", dir.display());
                Arc::new(FileBackend::new(dir)?)
            }
            None => Arc::new(MemoryBackend::new()),
        };
        Ok(Self::new(config, Storage::new(backend, clock)))
    }

    /// Wrap the state for sharing.
    pub fn into_shared(self) -> SharedState {
        Arc::new(Mutex::new(self))
    }

    /// Queue alerts for the UI and record them against the current tick.
    pub fn raise_alerts(&mut self, alerts: Vec<AlertEvent>) {
        for alert in alerts {
            if self.pending_alerts.len() == MAX_PENDING_ALERTS {
                self.pending_alerts.pop_front();
            }
            self.pending_alerts.push_back(alert.clone());
            self.tick_alerts.push(alert);
        }
    }

    /// Take every pending alert.
    pub fn drain_alerts(&mut self) -> Vec<AlertEvent> {
        self.pending_alerts.drain(..).collect()
    }

    pub fn set_status(&mut self, status: SystemStatus) {
        debug!("Status {:?} -> {:?}", self.status, status);
        self.status = status;
    }

    /// Wipe persisted state and reload every component from scratch.
    pub fn reset(&mut self) {
        self.storage.clear();
        let fresh = Self::new(self.config.clone(), self.storage.clone());
        *self = fresh;
        info!("State reset");
    }
}
