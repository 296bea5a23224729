//! # Arka - System Manager core
//!
//! The state and update loop behind the Arka dashboard. Nothing here inspects
//! the real machine: metrics are synthesized, the assistant answers from a
//! fixed template table, and "operations" are scripted step sequences.
//!
//! ## Components
//!
//! - **Storage**: key-value persistence with TTL envelopes and payload encoding
//! - **Metrics**: a seeded simulator producing snapshots and chart series
//! - **Assistant**: keyword intent classification, templates and chat history
//! - **Operations**: timed pseudo-step sequences with synthetic results
//! - **Alerts**: threshold checks over each snapshot
//! - **Profiles**: fixed presets with exactly one active
//! - **Scheduler**: a single tick source driving the simulator and alerts
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use arka::{clock, AppConfig, AppState, Scheduler};
//! use futures_util::StreamExt;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::default();
//!     let clock = clock::system_clock();
//!     let state = AppState::open(config.clone(), clock.clone())?.into_shared();
//!
//!     let scheduler = Scheduler::with_defaults(&config, clock);
//!     let mut ticks = scheduler.into_stream(state, config.tick_interval_ms);
//!     while let Some(report) = ticks.next().await {
//!         println!("{:?}", report.snapshot);
//!     }
//!     Ok(())
//! }
//! ```

pub mod alerts;
pub mod assistant;
pub mod clock;
pub mod config;
pub mod console;
pub mod error;
pub mod metrics;
pub mod operations;
pub mod profiles;
pub mod scheduler;
pub mod settings;
pub mod state;
pub mod storage;

// Re-export public API
pub use alerts::{AlertEvaluator, AlertEvent, AlertThresholds, Severity};
pub use assistant::{ChatEntry, ChatHistory, Intent};
pub use config::AppConfig;
pub use console::DebugConsole;
pub use error::{ArkaError, Result};
pub use metrics::{MetricKind, MetricSimulator, MetricSnapshot, RangeTag, SeriesPoint};
pub use operations::{OperationResult, OperationSimulator, OperationType};
pub use profiles::{Profile, ProfileId, ProfileRegistry};
pub use scheduler::{Scheduler, Tick, TickReport, TickSubscriber};
pub use state::{AppState, SharedState, SystemStatus};
pub use storage::Storage;

/// The default scheduler tick interval in milliseconds
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 2_000;
