//! Scripted maintenance operations.
//!
//! An operation is a fixed list of pseudo-steps walked with a timed pause
//! between each. Runs are independent: nothing serialises two operations,
//! and a run cannot be aborted once started, only abandoned.

use crate::config::AppConfig;
use crate::error::{ArkaError, Result};
use crate::metrics::MetricDelta;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::str::FromStr;
use std::time::Duration;
use tokio::time::{self, Instant};
use tracing::{debug, info, warn};

/// The available operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationType {
    MemoryOptimization,
    DiskCleanup,
    NetworkOptimization,
    SecurityScan,
    SystemRepair,
}

impl OperationType {
    pub const ALL: [OperationType; 5] = [
        OperationType::MemoryOptimization,
        OperationType::DiskCleanup,
        OperationType::NetworkOptimization,
        OperationType::SecurityScan,
        OperationType::SystemRepair,
    ];

    /// Used for names that match no operation.
    pub const BASELINE: OperationType = OperationType::DiskCleanup;

    pub fn as_str(self) -> &'static str {
        match self {
            OperationType::MemoryOptimization => "memory_optimization",
            OperationType::DiskCleanup => "disk_cleanup",
            OperationType::NetworkOptimization => "network_optimization",
            OperationType::SecurityScan => "security_scan",
            OperationType::SystemRepair => "system_repair",
        }
    }

    /// Resolve a name, falling back to [`Self::BASELINE`].
    pub fn from_name(name: &str) -> Self {
        name.parse().unwrap_or_else(|e| {
            warn!("{}; running {} instead", e, Self::BASELINE);
            Self::BASELINE
        })
    }

    /// Pseudo-steps in execution order.
    pub fn steps(self) -> &'static [&'static str] {
        match self {
            OperationType::MemoryOptimization => &[
                "Analyzing memory usage",
                "Identifying idle processes",
                "Clearing standby list",
                "Compacting working sets",
                "Verifying memory state",
            ],
            OperationType::DiskCleanup => &[
                "Scanning temporary files",
                "Emptying recycle bin",
                "Removing update leftovers",
                "Clearing thumbnail cache",
            ],
            OperationType::NetworkOptimization => &[
                "Flushing DNS cache",
                "Resetting Winsock catalog",
                "Renewing IP lease",
                "Tuning TCP parameters",
            ],
            OperationType::SecurityScan => &[
                "Updating definitions",
                "Scanning system files",
                "Scanning startup entries",
                "Checking firewall rules",
                "Quarantining threats",
                "Generating report",
            ],
            OperationType::SystemRepair => &[
                "Checking system file integrity",
                "Repairing component store",
                "Rebuilding icon cache",
            ],
        }
    }

    /// Nominal total run time in milliseconds.
    pub fn duration_ms(self) -> u64 {
        match self {
            OperationType::MemoryOptimization => 4_000,
            OperationType::DiskCleanup => 5_000,
            OperationType::NetworkOptimization => 3_000,
            OperationType::SecurityScan => 6_000,
            OperationType::SystemRepair => 5_000,
        }
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperationType {
    type Err = ArkaError;

    fn from_str(s: &str) -> Result<Self> {
        OperationType::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| ArkaError::unknown_operation(s))
    }
}

/// Progress state of one log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    InProgress,
    Completed,
}

/// One line of an operation's execution log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepLog {
    pub step: String,
    /// `(index + 1) / count * 100`
    pub progress_percent: u8,
    pub status: StepStatus,
}

/// Outcome of a simulated operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationResult {
    pub operation: OperationType,
    pub success: bool,
    pub metrics_affected: MetricDelta,
    pub execution_log: Vec<StepLog>,
    pub duration_millis: u64,
}

/// Runs scripted operations.
#[derive(Debug, Clone)]
pub struct OperationSimulator {
    time_scale: f64,
    success_rate: f64,
}

impl Default for OperationSimulator {
    fn default() -> Self {
        Self::new(1.0, 0.9)
    }
}

impl OperationSimulator {
    /// `time_scale` multiplies every scripted pause; `success_rate` is the
    /// probability a run reports success.
    pub fn new(time_scale: f64, success_rate: f64) -> Self {
        Self {
            time_scale: time_scale.max(0.0),
            success_rate: success_rate.clamp(0.0, 1.0),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.operation_time_scale, config.operation_success_rate)
    }

    /// Run the operation registered under `name` (or the baseline).
    pub async fn run_named(&self, name: &str) -> OperationResult {
        self.run(OperationType::from_name(name)).await
    }

    /// Walk every step of `operation`, pausing between them.
    pub async fn run(&self, operation: OperationType) -> OperationResult {
        let started = Instant::now();
        let steps = operation.steps();
        let pause = self.step_pause(operation);
        info!("Starting {} ({} steps)", operation, steps.len());

        let mut execution_log = Vec::with_capacity(steps.len());
        for (index, step) in steps.iter().enumerate() {
            if !pause.is_zero() {
                time::sleep(pause).await;
            }
            let last = index + 1 == steps.len();
            let entry = StepLog {
                step: step.to_string(),
                progress_percent: progress_percent(index, steps.len()),
                status: if last {
                    StepStatus::Completed
                } else {
                    StepStatus::InProgress
                },
            };
            debug!("{}: {} ({}%)", operation, entry.step, entry.progress_percent);
            execution_log.push(entry);
        }

        let (success, metrics_affected) = self.synthesize(operation);
        let duration_millis = started.elapsed().as_millis() as u64;
        if success {
            info!("{} completed in {} ms", operation, duration_millis);
        } else {
            warn!("{} reported failure after {} ms", operation, duration_millis);
        }

        OperationResult {
            operation,
            success,
            metrics_affected,
            execution_log,
            duration_millis,
        }
    }

    fn step_pause(&self, operation: OperationType) -> Duration {
        let per_step = operation.duration_ms() as f64 / operation.steps().len() as f64;
        Duration::from_millis((per_step * self.time_scale).round() as u64)
    }

    fn synthesize(&self, operation: OperationType) -> (bool, MetricDelta) {
        let mut rng = rand::thread_rng();
        let success = rng.gen_bool(self.success_rate);
        if !success {
            return (false, MetricDelta::default());
        }

        let delta = match operation {
            OperationType::MemoryOptimization => MetricDelta {
                memory_freed_mb: rng.gen_range(512.0..=2048.0_f64).round(),
                cpu_usage_change: -rng.gen_range(3.0..=12.0_f64),
                ..Default::default()
            },
            OperationType::DiskCleanup => MetricDelta {
                disk_freed_gb: rng.gen_range(1.0..=12.0_f64),
                ..Default::default()
            },
            OperationType::NetworkOptimization => MetricDelta {
                ping_change_ms: -rng.gen_range(2.0..=10.0_f64),
                ..Default::default()
            },
            OperationType::SecurityScan | OperationType::SystemRepair => MetricDelta::default(),
        };
        (true, delta)
    }
}

/// Completion after step `index` of `total`, rounded to the nearest percent.
fn progress_percent(index: usize, total: usize) -> u8 {
    ((index + 1) as f64 / total as f64 * 100.0).round() as u8
}

/// Race `future` against a timer.
///
/// The future runs as its own task. On expiry the caller gets
/// [`ArkaError::Timeout`] but the task is left running; its result is simply
/// never observed.
pub async fn with_timeout<F>(limit: Duration, future: F) -> Result<F::Output>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    let handle = tokio::spawn(future);
    match time::timeout(limit, handle).await {
        Ok(Ok(output)) => Ok(output),
        Ok(Err(e)) => Err(ArkaError::task_error(e.to_string())),
        Err(_) => Err(ArkaError::Timeout(limit.as_millis() as u64)),
    }
}
