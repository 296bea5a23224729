//! Threshold alerts over metric snapshots.
//!
//! Evaluation is stateless: a breach raises an alert on every snapshot that
//! shows it. Nothing is de-duplicated across ticks.

use crate::metrics::MetricSnapshot;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Alert severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Critical => "critical",
        })
    }
}

/// A transient notification raised by the evaluator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertEvent {
    pub title: String,
    pub message: String,
    pub severity: Severity,
    /// Unix timestamp in milliseconds
    pub raised_at: u64,
}

/// Limits that trigger alerts. A value must exceed the limit to fire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertThresholds {
    /// CPU usage percentage raising a warning
    pub cpu_usage: f64,
    /// RAM usage percentage raising a critical alert
    pub ram_usage: f64,
    /// CPU temperature in Celsius raising a warning
    pub cpu_temperature: f64,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            cpu_usage: 85.0,
            ram_usage: 90.0,
            cpu_temperature: 75.0,
        }
    }
}

/// Checks snapshots against fixed thresholds.
#[derive(Debug, Clone, Default)]
pub struct AlertEvaluator {
    thresholds: AlertThresholds,
}

impl AlertEvaluator {
    pub fn new(thresholds: AlertThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &AlertThresholds {
        &self.thresholds
    }

    /// Every alert the snapshot warrants, each condition independently.
    pub fn evaluate(&self, snapshot: &MetricSnapshot) -> Vec<AlertEvent> {
        let t = &self.thresholds;
        let at = snapshot.taken_at;
        let mut alerts = Vec::new();

        if snapshot.cpu.usage > t.cpu_usage {
            alerts.push(AlertEvent {
                title: "High CPU usage".to_string(),
                message: format!("CPU usage at {:.1}% (limit {:.0}%)", snapshot.cpu.usage, t.cpu_usage),
                severity: Severity::Warning,
                raised_at: at,
            });
        }
        if snapshot.ram.usage > t.ram_usage {
            alerts.push(AlertEvent {
                title: "Memory critical".to_string(),
                message: format!("RAM usage at {:.1}% (limit {:.0}%)", snapshot.ram.usage, t.ram_usage),
                severity: Severity::Critical,
                raised_at: at,
            });
        }
        if snapshot.cpu.temperature > t.cpu_temperature {
            alerts.push(AlertEvent {
                title: "CPU temperature high".to_string(),
                message: format!(
                    "CPU at {:.1}°C (limit {:.0}°C)",
                    snapshot.cpu.temperature, t.cpu_temperature
                ),
                severity: Severity::Warning,
                raised_at: at,
            });
        }
        alerts
    }
}
