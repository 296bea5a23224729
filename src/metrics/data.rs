//! Data structures for simulated system metrics.

use serde::{Deserialize, Serialize};

/// A complete snapshot of simulated metrics at a point in time.
///
/// Snapshots are never edited after creation; each tick replaces the previous
/// one wholesale.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricSnapshot {
    /// CPU load and clocks
    pub cpu: CpuMetrics,
    /// Memory usage
    pub ram: RamMetrics,
    /// Primary disk usage
    pub disk: DiskMetrics,
    /// Network throughput and latency
    pub network: NetworkMetrics,
    /// When this snapshot was produced (Unix timestamp in milliseconds)
    pub taken_at: u64,
}

/// CPU statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CpuMetrics {
    /// Usage percentage (0.0 to 100.0)
    pub usage: f64,
    /// Package temperature in Celsius
    pub temperature: f64,
    /// Logical core count
    pub cores: u32,
    /// Current clock in GHz
    pub frequency: f64,
}

/// Memory statistics, sizes in GB.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RamMetrics {
    /// Usage percentage (0.0 to 100.0)
    pub usage: f64,
    pub total: f64,
    pub used: f64,
    pub free: f64,
    /// Standby/cache portion of free memory
    pub cache: f64,
}

/// Disk statistics, sizes in GB.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiskMetrics {
    /// Usage percentage (0.0 to 100.0)
    pub usage: f64,
    pub total: f64,
    pub used: f64,
    pub free: f64,
}

/// Network statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkMetrics {
    /// Upload rate in Mbps
    pub up: f64,
    /// Download rate in Mbps
    pub down: f64,
    /// Open connections
    pub connections: u32,
    /// Round-trip latency in ms
    pub ping: f64,
}

/// Changes an operation claims to have made to the metrics.
///
/// Fields irrelevant to an operation stay at zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricDelta {
    /// Memory released, in MB
    pub memory_freed_mb: f64,
    /// Disk space reclaimed, in GB
    pub disk_freed_gb: f64,
    /// Change in CPU usage percentage points (negative is a reduction)
    pub cpu_usage_change: f64,
    /// Change in ping in ms (negative is an improvement)
    pub ping_change_ms: f64,
}

impl MetricDelta {
    /// Whether the delta changes nothing.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl MetricSnapshot {
    /// Produce a new snapshot with `delta` applied.
    pub fn apply_delta(&self, delta: &MetricDelta, taken_at: u64) -> Self {
        let mut next = self.clone();
        next.taken_at = taken_at;

        if delta.memory_freed_mb > 0.0 && next.ram.total > 0.0 {
            next.ram.used = (next.ram.used - delta.memory_freed_mb / 1024.0).max(0.0);
            next.ram.free = next.ram.total - next.ram.used;
            next.ram.usage = percent(next.ram.used, next.ram.total);
        }
        if delta.disk_freed_gb > 0.0 && next.disk.total > 0.0 {
            next.disk.used = (next.disk.used - delta.disk_freed_gb).max(0.0);
            next.disk.free = next.disk.total - next.disk.used;
            next.disk.usage = percent(next.disk.used, next.disk.total);
        }
        next.cpu.usage = (next.cpu.usage + delta.cpu_usage_change).clamp(0.0, 100.0);
        next.network.ping = (next.network.ping + delta.ping_change_ms).max(1.0);
        next
    }
}

pub(crate) fn percent(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        (part / whole * 100.0).clamp(0.0, 100.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MetricSnapshot {
        MetricSnapshot {
            cpu: CpuMetrics {
                usage: 40.0,
                temperature: 55.0,
                cores: 8,
                frequency: 3.6,
            },
            ram: RamMetrics {
                usage: 50.0,
                total: 32.0,
                used: 16.0,
                free: 16.0,
                cache: 4.0,
            },
            disk: DiskMetrics {
                usage: 60.0,
                total: 1000.0,
                used: 600.0,
                free: 400.0,
            },
            network: NetworkMetrics {
                up: 10.0,
                down: 50.0,
                connections: 42,
                ping: 30.0,
            },
            taken_at: 1,
        }
    }

    #[test]
    fn test_apply_memory_delta() {
        let before = sample();
        let delta = MetricDelta {
            memory_freed_mb: 4096.0,
            ..Default::default()
        };
        let after = before.apply_delta(&delta, 2);

        assert_eq!(after.taken_at, 2);
        assert_eq!(after.ram.used, 12.0);
        assert_eq!(after.ram.free, 20.0);
        assert_eq!(after.ram.usage, 37.5);
        assert_eq!(after.disk, before.disk);
        // original untouched
        assert_eq!(before.ram.used, 16.0);
    }

    #[test]
    fn test_apply_delta_clamps() {
        let delta = MetricDelta {
            cpu_usage_change: -500.0,
            ping_change_ms: -500.0,
            ..Default::default()
        };
        let after = sample().apply_delta(&delta, 3);
        assert_eq!(after.cpu.usage, 0.0);
        assert_eq!(after.network.ping, 1.0);
    }

    #[test]
    fn test_empty_delta() {
        assert!(MetricDelta::default().is_empty());
        assert!(!MetricDelta {
            disk_freed_gb: 1.0,
            ..Default::default()
        }
        .is_empty());
    }
}
