//! Synthetic metric generation.
//!
//! Every value follows `clamp(baseline * (1 + oscillation(i) + noise), min, max)`
//! where the oscillation frequency differs per metric so the charts drift
//! visibly apart: CPU moves fastest, disk slowest.

use crate::clock::SharedClock;
use crate::metrics::data::*;
use crate::metrics::series::SeriesPoint;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

const OSCILLATION_AMPLITUDE: f64 = 0.15;
const NOISE: f64 = 0.05;

const CPU_CORES: u32 = 8;
const RAM_TOTAL_GB: f64 = 32.0;
const DISK_TOTAL_GB: f64 = 1000.0;

/// The simulated metric families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    Cpu,
    Ram,
    Disk,
    Network,
}

impl MetricKind {
    pub const ALL: [MetricKind; 4] = [
        MetricKind::Cpu,
        MetricKind::Ram,
        MetricKind::Disk,
        MetricKind::Network,
    ];

    /// Oscillation frequency in radians per tick.
    pub fn frequency(self) -> f64 {
        match self {
            MetricKind::Cpu => 0.5,
            MetricKind::Network => 0.3,
            MetricKind::Ram => 0.2,
            MetricKind::Disk => 0.05,
        }
    }

    /// Resting value the oscillation centres on.
    pub fn baseline(self) -> f64 {
        match self {
            MetricKind::Cpu => 35.0,
            MetricKind::Ram => 55.0,
            MetricKind::Disk => 62.0,
            MetricKind::Network => 45.0,
        }
    }

    /// Inclusive bounds for generated values.
    pub fn range(self) -> (f64, f64) {
        match self {
            MetricKind::Cpu => (5.0, 100.0),
            MetricKind::Ram => (20.0, 98.0),
            MetricKind::Disk => (10.0, 99.0),
            MetricKind::Network => (0.5, 1000.0),
        }
    }
}

/// Produces a fresh [`MetricSnapshot`] on every tick.
pub struct MetricSimulator {
    rng: StdRng,
    clock: SharedClock,
    tick: u64,
    high_load_ticks: u32,
}

impl MetricSimulator {
    /// Create a simulator seeded from the OS.
    pub fn new(clock: SharedClock) -> Self {
        Self::from_rng(StdRng::from_entropy(), clock)
    }

    /// Create a reproducible simulator.
    pub fn with_seed(seed: u64, clock: SharedClock) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed), clock)
    }

    fn from_rng(rng: StdRng, clock: SharedClock) -> Self {
        Self {
            rng,
            clock,
            tick: 0,
            high_load_ticks: 0,
        }
    }

    /// Number of snapshots produced so far.
    pub fn ticks(&self) -> u64 {
        self.tick
    }

    /// Pin the next `ticks` snapshots near saturation.
    pub fn simulate_high_load(&mut self, ticks: u32) {
        info!("Simulating high load for {} ticks", ticks);
        self.high_load_ticks = ticks;
    }

    /// Whether a high-load override is still pending.
    pub fn is_high_load(&self) -> bool {
        self.high_load_ticks > 0
    }

    /// Produce the next snapshot.
    pub fn tick(&mut self) -> MetricSnapshot {
        let i = self.tick as f64;
        self.tick += 1;

        let (cpu_usage, ram_usage, temperature) = if self.high_load_ticks > 0 {
            self.high_load_ticks -= 1;
            (
                self.rng.gen_range(90.0..=99.0_f64),
                self.rng.gen_range(92.0..=98.0_f64),
                self.rng.gen_range(78.0..=88.0_f64),
            )
        } else {
            let cpu = self.oscillate(MetricKind::Cpu, i);
            let ram = self.oscillate(MetricKind::Ram, i);
            let temperature = (38.0 + cpu * 0.4 + self.noise() * 20.0).clamp(30.0, 95.0);
            (cpu, ram, temperature)
        };

        let ram_used = RAM_TOTAL_GB * ram_usage / 100.0;
        let ram_free = RAM_TOTAL_GB - ram_used;

        let disk_usage = self.oscillate(MetricKind::Disk, i);
        let disk_used = DISK_TOTAL_GB * disk_usage / 100.0;

        let down = self.oscillate(MetricKind::Network, i);
        let up = (down * 0.3).max(0.1);
        let connections = (40.0 * (1.0 + OSCILLATION_AMPLITUDE * (i * 0.1).sin()) + self.noise() * 40.0)
            .round()
            .max(0.0) as u32;
        let ping = (25.0 * (1.0 + self.noise() * 4.0)).clamp(5.0, 200.0);

        let snapshot = MetricSnapshot {
            cpu: CpuMetrics {
                usage: cpu_usage,
                temperature,
                cores: CPU_CORES,
                frequency: 2.8 + cpu_usage / 100.0 * 1.6,
            },
            ram: RamMetrics {
                usage: ram_usage,
                total: RAM_TOTAL_GB,
                used: ram_used,
                free: ram_free,
                cache: ram_free * 0.3,
            },
            disk: DiskMetrics {
                usage: disk_usage,
                total: DISK_TOTAL_GB,
                used: disk_used,
                free: DISK_TOTAL_GB - disk_used,
            },
            network: NetworkMetrics {
                up,
                down,
                connections,
                ping,
            },
            taken_at: self.clock.now_millis(),
        };

        debug!(
            "Tick {}: cpu {:.1}% ram {:.1}% temp {:.1}C",
            self.tick, snapshot.cpu.usage, snapshot.ram.usage, snapshot.cpu.temperature
        );
        snapshot
    }

    /// Backward-looking history for chart seeding: one point per second,
    /// newest last, ending now. Values stay within `[min, max]`.
    ///
    /// Non-finite bounds produce an empty series.
    pub fn generate_series(&mut self, count: usize, min: f64, max: f64, kind: MetricKind) -> Vec<SeriesPoint> {
        if !min.is_finite() || !max.is_finite() {
            warn!("Rejecting series bounds [{}, {}]", min, max);
            return Vec::new();
        }
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        let mid = min / 2.0 + max / 2.0;
        let half = max / 2.0 - min / 2.0;
        let now = self.clock.now_millis();
        let frequency = kind.frequency();

        (0..count)
            .map(|i| {
                let back = (count - 1 - i) as u64 * 1_000;
                let wave = (i as f64 * frequency).sin() * 0.6;
                let jitter = self.rng.gen_range(-0.3..=0.3_f64);
                SeriesPoint {
                    timestamp: now.saturating_sub(back),
                    value: (mid + half * (wave + jitter)).clamp(min, max),
                }
            })
            .collect()
    }

    fn oscillate(&mut self, kind: MetricKind, i: f64) -> f64 {
        let (min, max) = kind.range();
        let oscillation = OSCILLATION_AMPLITUDE * (i * kind.frequency()).sin();
        (kind.baseline() * (1.0 + oscillation + self.noise())).clamp(min, max)
    }

    fn noise(&mut self) -> f64 {
        self.rng.gen_range(-NOISE..=NOISE)
    }
}
