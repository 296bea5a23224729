//! Simulated system metrics.
//!
//! Nothing here touches the real machine: snapshots and chart series are
//! produced by a seeded oscillator with noise, bounded per metric.

pub mod data;
pub mod series;
pub mod simulator;

// Re-export commonly used items
pub use data::{MetricDelta, MetricSnapshot};
pub use series::{filter_by_range, filter_by_range_tag, RangeTag, SeriesPoint};
pub use simulator::{MetricKind, MetricSimulator};
