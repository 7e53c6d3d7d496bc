//! Performance history.
//!
//! Samples are produced by `Telemetry::sample_performance` and kept in a
//! fixed-size ring while monitoring is switched on.

mod history;

pub use history::{PerformanceMonitor, PerformanceSample, DEFAULT_HISTORY_SIZE};
