use std::collections::VecDeque;
use std::time::Duration;

use serde::Serialize;

pub const DEFAULT_HISTORY_SIZE: usize = 60;

/// One point of the performance history
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PerformanceSample {
    /// UNIX seconds, fractional
    pub timestamp: f64,
    pub cpu_usage_percent: f64,
    pub memory_usage_percent: f64,
    pub disk_read_kbps: f64,
    pub disk_write_kbps: f64,
    pub network_rx_kbps: f64,
    pub network_tx_kbps: f64,
}

/// Circular buffer of performance samples plus the monitoring switch
#[derive(Debug, Clone)]
pub struct PerformanceMonitor {
    capacity: usize,
    monitoring: bool,
    sampling_interval: Duration,
    history: VecDeque<PerformanceSample>,
}

impl PerformanceMonitor {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_SIZE)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            monitoring: false,
            sampling_interval: Duration::from_secs(1),
            history: VecDeque::with_capacity(capacity),
        }
    }

    pub fn start_monitoring(&mut self) {
        if !self.monitoring {
            log::debug!("Performance monitoring started");
        }
        self.monitoring = true;
    }

    pub fn stop_monitoring(&mut self) {
        self.monitoring = false;
    }

    pub fn is_monitoring(&self) -> bool {
        self.monitoring
    }

    /// Interval between samples; zero is raised to one second
    pub fn set_sampling_interval(&mut self, seconds: u64) {
        self.sampling_interval = Duration::from_secs(seconds.max(1));
    }

    pub fn sampling_interval(&self) -> Duration {
        self.sampling_interval
    }

    pub fn record(&mut self, sample: PerformanceSample) {
        if self.history.len() >= self.capacity {
            self.history.pop_front();
        }
        self.history.push_back(sample);
    }

    /// Samples from oldest to newest
    pub fn history(&self) -> Vec<PerformanceSample> {
        self.history.iter().copied().collect()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for PerformanceMonitor {
    fn default() -> Self {
        Self::new()
    }
}
