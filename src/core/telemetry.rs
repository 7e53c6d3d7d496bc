//! Snapshot assembly.
//!
//! [`Telemetry`] owns everything a snapshot needs: configuration, the shell
//! capability, the clock and one rate converter per counter kind. Every
//! sampled call updates the converters, so the next call measures the
//! interval since this one.

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use parking_lot::Mutex;

use crate::core::config::Config;
use crate::core::sampling::{
    read_cpu_ticks, read_net_dev, Clock, CpuTicks, CpuUsage, MonotonicClock, NetCounters,
    RateConverter, Reading, CPU_SUBJECT,
};
use crate::core::system_info::{
    self, cpu, drivers, gpu, memory, network, proxy, storage, CpuInfo, DiskInfo, DriverInfo,
    GpuInfo, MemoryInfo, NetworkInterface, ProxyUpdate, SampledSections, SystemSummary,
};
use crate::core::system_monitor::{PerformanceMonitor, PerformanceSample};
use crate::error::Result;
use crate::platform::command::{CommandRunner, ShellRunner};
use crate::platform::gpu::{get_gpu_probe, GpuProbe};
use crate::ui::json::to_json;

/// Subject of the summary's aggregate CPU usage
pub const SUMMARY_CPU_SUBJECT: &str = "summary.cpu";
/// Subjects used by the performance sampler
pub const PERFORMANCE_CPU_SUBJECT: &str = "performance.cpu";
pub const PERFORMANCE_NETWORK_SUBJECT: &str = "performance.network";

const LOOPBACK: &str = "lo";

pub struct Telemetry {
    config: Config,
    runner: Arc<dyn CommandRunner>,
    clock: Arc<dyn Clock>,
    cpu_rates: RateConverter<CpuTicks>,
    net_rates: RateConverter<NetCounters>,
    gpu_probe: Option<Box<dyn GpuProbe>>,
    performance: Mutex<PerformanceMonitor>,
}

impl Telemetry {
    /// Telemetry backed by the real shell, the monotonic clock and any
    /// vendor GPU library present on the host
    pub fn new(config: Config) -> Self {
        let mut telemetry =
            Self::with_parts(config, Arc::new(ShellRunner), Arc::new(MonotonicClock));
        telemetry.gpu_probe = get_gpu_probe();
        telemetry
    }

    /// Telemetry over explicit capabilities, without GPU enrichment
    pub fn with_parts(
        config: Config,
        runner: Arc<dyn CommandRunner>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let mut monitor = PerformanceMonitor::with_capacity(config.history_capacity);
        monitor.set_sampling_interval(config.sampling_interval_secs);

        Self {
            config,
            runner,
            clock,
            cpu_rates: RateConverter::new(),
            net_rates: RateConverter::new(),
            gpu_probe: None,
            performance: Mutex::new(monitor),
        }
    }

    pub fn with_gpu_probe(mut self, probe: Box<dyn GpuProbe>) -> Self {
        self.gpu_probe = Some(probe);
        self
    }

    // ------------------------------------------------------------------
    // Sampled values
    // ------------------------------------------------------------------

    /// CPU usage since the previous call
    pub fn cpu_usage(&self) -> CpuUsage {
        self.cpu_usage_for(CPU_SUBJECT)
    }

    fn cpu_usage_for(&self, subject: &str) -> CpuUsage {
        let reading = read_cpu_ticks(&self.config.proc_root);
        self.cpu_rates.convert(subject, reading, self.clock.now())
    }

    /// Every interface except loopback, in `/proc/net/dev` order, with rates
    /// since the previous call
    pub fn network_interfaces(&self) -> Vec<NetworkInterface> {
        let entries = read_net_dev(&self.config.proc_root);
        let captured_at = self.clock.now();

        entries
            .into_iter()
            .filter(|entry| entry.name != LOOPBACK)
            .map(|entry| {
                let rate = self.net_rates.convert(&entry.name, entry.counters, captured_at);
                let details = network::details(&self.config, self.runner.as_ref(), &entry.name);
                NetworkInterface::assemble(entry.name, details, rate)
            })
            .collect()
    }

    // ------------------------------------------------------------------
    // Static collectors
    // ------------------------------------------------------------------

    pub fn cpu_info(&self) -> CpuInfo {
        cpu::collect(&self.config)
    }

    pub fn memory_info(&self) -> MemoryInfo {
        memory::collect(&self.config)
    }

    pub fn disk_info(&self) -> Vec<DiskInfo> {
        storage::collect(&self.config)
    }

    pub fn gpu_info(&self) -> Vec<GpuInfo> {
        gpu::collect(self.runner.as_ref(), self.gpu_probe.as_deref())
    }

    pub fn drivers(&self) -> Vec<DriverInfo> {
        drivers::collect(self.runner.as_ref())
    }

    pub fn backup_drivers(&self, destination: &Path) -> Result<()> {
        drivers::backup_drivers(self.runner.as_ref(), destination)
    }

    pub fn summary(&self) -> SystemSummary {
        let sampled = SampledSections {
            cpu_usage: self.cpu_usage_for(SUMMARY_CPU_SUBJECT),
            gpu: self.gpu_info(),
            network: self.network_interfaces(),
        };
        system_info::collect_summary(&self.config, self.runner.as_ref(), sampled)
    }

    pub fn set_proxy(&self, http: &str, https: &str) -> ProxyUpdate {
        proxy::set_proxy(http, https)
    }

    // ------------------------------------------------------------------
    // Performance history
    // ------------------------------------------------------------------

    /// Summed counters of every non-loopback interface
    fn aggregate_network_reading(&self) -> Reading<NetCounters> {
        let entries = read_net_dev(&self.config.proc_root);
        if entries.is_empty() {
            return Reading::NotFound;
        }
        let total = entries
            .iter()
            .filter(|entry| entry.name != LOOPBACK)
            .filter_map(|entry| match entry.counters {
                Reading::Found(counters) => Some(counters),
                Reading::NotFound => None,
            })
            .fold(NetCounters::default(), NetCounters::saturating_add);
        Reading::Found(total)
    }

    /// Take one performance sample, recording it while monitoring is on
    pub fn sample_performance(&self) -> PerformanceSample {
        let captured_at = self.clock.now();
        let cpu = self.cpu_rates.convert(
            PERFORMANCE_CPU_SUBJECT,
            read_cpu_ticks(&self.config.proc_root),
            captured_at,
        );
        let net = self.net_rates.convert(
            PERFORMANCE_NETWORK_SUBJECT,
            self.aggregate_network_reading(),
            captured_at,
        );
        let memory = memory::read_counters(&self.config);

        let sample = PerformanceSample {
            timestamp: Utc::now().timestamp_micros() as f64 / 1_000_000.0,
            cpu_usage_percent: cpu.busy_percent(),
            memory_usage_percent: memory.usage_percent(),
            disk_read_kbps: 0.0,
            disk_write_kbps: 0.0,
            network_rx_kbps: net.rx_kbps,
            network_tx_kbps: net.tx_kbps,
        };

        let mut monitor = self.performance.lock();
        if monitor.is_monitoring() {
            monitor.record(sample);
        }
        sample
    }

    pub fn start_monitoring(&self) {
        self.performance.lock().start_monitoring();
    }

    pub fn stop_monitoring(&self) {
        self.performance.lock().stop_monitoring();
    }

    pub fn is_monitoring(&self) -> bool {
        self.performance.lock().is_monitoring()
    }

    pub fn set_sampling_interval(&self, seconds: u64) {
        self.performance.lock().set_sampling_interval(seconds);
    }

    pub fn sampling_interval(&self) -> std::time::Duration {
        self.performance.lock().sampling_interval()
    }

    pub fn performance_history(&self) -> Vec<PerformanceSample> {
        self.performance.lock().history()
    }

    // ------------------------------------------------------------------
    // JSON payloads
    // ------------------------------------------------------------------

    pub fn summary_json(&self) -> Result<String> {
        to_json(&self.summary())
    }

    pub fn cpu_info_json(&self) -> Result<String> {
        to_json(&self.cpu_info())
    }

    pub fn cpu_usage_json(&self) -> Result<String> {
        to_json(&self.cpu_usage())
    }

    pub fn gpu_info_json(&self) -> Result<String> {
        to_json(&self.gpu_info())
    }

    pub fn memory_info_json(&self) -> Result<String> {
        to_json(&self.memory_info())
    }

    pub fn disk_info_json(&self) -> Result<String> {
        to_json(&self.disk_info())
    }

    pub fn network_json(&self) -> Result<String> {
        to_json(&self.network_interfaces())
    }

    pub fn drivers_json(&self) -> Result<String> {
        to_json(&self.drivers())
    }

    pub fn performance_history_json(&self) -> Result<String> {
        to_json(&self.performance_history())
    }

    pub fn set_proxy_json(&self, http: &str, https: &str) -> Result<String> {
        to_json(&self.set_proxy(http, https))
    }
}
