use chrono::Utc;

use crate::core::config::Config;
use crate::core::sampling::CpuUsage;
use crate::core::system_info::types::*;
use crate::core::system_info::{cpu, memory, os, proxy, storage};
use crate::platform::command::CommandRunner;

/// Current time as `2024-05-01T12:00:00Z`
pub fn utc_timestamp() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// Installed package count from pacman; 0 when the output is not a number
pub fn package_count(runner: &dyn CommandRunner) -> u64 {
    runner
        .output_or_empty("pacman -Qq | wc -l")
        .trim()
        .parse()
        .unwrap_or_else(|_| {
            log::warn!("Could not count installed packages");
            0
        })
}

/// Sampled sections of the summary, produced by the caller
pub struct SampledSections {
    pub cpu_usage: CpuUsage,
    pub gpu: Vec<GpuInfo>,
    pub network: Vec<NetworkInterface>,
}

/// Assemble the full system summary around already-sampled sections
pub fn collect_summary(
    config: &Config,
    runner: &dyn CommandRunner,
    sampled: SampledSections,
) -> SystemSummary {
    let cpu_facts = cpu::read_cpuinfo(config);
    let model = cpu_facts
        .model
        .filter(|m| !m.trim().is_empty())
        .map(|m| m.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    let packages = if os::is_arch_based(config) {
        Some(package_count(runner))
    } else {
        None
    };

    SystemSummary {
        timestamp: utc_timestamp(),
        cpu: CpuSummary::new(model, cpu_facts.threads, &sampled.cpu_usage),
        memory: MemorySummary::from(memory::read_counters(config)),
        load_average: os::load_average(config),
        filesystems: storage::filesystems(config),
        gpu: sampled.gpu,
        packages,
        network: sampled.network,
        proxy: proxy::current(),
        host: os::collect(),
    }
}
