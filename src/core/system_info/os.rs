use std::fs;

use sysinfo::System;

use crate::core::config::Config;
use crate::core::system_info::types::HostIdentity;

pub fn collect() -> HostIdentity {
    HostIdentity {
        hostname: System::host_name().unwrap_or_else(|| "Unknown".to_string()),
        kernel_version: System::kernel_version().unwrap_or_else(|| "Unknown".to_string()),
        os: System::long_os_version()
            .or_else(System::name)
            .unwrap_or_else(|| "Unknown".to_string()),
        uptime_secs: System::uptime(),
    }
}

/// The 1, 5 and 15 minute figures from `loadavg`
pub fn parse_loadavg(text: &str) -> Option<[f64; 3]> {
    let mut fields = text.split_whitespace().map(|f| f.parse::<f64>().ok());
    Some([fields.next()??, fields.next()??, fields.next()??])
}

pub fn load_average(config: &Config) -> [f64; 3] {
    fs::read_to_string(config.proc_path("loadavg"))
        .ok()
        .and_then(|text| parse_loadavg(&text))
        .unwrap_or([0.0; 3])
}

/// `<etc>/arch-release` marks an Arch-based distribution
pub fn is_arch_based(config: &Config) -> bool {
    config.etc_path("arch-release").exists()
}
