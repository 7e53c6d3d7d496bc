use std::fs;

use crate::core::config::Config;
use crate::core::system_info::types::{MemoryCounters, MemoryInfo};

/// Parse `/proc/meminfo`; missing keys stay 0
pub fn parse_meminfo(text: &str) -> MemoryCounters {
    let mut counters = MemoryCounters::default();
    for line in text.lines() {
        let (key, rest) = match line.split_once(':') {
            Some(pair) => pair,
            None => continue,
        };
        let value: i64 = match rest.split_whitespace().next().and_then(|v| v.parse().ok()) {
            Some(v) => v,
            None => continue,
        };
        match key.trim() {
            "MemTotal" => counters.total_kb = value,
            "MemFree" => counters.free_kb = value,
            "MemAvailable" => counters.available_kb = value,
            "Buffers" => counters.buffers_kb = value,
            "Cached" => counters.cached_kb = value,
            "SwapTotal" => counters.swap_total_kb = value,
            "SwapFree" => counters.swap_free_kb = value,
            _ => {}
        }
    }
    counters
}

pub fn read_counters(config: &Config) -> MemoryCounters {
    match fs::read_to_string(config.proc_path("meminfo")) {
        Ok(text) => parse_meminfo(&text),
        Err(e) => {
            log::debug!("meminfo unavailable: {}", e);
            MemoryCounters::default()
        }
    }
}

pub fn collect(config: &Config) -> MemoryInfo {
    to_megabytes(&read_counters(config))
}

pub fn to_megabytes(raw: &MemoryCounters) -> MemoryInfo {
    MemoryInfo {
        total_mb: raw.total_kb / 1024,
        used_mb: raw.used_kb() / 1024,
        available_mb: raw.available_kb / 1024,
        swap_total_mb: raw.swap_total_kb / 1024,
        swap_used_mb: raw.swap_used_kb() / 1024,
        swap_available_mb: raw.swap_free_kb / 1024,
    }
}
