use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::core::config::Config;
use crate::core::system_info::types::CpuInfo;
use crate::platform::fs::read_trimmed;

/// Facts extracted from `/proc/cpuinfo`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CpuinfoFacts {
    pub model: Option<String>,
    /// Number of `processor` entries
    pub threads: u32,
    /// Distinct (physical id, core id) pairs, 0 when topology is absent
    pub topology_cores: u32,
    pub current_mhz: Option<f64>,
}

impl CpuinfoFacts {
    pub fn cores(&self) -> u32 {
        if self.topology_cores > 0 {
            self.topology_cores
        } else {
            self.threads
        }
    }
}

fn value_of(line: &str) -> Option<&str> {
    line.split_once(':').map(|(_, v)| v.trim())
}

pub fn parse_cpuinfo(text: &str) -> CpuinfoFacts {
    let mut facts = CpuinfoFacts::default();
    let mut pairs = HashSet::new();
    let mut physical_id: Option<String> = None;

    for line in text.lines() {
        let key = match line.split_once(':') {
            Some((k, _)) => k.trim(),
            None => continue,
        };
        match key {
            "processor" => {
                facts.threads += 1;
                physical_id = None;
            }
            "model name" if facts.model.is_none() => {
                facts.model = value_of(line)
                    .filter(|v| !v.is_empty())
                    .map(str::to_string);
            }
            "cpu MHz" if facts.current_mhz.is_none() => {
                facts.current_mhz = value_of(line).and_then(|v| v.parse().ok());
            }
            "physical id" => physical_id = value_of(line).map(str::to_string),
            "core id" => {
                if let Some(core) = value_of(line) {
                    let package = physical_id.clone().unwrap_or_default();
                    pairs.insert((package, core.to_string()));
                }
            }
            _ => {}
        }
    }

    facts.topology_cores = pairs.len() as u32;
    facts
}

/// Read and parse `<proc>/cpuinfo`; an unreadable file gives empty facts
pub fn read_cpuinfo(config: &Config) -> CpuinfoFacts {
    fs::read_to_string(config.proc_path("cpuinfo"))
        .map(|text| parse_cpuinfo(&text))
        .unwrap_or_default()
}

pub fn collect(config: &Config) -> CpuInfo {
    let facts = read_cpuinfo(config);
    let (l1, l2, l3) = read_cache_sizes(&config.sys_path("devices/system/cpu/cpu0/cache"));

    CpuInfo {
        model: facts
            .model
            .clone()
            .unwrap_or_else(|| "Unknown CPU".to_string()),
        cores: facts.cores(),
        threads: facts.threads,
        base_frequency_ghz: read_base_frequency_ghz(config).unwrap_or(0.0),
        current_frequency_ghz: facts.current_mhz.map(|mhz| mhz / 1000.0).unwrap_or(0.0),
        temperature_celsius: read_temperature(config).unwrap_or(-1.0),
        cache_l1_kb: l1,
        cache_l2_kb: l2,
        cache_l3_kb: l3,
    }
}

fn read_base_frequency_ghz(config: &Config) -> Option<f64> {
    let path = config.sys_path("devices/system/cpu/cpu0/cpufreq/base_frequency");
    let khz: f64 = read_trimmed(&path)?.parse().ok()?;
    Some(khz / 1_000_000.0)
}

/// First readable `hwmonN/temp1_input`, in degrees Celsius
fn read_temperature(config: &Config) -> Option<f64> {
    (0..config.hwmon_probe_count).find_map(|i| {
        let path = config.sys_path(&format!("class/hwmon/hwmon{}/temp1_input", i));
        let millidegrees: f64 = read_trimmed(&path)?.parse().ok()?;
        Some(millidegrees / 1000.0)
    })
}

/// Parse a sysfs cache size such as `32K` or `8M` into kB
fn parse_cache_size(raw: &str) -> Option<u64> {
    let raw = raw.trim();
    if let Some(kb) = raw.strip_suffix('K') {
        kb.parse().ok()
    } else if let Some(mb) = raw.strip_suffix('M') {
        mb.parse::<u64>().ok().map(|v| v * 1024)
    } else {
        raw.parse().ok()
    }
}

/// Sum cache sizes per level; L1 data and instruction caches add up
fn read_cache_sizes(cache_dir: &Path) -> (u64, u64, u64) {
    let mut sizes = (0, 0, 0);
    let entries = match fs::read_dir(cache_dir) {
        Ok(entries) => entries,
        Err(_) => return sizes,
    };

    for entry in entries.flatten() {
        let dir = entry.path();
        let is_index = dir
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with("index"));
        if !is_index {
            continue;
        }
        let level = read_trimmed(&dir.join("level")).and_then(|l| l.parse::<u8>().ok());
        let size = read_trimmed(&dir.join("size")).and_then(|s| parse_cache_size(&s));
        match (level, size) {
            (Some(1), Some(kb)) => sizes.0 += kb,
            (Some(2), Some(kb)) => sizes.1 += kb,
            (Some(3), Some(kb)) => sizes.2 += kb,
            _ => {}
        }
    }
    sizes
}
