use serde::Serialize;

use crate::core::sampling::{CpuUsage, NetRate};
use crate::ui::json::two_decimals;

// ============================================================================
// CPU
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CpuInfo {
    pub model: String,
    pub cores: u32,
    pub threads: u32,
    #[serde(serialize_with = "two_decimals")]
    pub base_frequency_ghz: f64,
    #[serde(serialize_with = "two_decimals")]
    pub current_frequency_ghz: f64,
    /// -1 when no sensor could be read
    #[serde(serialize_with = "two_decimals")]
    pub temperature_celsius: f64,
    pub cache_l1_kb: u64,
    pub cache_l2_kb: u64,
    pub cache_l3_kb: u64,
}

// ============================================================================
// Memory
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MemoryInfo {
    pub total_mb: i64,
    pub used_mb: i64,
    pub available_mb: i64,
    pub swap_total_mb: i64,
    pub swap_used_mb: i64,
    pub swap_available_mb: i64,
}

/// Raw `meminfo` figures in kB
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoryCounters {
    pub total_kb: i64,
    pub free_kb: i64,
    pub available_kb: i64,
    pub buffers_kb: i64,
    pub cached_kb: i64,
    pub swap_total_kb: i64,
    pub swap_free_kb: i64,
}

impl MemoryCounters {
    pub fn used_kb(&self) -> i64 {
        (self.total_kb - self.available_kb).max(0)
    }

    pub fn swap_used_kb(&self) -> i64 {
        (self.swap_total_kb - self.swap_free_kb).max(0)
    }

    pub fn usage_percent(&self) -> f64 {
        percent_of(self.used_kb(), self.total_kb)
    }

    pub fn swap_usage_percent(&self) -> f64 {
        percent_of(self.swap_used_kb(), self.swap_total_kb)
    }
}

fn percent_of(part: i64, whole: i64) -> f64 {
    if whole > 0 {
        part as f64 * 100.0 / whole as f64
    } else {
        0.0
    }
}

// ============================================================================
// Storage
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiskInfo {
    pub device: String,
    pub mount_point: String,
    pub total_gb: u64,
    pub used_gb: u64,
    pub available_gb: u64,
    #[serde(serialize_with = "two_decimals")]
    pub read_rate_kbps: f64,
    #[serde(serialize_with = "two_decimals")]
    pub write_rate_kbps: f64,
    pub smart_status: String,
}

/// A mounted block-device filesystem worth reporting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountEntry {
    pub device: String,
    pub mount_point: String,
    pub fs_type: String,
}

// ============================================================================
// GPU
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GpuInfo {
    pub name: String,
    pub vendor: String,
    pub driver_version: String,
    pub memory_mb: i64,
    #[serde(serialize_with = "two_decimals")]
    pub usage_percent: f64,
    /// -1 when unknown
    #[serde(serialize_with = "two_decimals")]
    pub temperature_celsius: f64,
}

impl GpuInfo {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            vendor: "Unknown".to_string(),
            driver_version: "Unknown".to_string(),
            memory_mb: 0,
            usage_percent: 0.0,
            temperature_celsius: -1.0,
        }
    }

    /// Placeholder entry reported when no display controller is found
    pub fn undetected() -> Self {
        Self::named("No GPU detected")
    }
}

// ============================================================================
// Network
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkInterface {
    pub name: String,
    pub mac_address: String,
    pub ipv4_address: String,
    pub ipv6_address: String,
    #[serde(serialize_with = "two_decimals")]
    pub rx_rate_kbps: f64,
    #[serde(serialize_with = "two_decimals")]
    pub tx_rate_kbps: f64,
    pub is_up: bool,
}

/// Descriptive fields of an interface that do not need rate sampling
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceDetails {
    pub mac_address: String,
    pub ipv4_address: String,
    pub ipv6_address: String,
    pub is_up: bool,
}

impl Default for InterfaceDetails {
    fn default() -> Self {
        Self {
            mac_address: "N/A".to_string(),
            ipv4_address: "N/A".to_string(),
            ipv6_address: "N/A".to_string(),
            is_up: true,
        }
    }
}

impl NetworkInterface {
    pub fn assemble(name: impl Into<String>, details: InterfaceDetails, rate: NetRate) -> Self {
        Self {
            name: name.into(),
            mac_address: details.mac_address,
            ipv4_address: details.ipv4_address,
            ipv6_address: details.ipv6_address,
            rx_rate_kbps: rate.rx_kbps,
            tx_rate_kbps: rate.tx_kbps,
            is_up: details.is_up,
        }
    }
}

// ============================================================================
// Drivers
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DriverInfo {
    pub name: String,
    pub version: String,
    pub description: String,
    pub is_outdated: bool,
    pub update_available: String,
}

// ============================================================================
// Summary
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemSummary {
    pub timestamp: String,
    pub cpu: CpuSummary,
    pub memory: MemorySummary,
    pub load_average: [f64; 3],
    pub filesystems: Vec<FilesystemUsage>,
    pub gpu: Vec<GpuInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub packages: Option<u64>,
    pub network: Vec<NetworkInterface>,
    pub proxy: ProxySettings,
    pub host: HostIdentity,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CpuSummary {
    pub model: String,
    pub cores: u32,
    #[serde(serialize_with = "two_decimals")]
    pub usage_percent: f64,
}

impl CpuSummary {
    pub fn new(model: String, cores: u32, usage: &CpuUsage) -> Self {
        Self {
            model,
            cores,
            usage_percent: usage.busy_percent(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemorySummary {
    pub total_kb: i64,
    pub available_kb: i64,
    pub used_kb: i64,
    #[serde(serialize_with = "two_decimals")]
    pub usage_percent: f64,
    pub free_kb: i64,
    pub buffers_kb: i64,
    pub cached_kb: i64,
    pub swap_total_kb: i64,
    pub swap_free_kb: i64,
    pub swap_used_kb: i64,
    #[serde(serialize_with = "two_decimals")]
    pub swap_usage_percent: f64,
}

impl From<MemoryCounters> for MemorySummary {
    fn from(raw: MemoryCounters) -> Self {
        Self {
            total_kb: raw.total_kb,
            available_kb: raw.available_kb,
            used_kb: raw.used_kb(),
            usage_percent: raw.usage_percent(),
            free_kb: raw.free_kb,
            buffers_kb: raw.buffers_kb,
            cached_kb: raw.cached_kb,
            swap_total_kb: raw.swap_total_kb,
            swap_free_kb: raw.swap_free_kb,
            swap_used_kb: raw.swap_used_kb(),
            swap_usage_percent: raw.swap_usage_percent(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilesystemUsage {
    pub mount: String,
    pub total_bytes: u64,
    pub available_bytes: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProxySettings {
    pub http: Option<String>,
    pub https: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostIdentity {
    pub hostname: String,
    pub kernel_version: String,
    pub os: String,
    pub uptime_secs: u64,
}

/// Outcome of updating the proxy environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProxyUpdate {
    pub ok: bool,
    pub http_proxy: String,
    pub https_proxy: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
