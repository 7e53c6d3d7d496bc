#[cfg(feature = "nvml")]
use nvml_wrapper::{enum_wrappers::device::TemperatureSensor, Nvml};
#[cfg(feature = "nvml")]
use once_cell::sync::Lazy;

use super::GpuProbe;
use crate::core::system_info::GpuInfo;
#[cfg(not(feature = "nvml"))]
use crate::error::HostError;
use crate::error::Result;

/// Singleton - NVML must be initialized ONCE only
#[cfg(feature = "nvml")]
static NVML: Lazy<Option<Nvml>> = Lazy::new(|| match Nvml::init() {
    Ok(nvml) => Some(nvml),
    Err(e) => {
        log::debug!("Failed to init NVML: {}", e);
        None
    }
});

/// NVIDIA GPU probe using NVML
///
/// NVML devices are matched to detected GPUs by order: the n-th GPU whose
/// vendor mentions NVIDIA is NVML device n.
pub struct NvidiaGpuProbe {
    _private: (),
}

impl NvidiaGpuProbe {
    pub fn new() -> Result<Self> {
        #[cfg(feature = "nvml")]
        {
            NVML.as_ref()
                .map(|_| Self { _private: () })
                .ok_or_else(|| {
                    crate::error::HostError::other(
                        "NVML not available (NVIDIA driver not installed or incompatible)",
                    )
                })
        }
        #[cfg(not(feature = "nvml"))]
        {
            Err(HostError::other("NVIDIA GPU support not enabled"))
        }
    }
}

#[cfg_attr(not(feature = "nvml"), allow(dead_code))]
fn is_nvidia(gpu: &GpuInfo) -> bool {
    gpu.vendor.to_ascii_uppercase().contains("NVIDIA")
}

impl GpuProbe for NvidiaGpuProbe {
    fn name(&self) -> &'static str {
        "nvml"
    }

    #[cfg_attr(not(feature = "nvml"), allow(unused_variables))]
    fn enrich(&self, gpus: &mut [GpuInfo]) {
        #[cfg(feature = "nvml")]
        {
            let Some(nvml) = NVML.as_ref() else {
                return;
            };
            let driver_version = nvml.sys_driver_version().ok();

            for (index, gpu) in gpus.iter_mut().filter(|g| is_nvidia(g)).enumerate() {
                let device = match nvml.device_by_index(index as u32) {
                    Ok(device) => device,
                    Err(e) => {
                        log::debug!("No NVML device {}: {}", index, e);
                        break;
                    }
                };

                if let Some(version) = &driver_version {
                    gpu.driver_version = version.clone();
                }
                if let Ok(memory) = device.memory_info() {
                    gpu.memory_mb = (memory.total / (1024 * 1024)) as i64;
                }
                if let Ok(utilization) = device.utilization_rates() {
                    gpu.usage_percent = f64::from(utilization.gpu);
                }
                if let Ok(temperature) = device.temperature(TemperatureSensor::Gpu) {
                    gpu.temperature_celsius = f64::from(temperature);
                }
            }
        }
    }
}
