//! GPU-specific platform code.
//!
//! `lspci` tells us which display controllers exist but nothing about their
//! load. Vendor probes fill in live figures where a vendor library is
//! available (NVIDIA via NVML).

mod nvidia;

pub use nvidia::NvidiaGpuProbe;

use crate::core::system_info::GpuInfo;

/// Fills live metrics into GPUs detected by the static collector
pub trait GpuProbe: Send + Sync {
    /// Name of the backing library, for logging
    fn name(&self) -> &'static str;

    /// Enrich matching entries in place; entries the probe cannot match are left untouched
    fn enrich(&self, gpus: &mut [GpuInfo]);
}

/// Attempt to get an available GPU probe
///
/// Returns `None` when no vendor library could be loaded.
pub fn get_gpu_probe() -> Option<Box<dyn GpuProbe>> {
    match NvidiaGpuProbe::new() {
        Ok(probe) => Some(Box::new(probe)),
        Err(e) => {
            log::debug!("NVIDIA probe unavailable: {}", e);
            None
        }
    }
}
