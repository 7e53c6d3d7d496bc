use std::fs;
use std::path::Path;

use crate::core::system_info::types::DriverInfo;
use crate::error::{HostError, Result};
use crate::platform::command::CommandRunner;

fn kernel_module(name: &str) -> DriverInfo {
    DriverInfo {
        name: name.to_string(),
        version: "Unknown".to_string(),
        description: "Kernel module".to_string(),
        is_outdated: false,
        update_available: "Unknown".to_string(),
    }
}

fn no_drivers() -> DriverInfo {
    DriverInfo {
        name: "No drivers detected".to_string(),
        version: "Unknown".to_string(),
        description: "Unable to retrieve driver information".to_string(),
        is_outdated: false,
        update_available: "Unknown".to_string(),
    }
}

/// Module names from `lsmod` output, header skipped
pub fn parse_lsmod(output: &str) -> Vec<DriverInfo> {
    output
        .lines()
        .skip(1)
        .filter_map(|line| line.split_whitespace().next())
        .map(kernel_module)
        .collect()
}

pub fn collect(runner: &dyn CommandRunner) -> Vec<DriverInfo> {
    let drivers = parse_lsmod(&runner.output_or_empty("lsmod"));
    if drivers.is_empty() {
        return vec![no_drivers()];
    }
    drivers
}

/// Save the raw module list so it can be compared after an upgrade
pub fn backup_drivers(runner: &dyn CommandRunner, destination: &Path) -> Result<()> {
    let result = runner.run("lsmod")?;
    if !result.success() {
        return Err(HostError::command(format!(
            "lsmod exited with code {}",
            result.exit_code
        )));
    }
    fs::write(destination, result.output)?;
    log::info!("Driver list saved to {:?}", destination);
    Ok(())
}
