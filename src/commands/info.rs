//! Snapshot commands: each prints one JSON document on stdout.

use std::path::Path;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::ArgMatches;

use crate::core::Telemetry;

fn print(payload: crate::error::Result<String>) -> Result<()> {
    let json = payload.context("Failed to encode result")?;
    println!("{}", json);
    Ok(())
}

fn sample_delay(matches: &ArgMatches) -> Duration {
    Duration::from_millis(matches.get_one::<u64>("sample-ms").copied().unwrap_or(0))
}

pub fn execute_summary(telemetry: &Telemetry) -> Result<()> {
    print(telemetry.summary_json())
}

pub fn execute_cpu(matches: &ArgMatches, telemetry: &Telemetry) -> Result<()> {
    if !matches.get_flag("usage") {
        return print(telemetry.cpu_info_json());
    }

    let delay = sample_delay(matches);
    if !delay.is_zero() {
        telemetry.cpu_usage();
        thread::sleep(delay);
    }
    print(telemetry.cpu_usage_json())
}

pub fn execute_network(matches: &ArgMatches, telemetry: &Telemetry) -> Result<()> {
    let delay = sample_delay(matches);
    if !delay.is_zero() {
        telemetry.network_interfaces();
        thread::sleep(delay);
    }
    print(telemetry.network_json())
}

pub fn execute_gpu(telemetry: &Telemetry) -> Result<()> {
    print(telemetry.gpu_info_json())
}

pub fn execute_memory(telemetry: &Telemetry) -> Result<()> {
    print(telemetry.memory_info_json())
}

pub fn execute_disks(telemetry: &Telemetry) -> Result<()> {
    print(telemetry.disk_info_json())
}

pub fn execute_drivers(matches: &ArgMatches, telemetry: &Telemetry) -> Result<()> {
    if let Some(path) = matches.get_one::<String>("backup") {
        telemetry
            .backup_drivers(Path::new(path))
            .with_context(|| format!("Failed to back up drivers to {}", path))?;
    }
    print(telemetry.drivers_json())
}

pub fn execute_proxy(matches: &ArgMatches, telemetry: &Telemetry) -> Result<()> {
    let http = matches.get_one::<String>("http").map(String::as_str).unwrap_or("");
    let https = matches.get_one::<String>("https").map(String::as_str).unwrap_or("");
    print(telemetry.set_proxy_json(http, https))
}
