use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::core::config::Config;
use crate::core::system_info::types::{DiskInfo, FilesystemUsage, MountEntry};
use crate::platform::fs::{filesystem_usage, FsUsage};

const EXCLUDED_FS_TYPES: &[&str] = &["tmpfs", "devtmpfs", "sysfs", "proc", "devpts"];
const GIB: u64 = 1024 * 1024 * 1024;

/// `/proc/mounts` writes whitespace in paths as octal escapes (`\040`)
fn unescape_mount_field(field: &str) -> String {
    let bytes = field.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\\' && i + 4 <= bytes.len() {
            let digits = &bytes[i + 1..i + 4];
            let code = std::str::from_utf8(digits)
                .ok()
                .and_then(|d| u8::from_str_radix(d, 8).ok());
            if let Some(code) = code {
                out.push(code);
                i += 4;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// Block-device mounts worth reporting, first occurrence of each mount point
pub fn parse_mounts(text: &str) -> Vec<MountEntry> {
    let mut seen = HashSet::new();
    let mut mounts = Vec::new();

    for line in text.lines() {
        let mut fields = line.split_whitespace();
        let (device, mount_point, fs_type) = match (fields.next(), fields.next(), fields.next()) {
            (Some(d), Some(m), Some(t)) => (d, m, t),
            _ => continue,
        };
        if !device.starts_with("/dev/") || EXCLUDED_FS_TYPES.contains(&fs_type) {
            continue;
        }
        let mount_point = unescape_mount_field(mount_point);
        if !seen.insert(mount_point.clone()) {
            continue;
        }
        mounts.push(MountEntry {
            device: device.to_string(),
            mount_point,
            fs_type: fs_type.to_string(),
        });
    }
    mounts
}

pub fn read_mounts(config: &Config) -> Vec<MountEntry> {
    match fs::read_to_string(config.proc_path("mounts")) {
        Ok(text) => parse_mounts(&text),
        Err(e) => {
            log::debug!("mount table unavailable: {}", e);
            Vec::new()
        }
    }
}

/// Mounts paired with their capacity; mounts whose `statvfs` fails are dropped
fn measured_mounts(config: &Config) -> Vec<(MountEntry, FsUsage)> {
    read_mounts(config)
        .into_iter()
        .filter_map(|mount| match filesystem_usage(Path::new(&mount.mount_point)) {
            Ok(usage) => Some((mount, usage)),
            Err(e) => {
                log::debug!("statvfs {} failed: {}", mount.mount_point, e);
                None
            }
        })
        .collect()
}

pub fn disk_from_usage(mount: &MountEntry, usage: &FsUsage) -> DiskInfo {
    DiskInfo {
        device: "Unknown".to_string(),
        mount_point: mount.mount_point.clone(),
        total_gb: usage.total_bytes / GIB,
        used_gb: usage.total_bytes.saturating_sub(usage.free_bytes) / GIB,
        available_gb: usage.available_bytes / GIB,
        read_rate_kbps: 0.0,
        write_rate_kbps: 0.0,
        smart_status: "Unknown".to_string(),
    }
}

pub fn collect(config: &Config) -> Vec<DiskInfo> {
    measured_mounts(config)
        .iter()
        .map(|(mount, usage)| disk_from_usage(mount, usage))
        .collect()
}

/// Exact byte figures for the summary
pub fn filesystems(config: &Config) -> Vec<FilesystemUsage> {
    measured_mounts(config)
        .into_iter()
        .map(|(mount, usage)| FilesystemUsage {
            mount: mount.mount_point,
            total_bytes: usage.total_bytes,
            available_bytes: usage.available_bytes,
        })
        .collect()
}
