use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV: &str = "HOSTSCOPE_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Mount point of procfs
    pub proc_root: PathBuf,
    /// Mount point of sysfs
    pub sys_root: PathBuf,
    /// Directory holding distribution release files
    pub etc_root: PathBuf,
    /// Number of performance samples kept in memory
    pub history_capacity: usize,
    pub sampling_interval_secs: u64,
    /// How many `hwmonN` entries are probed for a CPU temperature
    pub hwmon_probe_count: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            proc_root: PathBuf::from("/proc"),
            sys_root: PathBuf::from("/sys"),
            etc_root: PathBuf::from("/etc"),
            history_capacity: 60,
            sampling_interval_secs: 1,
            hwmon_probe_count: 10,
        }
    }
}

impl Config {
    /// Load the configuration, falling back to defaults.
    ///
    /// A missing file is not an error. An unreadable or corrupted one is
    /// logged and replaced by the defaults.
    pub fn load() -> Result<Self> {
        let config_path = Self::resolve_path(std::env::var_os(CONFIG_ENV))?;
        Ok(Self::load_from(&config_path))
    }

    /// The explicit path when one is given, else the per-user default
    pub fn resolve_path(explicit: Option<OsString>) -> Result<PathBuf> {
        match explicit {
            Some(path) => Ok(PathBuf::from(path)),
            None => Self::get_config_path(),
        }
    }

    /// Load from an explicit path
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Config::default();
        }
        match Self::read(path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Ignoring config file {:?}: {:#}", path, e);
                Config::default()
            }
        }
    }

    fn read(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        if data.trim().is_empty() {
            return Ok(Config::default());
        }
        serde_json::from_str(&data)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }
        let data = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, data).with_context(|| format!("Failed to write config file: {:?}", path))?;
        Ok(())
    }

    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir =
            dirs::config_dir().with_context(|| "Could not determine config directory")?;

        Ok(config_dir.join("hostscope").join("config.json"))
    }

    /// Config rooted at fixture directories (tests, containers with bind mounts)
    pub fn with_roots(
        proc_root: impl Into<PathBuf>,
        sys_root: impl Into<PathBuf>,
        etc_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            proc_root: proc_root.into(),
            sys_root: sys_root.into(),
            etc_root: etc_root.into(),
            ..Default::default()
        }
    }

    pub fn proc_path(&self, relative: &str) -> PathBuf {
        self.proc_root.join(relative)
    }

    pub fn sys_path(&self, relative: &str) -> PathBuf {
        self.sys_root.join(relative)
    }

    pub fn etc_path(&self, relative: &str) -> PathBuf {
        self.etc_root.join(relative)
    }
}
