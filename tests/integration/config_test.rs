use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use hostscope::core::config::Config;
use tempfile::TempDir;

use super::fixtures::{telemetry_with, FixtureRunner, HostTree};

#[test]
fn test_config_default() {
    let config = Config::default();
    assert_eq!(config.proc_root, PathBuf::from("/proc"));
    assert_eq!(config.sys_root, PathBuf::from("/sys"));
    assert_eq!(config.etc_root, PathBuf::from("/etc"));
    assert_eq!(config.history_capacity, 60);
    assert_eq!(config.sampling_interval_secs, 1);
    assert_eq!(config.hwmon_probe_count, 10);
}

#[test]
fn test_config_load_from_explicit_path() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("hostscope.json");
    fs::write(&path, r#"{"proc_root":"/host/proc","sampling_interval_secs":5}"#).unwrap();

    let resolved = Config::resolve_path(Some(path.clone().into_os_string())).unwrap();
    assert_eq!(resolved, path);

    let config = Config::load_from(&resolved);
    assert_eq!(config.proc_root, PathBuf::from("/host/proc"));
    assert_eq!(config.sampling_interval_secs, 5);
    assert_eq!(config.history_capacity, 60);
}

#[test]
fn test_config_drives_telemetry() {
    let tree = HostTree::new();
    let config = Config {
        history_capacity: 2,
        sampling_interval_secs: 3,
        ..tree.config()
    };
    let (telemetry, _, _) = telemetry_with(config, FixtureRunner::new());

    assert_eq!(telemetry.sampling_interval(), Duration::from_secs(3));
    telemetry.start_monitoring();
    for _ in 0..3 {
        telemetry.sample_performance();
    }
    assert_eq!(telemetry.performance_history().len(), 2);
}

#[test]
fn test_config_path_under_config_dir() {
    if let Ok(path) = Config::get_config_path() {
        assert!(path.ends_with("hostscope/config.json"));
        assert_eq!(Config::resolve_path(None).unwrap(), path);
    }
}
