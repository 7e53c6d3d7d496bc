use std::time::Duration;

use serde_json::Value;

use super::fixtures::{telemetry, FixtureRunner, HostTree};

const CPUINFO: &str = "\
processor\t: 0
model name\t: Fixture CPU @ 3.00GHz
cpu MHz\t\t: 3000.000
physical id\t: 0
core id\t\t: 0

processor\t: 1
model name\t: Fixture CPU @ 3.00GHz
cpu MHz\t\t: 3000.000
physical id\t: 0
core id\t\t: 1
";

const MEMINFO: &str = "\
MemTotal:        8000000 kB
MemFree:         1000000 kB
MemAvailable:    2000000 kB
Buffers:          100000 kB
Cached:          3000000 kB
SwapTotal:       1000000 kB
SwapFree:         500000 kB
";

fn populated_tree() -> HostTree {
    let tree = HostTree::new();
    tree.write(&tree.proc(), "cpuinfo", CPUINFO);
    tree.write(&tree.proc(), "meminfo", MEMINFO);
    tree.write(&tree.proc(), "loadavg", "0.50 0.25 0.10 2/300 4242\n");
    tree.write(
        &tree.proc(),
        "mounts",
        "/dev/root / ext4 rw 0 0\nproc /proc proc rw 0 0\n/dev/root / ext4 rw 0 0\n",
    );
    tree.write_stat([100, 0, 50, 850, 0, 0, 0, 0]);
    tree.write_net_dev(&[("lo", 1, 1), ("eth0", 1_000, 2_000), ("wlan0", 0, 0)]);
    tree.write(&tree.sys(), "class/net/eth0/address", "02:42:ac:11:00:02\n");
    tree.write(&tree.sys(), "class/net/eth0/operstate", "up\n");
    tree.write(&tree.sys(), "class/net/wlan0/operstate", "down\n");
    tree
}

fn ip_runner() -> FixtureRunner {
    FixtureRunner::new()
        .respond(
            "ip -4 addr show eth0",
            0,
            "2: eth0: <UP>\n    inet 172.17.0.2/16 brd 172.17.255.255 scope global eth0\n",
        )
        .respond(
            "ip -6 addr show eth0",
            0,
            "2: eth0: <UP>\n    inet6 fe80::42:acff:fe11:2/64 scope link\n",
        )
        .respond(
            "lspci -mm",
            0,
            "00:02.0 \"VGA compatible controller\" \"Intel Corporation\" \"UHD Graphics 630\" -r02 \"\" \"\"\n",
        )
}

#[test]
fn test_network_interfaces_merge_static_fields() {
    let tree = populated_tree();
    let (telemetry, _, _) = telemetry(&tree, ip_runner());

    let interfaces = telemetry.network_interfaces();
    let names: Vec<_> = interfaces.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["eth0", "wlan0"]);

    let eth0 = &interfaces[0];
    assert_eq!(eth0.mac_address, "02:42:ac:11:00:02");
    assert_eq!(eth0.ipv4_address, "172.17.0.2");
    assert_eq!(eth0.ipv6_address, "fe80::42:acff:fe11:2");
    assert!(eth0.is_up);

    let wlan0 = &interfaces[1];
    assert_eq!(wlan0.mac_address, "N/A");
    assert_eq!(wlan0.ipv4_address, "N/A");
    assert!(!wlan0.is_up);
}

#[test]
fn test_network_json_shape() {
    let tree = populated_tree();
    let (telemetry, clock, _) = telemetry(&tree, ip_runner());
    telemetry.network_interfaces();

    clock.advance(Duration::from_millis(1000));
    tree.write_net_dev(&[("lo", 1, 1), ("eth0", 3_000, 2_500), ("wlan0", 0, 0)]);
    let json = telemetry.network_json().unwrap();

    assert!(json.starts_with(
        r#"[{"name":"eth0","mac_address":"02:42:ac:11:00:02","ipv4_address":"172.17.0.2","ipv6_address":"fe80::42:acff:fe11:2","rx_rate_kbps":2.00,"tx_rate_kbps":0.50,"is_up":true}"#
    ));
}

#[test]
fn test_summary_key_order_and_values() {
    let tree = populated_tree();
    let (telemetry, _, _) = telemetry(&tree, ip_runner());

    let json = telemetry.summary_json().unwrap();
    let value: Value = serde_json::from_str(&json).unwrap();
    let keys = [
        "timestamp",
        "cpu",
        "memory",
        "load_average",
        "filesystems",
        "gpu",
        "network",
        "proxy",
        "host",
    ];
    let positions: Vec<usize> = keys
        .iter()
        .map(|key| json.find(&format!("\"{}\":", key)).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]), "keys out of order: {}", json);
    assert!(value.get("packages").is_none());

    assert_eq!(value["cpu"]["model"], "Fixture CPU @ 3.00GHz");
    assert_eq!(value["cpu"]["cores"], 2);
    assert_eq!(value["memory"]["total_kb"], 8_000_000);
    assert_eq!(value["memory"]["used_kb"], 6_000_000);
    assert_eq!(value["memory"]["swap_used_kb"], 500_000);
    assert!(json.contains(r#""usage_percent":75.00"#));
    assert!(json.contains(r#""swap_usage_percent":50.00"#));
    assert_eq!(value["load_average"], serde_json::json!([0.5, 0.25, 0.1]));

    let filesystems = value["filesystems"].as_array().unwrap();
    assert_eq!(filesystems.len(), 1);
    assert_eq!(filesystems[0]["mount"], "/");

    assert_eq!(value["gpu"][0]["name"], "Intel Corporation UHD Graphics 630 (rev 02)");
    assert_eq!(value["network"].as_array().unwrap().len(), 2);
}

#[test]
fn test_summary_packages_on_arch() {
    let tree = populated_tree();
    tree.write(&tree.etc(), "arch-release", "");
    let runner = ip_runner().respond("pacman -Qq | wc -l", 0, "987\n");
    let (telemetry, _, _) = telemetry(&tree, runner);

    let value: Value = serde_json::from_str(&telemetry.summary_json().unwrap()).unwrap();
    assert_eq!(value["packages"], 987);
}

#[test]
fn test_static_collectors_over_fixture() {
    let tree = populated_tree();
    let (telemetry, _, _) = telemetry(&tree, ip_runner());

    let cpu = telemetry.cpu_info();
    assert_eq!(cpu.threads, 2);
    assert_eq!(cpu.cores, 2);
    assert!(telemetry
        .cpu_info_json()
        .unwrap()
        .contains(r#""current_frequency_ghz":3.00,"temperature_celsius":-1.00"#));

    let memory = telemetry.memory_info();
    assert_eq!(memory.total_mb, 7812);
    assert_eq!(memory.swap_used_mb, 488);

    let disks = telemetry.disk_info();
    assert_eq!(disks.len(), 1);
    assert_eq!(disks[0].mount_point, "/");
    assert!(telemetry
        .disk_info_json()
        .unwrap()
        .contains(r#""read_rate_kbps":0.00,"write_rate_kbps":0.00,"smart_status":"Unknown""#));
}

#[test]
fn test_missing_sources_fall_back() {
    let tree = HostTree::new();
    let (telemetry, _, _) = telemetry(&tree, FixtureRunner::new());

    assert!(telemetry.network_interfaces().is_empty());
    assert_eq!(telemetry.cpu_info().model, "Unknown CPU");
    assert_eq!(telemetry.memory_info().total_mb, 0);
    assert!(telemetry.disk_info().is_empty());
    assert_eq!(telemetry.gpu_info()[0].name, "No GPU detected");
    assert_eq!(telemetry.drivers()[0].name, "No drivers detected");

    let value: Value = serde_json::from_str(&telemetry.summary_json().unwrap()).unwrap();
    assert_eq!(value["cpu"]["model"], "unknown");
    assert_eq!(value["cpu"]["cores"], 0);
    assert_eq!(value["load_average"], serde_json::json!([0.0, 0.0, 0.0]));
}

#[test]
fn test_performance_history_json() {
    let tree = populated_tree();
    let (telemetry, clock, _) = telemetry(&tree, FixtureRunner::new());

    telemetry.start_monitoring();
    telemetry.sample_performance();
    clock.advance(Duration::from_millis(1000));
    tree.write_stat([150, 0, 100, 900, 0, 0, 0, 0]);
    tree.write_net_dev(&[("lo", 999, 999), ("eth0", 2_000, 2_000), ("wlan0", 1_000, 0)]);
    telemetry.sample_performance();
    telemetry.stop_monitoring();

    let history: Value =
        serde_json::from_str(&telemetry.performance_history_json().unwrap()).unwrap();
    let samples = history.as_array().unwrap();
    assert_eq!(samples.len(), 2);
    assert_eq!(samples[0]["cpu_usage_percent"], 0.0);
    let busy = samples[1]["cpu_usage_percent"].as_f64().unwrap();
    assert!((busy - 66.67).abs() < 0.01);
    assert_eq!(samples[1]["memory_usage_percent"], 75.0);
    assert_eq!(samples[1]["network_rx_kbps"], 2.0);
    assert_eq!(samples[1]["network_tx_kbps"], 0.0);
    assert!(samples[1]["timestamp"].as_f64().unwrap() > 1_600_000_000.0);
}
