use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use hostscope::core::sampling::{
    read_cpu_ticks, read_net_counters, CpuTicks, CpuUsage, NetCounters, NetRate, RateConverter,
    Reading, CPU_SUBJECT,
};

use super::fixtures::{telemetry, FixtureRunner, HostTree};

fn ticks(user: u64, system: u64, idle: u64, iowait: u64) -> CpuTicks {
    CpuTicks {
        user,
        system,
        idle,
        iowait,
        ..Default::default()
    }
}

fn percent_sum(usage: &CpuUsage) -> f64 {
    usage.user_percent + usage.system_percent + usage.idle_percent
}

#[test]
fn test_cold_start_ignores_sample_contents() {
    let cpu = RateConverter::<CpuTicks>::new();
    let usage = cpu.convert("cpu", Reading::Found(ticks(9_999, 9_999, 1, 0)), Instant::now());
    assert_eq!(usage, CpuUsage::IDLE);

    let net = RateConverter::<NetCounters>::new();
    let rate = net.convert(
        "eth0",
        Reading::Found(NetCounters {
            rx_bytes: u64::MAX,
            tx_bytes: 7,
        }),
        Instant::now(),
    );
    assert_eq!(rate, NetRate::ZERO);
}

#[test]
fn test_cpu_scenario_through_fixture_tree() {
    let tree = HostTree::new();
    let (telemetry, clock, _) = telemetry(&tree, FixtureRunner::new());

    tree.write_stat([100, 0, 50, 850, 0, 0, 0, 0]);
    assert_eq!(telemetry.cpu_usage(), CpuUsage::IDLE);

    clock.advance(Duration::from_millis(1000));
    tree.write_stat([150, 0, 70, 950, 0, 0, 0, 0]);
    let usage = telemetry.cpu_usage();

    // deltas: user 50, system 20, idle 100 over a total of 170
    assert!((usage.idle_percent - 58.82).abs() < 0.01);
    assert!((usage.user_percent - 29.41).abs() < 0.01);
    assert!((usage.system_percent - 11.76).abs() < 0.01);
    assert_eq!(usage.iowait_percent, 0.0);
    assert!((percent_sum(&usage) - 100.0).abs() < 1e-9);
}

#[test]
fn test_cpu_percentages_sum_to_hundred() {
    let cpu = RateConverter::<CpuTicks>::new();
    let start = Instant::now();
    let mut previous = ticks(1_000, 500, 8_000, 0);
    cpu.convert(CPU_SUBJECT, Reading::Found(previous), start);

    for step in 1..20u64 {
        let current = ticks(
            previous.user + step * 7,
            previous.system + step * 3,
            previous.idle + 100 - step,
            0,
        );
        let usage = cpu.convert(
            CPU_SUBJECT,
            Reading::Found(current),
            start + Duration::from_secs(step),
        );
        assert!((percent_sum(&usage) - 100.0).abs() < 1e-9, "step {}", step);
        previous = current;
    }
}

#[test]
fn test_network_scenario_through_fixture_tree() {
    let tree = HostTree::new();
    let (telemetry, clock, _) = telemetry(&tree, FixtureRunner::new());

    tree.write_net_dev(&[("lo", 10, 10), ("eth0", 1_000_000, 0)]);
    telemetry.network_interfaces();

    clock.advance(Duration::from_millis(500));
    tree.write_net_dev(&[("lo", 20, 20), ("eth0", 1_500_000, 0)]);
    let interfaces = telemetry.network_interfaces();

    assert_eq!(interfaces.len(), 1);
    assert_eq!(interfaces[0].rx_rate_kbps, 1000.0);
    assert_eq!(interfaces[0].tx_rate_kbps, 0.0);
}

#[test]
fn test_zero_elapsed_gives_zero_rate() {
    let tree = HostTree::new();
    let (telemetry, _clock, _) = telemetry(&tree, FixtureRunner::new());

    tree.write_net_dev(&[("eth0", 0, 0)]);
    telemetry.network_interfaces();
    tree.write_net_dev(&[("eth0", 9_000_000, 9_000_000)]);
    let interfaces = telemetry.network_interfaces();

    assert_eq!(interfaces[0].rx_rate_kbps, 0.0);
    assert_eq!(interfaces[0].tx_rate_kbps, 0.0);
}

#[test]
fn test_unknown_interface_is_cold_start_and_stores_zero() {
    let tree = HostTree::new();
    tree.write_net_dev(&[("eth0", 5, 5)]);

    let reading = read_net_counters(&tree.proc(), "wlan9");
    assert!(!reading.is_found());

    let net = RateConverter::<NetCounters>::new();
    let rate = net.convert("wlan9", reading, Instant::now());
    assert_eq!(rate, NetRate::ZERO);
    let stored = net.store().latest("wlan9").unwrap();
    assert_eq!(stored.sample, NetCounters::default());
}

#[test]
fn test_reader_is_idempotent_on_fixed_fixture() {
    let tree = HostTree::new();
    tree.write_stat([1, 2, 3, 4, 5, 6, 7, 8]);
    tree.write_net_dev(&[("eth0", 42, 24)]);

    assert_eq!(read_cpu_ticks(&tree.proc()), read_cpu_ticks(&tree.proc()));
    assert_eq!(
        read_net_counters(&tree.proc(), "eth0"),
        read_net_counters(&tree.proc(), "eth0")
    );
}

#[test]
fn test_store_holds_last_sample_after_every_convert() {
    let cpu = RateConverter::<CpuTicks>::new();
    let start = Instant::now();
    let samples = [
        Reading::Found(ticks(10, 10, 10, 0)),
        Reading::Found(ticks(5, 5, 5, 0)),
        Reading::NotFound,
        Reading::Found(ticks(20, 20, 20, 0)),
    ];

    for (i, reading) in samples.into_iter().enumerate() {
        let at = start + Duration::from_millis(i as u64 * 100);
        cpu.convert(CPU_SUBJECT, reading, at);
        let stored = cpu.store().latest(CPU_SUBJECT).unwrap();
        assert_eq!(stored.sample, reading.sample());
        assert_eq!(stored.captured_at, at);
    }
}

#[test]
fn test_concurrent_observers_of_one_subject() {
    let net = Arc::new(RateConverter::<NetCounters>::new());
    let start = Instant::now();

    let handles: Vec<_> = (0..8u64)
        .map(|worker| {
            let net = net.clone();
            thread::spawn(move || {
                for i in 0..250u64 {
                    let n = worker * 1_000 + i;
                    let counters = NetCounters {
                        rx_bytes: n,
                        tx_bytes: n,
                    };
                    let rate = net.convert(
                        "eth0",
                        Reading::Found(counters),
                        start + Duration::from_millis(n),
                    );
                    assert!(rate.rx_kbps.is_finite() && rate.rx_kbps >= 0.0);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(net.store().len(), 1);
    let stored = net.store().latest("eth0").unwrap();
    assert_eq!(stored.sample.rx_bytes, stored.sample.tx_bytes);

    // the last convert overall is the final iteration of some worker, stored whole
    let last_values: Vec<u64> = (0..8u64).map(|worker| worker * 1_000 + 249).collect();
    assert!(
        last_values.contains(&stored.sample.rx_bytes),
        "stored {} is not a final write",
        stored.sample.rx_bytes
    );
    assert_eq!(
        stored.captured_at,
        start + Duration::from_millis(stored.sample.rx_bytes)
    );
}

#[test]
fn test_sequential_writes_are_never_lost() {
    let net = RateConverter::<NetCounters>::new();
    let start = Instant::now();

    for n in 0..100u64 {
        let counters = NetCounters {
            rx_bytes: n * 1_000,
            tx_bytes: 0,
        };
        let rate = net.convert("eth0", Reading::Found(counters), start + Duration::from_millis(n));
        if n > 0 {
            // each delta is measured against the write just before it
            assert_eq!(rate.rx_kbps, 1000.0, "step {}", n);
        }
    }
    assert_eq!(net.store().latest("eth0").unwrap().sample.rx_bytes, 99_000);
}

#[test]
fn test_found_after_not_found_measures_from_zero() {
    let net = RateConverter::<NetCounters>::new();
    let start = Instant::now();
    let counters = NetCounters {
        rx_bytes: 10_000_001,
        tx_bytes: 0,
    };

    net.convert("eth0", Reading::Found(counters), start);
    net.convert("eth0", Reading::NotFound, start + Duration::from_millis(1));
    let rate = net.convert("eth0", Reading::Found(counters), start + Duration::from_millis(2));
    assert_eq!(rate.rx_kbps, 10_000_001.0);

    let steady = net.convert("eth0", Reading::Found(counters), start + Duration::from_millis(3));
    assert_eq!(steady, NetRate::ZERO);
}
