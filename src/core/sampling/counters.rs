//! Raw counter readers for `/proc/stat` and `/proc/net/dev`.
//!
//! Readers never fail: a missing file, a missing subject or a malformed line
//! all produce [`Reading::NotFound`], which the converter treats as a cold
//! start.

use std::fs;
use std::path::Path;

/// Outcome of one raw counter read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reading<T> {
    Found(T),
    NotFound,
}

impl<T: Copy + Default> Reading<T> {
    /// The observed sample, or the all-zero sample when nothing was found
    pub fn sample(&self) -> T {
        match self {
            Reading::Found(sample) => *sample,
            Reading::NotFound => T::default(),
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Reading::Found(_))
    }
}

impl<T> From<Option<T>> for Reading<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(sample) => Reading::Found(sample),
            None => Reading::NotFound,
        }
    }
}

/// Cumulative CPU tick buckets from the aggregate `cpu` line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CpuTicks {
    pub user: u64,
    pub nice: u64,
    pub system: u64,
    pub idle: u64,
    pub iowait: u64,
    pub irq: u64,
    pub softirq: u64,
    pub steal: u64,
}

impl CpuTicks {
    pub fn total(&self) -> u64 {
        [
            self.user,
            self.nice,
            self.system,
            self.idle,
            self.iowait,
            self.irq,
            self.softirq,
            self.steal,
        ]
        .iter()
        .fold(0u64, |acc, v| acc.saturating_add(*v))
    }

    /// Idle time including time spent waiting on I/O
    pub fn idle_all(&self) -> u64 {
        self.idle.saturating_add(self.iowait)
    }
}

/// Cumulative byte counters of one network interface
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NetCounters {
    pub rx_bytes: u64,
    pub tx_bytes: u64,
}

impl NetCounters {
    pub fn saturating_add(self, other: NetCounters) -> NetCounters {
        NetCounters {
            rx_bytes: self.rx_bytes.saturating_add(other.rx_bytes),
            tx_bytes: self.tx_bytes.saturating_add(other.tx_bytes),
        }
    }
}

/// One interface line of `/proc/net/dev`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetDevEntry {
    pub name: String,
    pub counters: Reading<NetCounters>,
}

/// Parse the aggregate CPU line (`cpu  user nice system idle ...`).
///
/// Per-core lines (`cpu0`, `cpu1`, ...) are rejected. At least eight
/// counters must parse; trailing guest columns are ignored.
pub fn parse_cpu_line(line: &str) -> Option<CpuTicks> {
    let mut fields = line.split_whitespace();
    if fields.next()? != "cpu" {
        return None;
    }

    let mut values = [0u64; 8];
    for slot in values.iter_mut() {
        *slot = fields.next()?.parse().ok()?;
    }

    let [user, nice, system, idle, iowait, irq, softirq, steal] = values;
    Some(CpuTicks {
        user,
        nice,
        system,
        idle,
        iowait,
        irq,
        softirq,
        steal,
    })
}

/// Read the aggregate CPU ticks from the first line of a `stat` document
pub fn cpu_ticks_from_stat(content: &str) -> Reading<CpuTicks> {
    content.lines().next().and_then(parse_cpu_line).into()
}

/// Parse every interface listed in a `net/dev` document, in listing order.
pub fn parse_net_dev(content: &str) -> Vec<NetDevEntry> {
    content
        .lines()
        .skip(2)
        .filter_map(|line| {
            let (name, rest) = line.split_once(':')?;
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            Some(NetDevEntry {
                name: name.to_string(),
                counters: parse_net_columns(rest).into(),
            })
        })
        .collect()
}

/// Columns 1 and 9 after the colon are cumulative rx and tx bytes.
fn parse_net_columns(columns: &str) -> Option<NetCounters> {
    let fields: Vec<&str> = columns.split_whitespace().collect();
    if fields.len() < 9 {
        return None;
    }
    Some(NetCounters {
        rx_bytes: fields[0].parse().ok()?,
        tx_bytes: fields[8].parse().ok()?,
    })
}

/// Look up one interface's counters in a `net/dev` document
pub fn net_counters_from_dev(content: &str, interface: &str) -> Reading<NetCounters> {
    parse_net_dev(content)
        .into_iter()
        .find(|entry| entry.name == interface)
        .map(|entry| entry.counters)
        .unwrap_or(Reading::NotFound)
}

/// Read the aggregate CPU ticks from `<proc_root>/stat`
pub fn read_cpu_ticks(proc_root: &Path) -> Reading<CpuTicks> {
    let path = proc_root.join("stat");
    match fs::read_to_string(&path) {
        Ok(content) => cpu_ticks_from_stat(&content),
        Err(e) => {
            log::debug!("Cannot read {:?}: {}", path, e);
            Reading::NotFound
        }
    }
}

/// Read the interface table from `<proc_root>/net/dev`.
///
/// An unreadable file yields an empty table.
pub fn read_net_dev(proc_root: &Path) -> Vec<NetDevEntry> {
    let path = proc_root.join("net").join("dev");
    match fs::read_to_string(&path) {
        Ok(content) => parse_net_dev(&content),
        Err(e) => {
            log::debug!("Cannot read {:?}: {}", path, e);
            Vec::new()
        }
    }
}

/// Read one interface's counters from `<proc_root>/net/dev`
pub fn read_net_counters(proc_root: &Path, interface: &str) -> Reading<NetCounters> {
    read_net_dev(proc_root)
        .into_iter()
        .find(|entry| entry.name == interface)
        .map(|entry| entry.counters)
        .unwrap_or(Reading::NotFound)
}
