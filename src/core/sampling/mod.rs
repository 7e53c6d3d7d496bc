//! Sampling and rate-derivation engine.
//!
//! Kernel counters only ever grow, so a rate needs two observations of the
//! same subject. This module reads the counters, keeps the previous
//! observation per subject and derives percentages and throughput from the
//! difference.

mod clock;
mod counters;
mod rate;
mod store;

pub use clock::{Clock, MonotonicClock};
pub use counters::{
    cpu_ticks_from_stat, net_counters_from_dev, parse_cpu_line, parse_net_dev, read_cpu_ticks,
    read_net_counters, read_net_dev, CpuTicks, NetCounters, NetDevEntry, Reading,
};
pub use rate::{CpuUsage, NetRate, RateConverter, RateSample};
pub use store::{CapturedSample, SampleStore};

/// Subject key of the global CPU state
pub const CPU_SUBJECT: &str = "cpu";
