//! Delta-to-rate conversion.
//!
//! A [`RateConverter`] turns successive raw counter readings of one subject
//! into a rate, carrying the previous reading in its [`SampleStore`].

use std::time::Instant;

use serde::{Deserialize, Serialize};

use super::counters::{CpuTicks, NetCounters, Reading};
use super::store::{CapturedSample, SampleStore};
use crate::ui::json::two_decimals;

/// Percentages of CPU time spent per bucket over one interval
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CpuUsage {
    #[serde(serialize_with = "two_decimals")]
    pub user_percent: f64,
    #[serde(serialize_with = "two_decimals")]
    pub system_percent: f64,
    #[serde(serialize_with = "two_decimals")]
    pub idle_percent: f64,
    #[serde(serialize_with = "two_decimals")]
    pub iowait_percent: f64,
}

impl CpuUsage {
    /// Result reported when no activity can be measured
    pub const IDLE: CpuUsage = CpuUsage {
        user_percent: 0.0,
        system_percent: 0.0,
        idle_percent: 100.0,
        iowait_percent: 0.0,
    };

    /// Share of the interval that was not idle
    pub fn busy_percent(&self) -> f64 {
        (100.0 - self.idle_percent).max(0.0)
    }
}

impl Default for CpuUsage {
    fn default() -> Self {
        Self::IDLE
    }
}

/// Network throughput over one interval.
///
/// Values are bytes per millisecond, reported under the historical
/// "kbps" label (numerically kilobytes per second).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NetRate {
    #[serde(serialize_with = "two_decimals")]
    pub rx_kbps: f64,
    #[serde(serialize_with = "two_decimals")]
    pub tx_kbps: f64,
}

impl NetRate {
    pub const ZERO: NetRate = NetRate {
        rx_kbps: 0.0,
        tx_kbps: 0.0,
    };
}

/// A raw counter sample that can be differenced into a rate
pub trait RateSample: Copy + Default + Send + 'static {
    type Rate: Copy;

    /// Rate reported on the first observation of a subject
    fn cold_start() -> Self::Rate;

    /// Rate between two captured samples of the same subject
    fn rate_between(previous: &CapturedSample<Self>, current: &CapturedSample<Self>) -> Self::Rate;
}

impl RateSample for CpuTicks {
    type Rate = CpuUsage;

    fn cold_start() -> CpuUsage {
        CpuUsage::IDLE
    }

    fn rate_between(previous: &CapturedSample<Self>, current: &CapturedSample<Self>) -> CpuUsage {
        let (prev, cur) = (&previous.sample, &current.sample);

        let deltas = (
            cur.user.checked_sub(prev.user),
            cur.nice.checked_sub(prev.nice),
            cur.system.checked_sub(prev.system),
            cur.idle.checked_sub(prev.idle),
            cur.iowait.checked_sub(prev.iowait),
            cur.irq.checked_sub(prev.irq),
            cur.softirq.checked_sub(prev.softirq),
            cur.steal.checked_sub(prev.steal),
        );

        // Any regressed bucket means a counter reset or wrap
        let (
            Some(user),
            Some(nice),
            Some(system),
            Some(idle),
            Some(iowait),
            Some(irq),
            Some(softirq),
            Some(steal),
        ) = deltas
        else {
            return CpuUsage::IDLE;
        };

        let total = user + nice + system + idle + iowait + irq + softirq + steal;
        if total == 0 {
            return CpuUsage::IDLE;
        }

        let total = total as f64;
        let idle_all = (idle + iowait) as f64;
        CpuUsage {
            user_percent: 100.0 * user as f64 / total,
            system_percent: 100.0 * system as f64 / total,
            idle_percent: 100.0 * idle_all / total,
            iowait_percent: 100.0 * iowait as f64 / total,
        }
    }
}

impl RateSample for NetCounters {
    type Rate = NetRate;

    fn cold_start() -> NetRate {
        NetRate::ZERO
    }

    fn rate_between(previous: &CapturedSample<Self>, current: &CapturedSample<Self>) -> NetRate {
        let elapsed_ms = current
            .captured_at
            .saturating_duration_since(previous.captured_at)
            .as_millis();
        if elapsed_ms == 0 {
            return NetRate::ZERO;
        }

        let rx_delta = current.sample.rx_bytes.saturating_sub(previous.sample.rx_bytes);
        let tx_delta = current.sample.tx_bytes.saturating_sub(previous.sample.tx_bytes);

        NetRate {
            rx_kbps: rx_delta as f64 / elapsed_ms as f64,
            tx_kbps: tx_delta as f64 / elapsed_ms as f64,
        }
    }
}

/// Converts readings into rates, remembering the last sample per subject.
pub struct RateConverter<S: RateSample> {
    store: SampleStore<S>,
}

impl<S: RateSample> RateConverter<S> {
    pub fn new() -> Self {
        Self {
            store: SampleStore::new(),
        }
    }

    /// Convert a new reading of `subject` captured at `captured_at`.
    ///
    /// The first observation of a subject, and any `NotFound` reading,
    /// yields the cold-start rate. The stored sample is always replaced by
    /// the new one, under the subject's lock.
    pub fn convert(&self, subject: &str, reading: Reading<S>, captured_at: Instant) -> S::Rate {
        let current = CapturedSample::new(reading.sample(), captured_at);

        self.store.with_entry(subject, |entry| {
            let rate = match (reading.is_found(), entry.as_ref()) {
                (true, Some(previous)) => S::rate_between(previous, &current),
                (found, _) => {
                    log::debug!("Cold start for subject '{}' (found: {})", subject, found);
                    S::cold_start()
                }
            };
            *entry = Some(current);
            rate
        })
    }

    pub fn store(&self) -> &SampleStore<S> {
        &self.store
    }
}

impl<S: RateSample> Default for RateConverter<S> {
    fn default() -> Self {
        Self::new()
    }
}
