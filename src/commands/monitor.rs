//! Performance monitor command handler.
//!
//! Records a fixed number of performance samples and prints the history.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::ArgMatches;

use crate::core::Telemetry;

const POLL_STEP: Duration = Duration::from_millis(50);

/// Sleep for `duration`, waking early once `stop` is raised
fn interruptible_sleep(duration: Duration, stop: &AtomicBool) {
    let deadline = Instant::now() + duration;
    while !stop.load(Ordering::Relaxed) {
        let now = Instant::now();
        if now >= deadline {
            break;
        }
        thread::sleep(POLL_STEP.min(deadline - now));
    }
}

/// Execute the monitor command
pub fn execute(matches: &ArgMatches, telemetry: &Telemetry) -> Result<()> {
    let count = matches.get_one::<usize>("count").copied().unwrap_or(10);
    let interval = matches
        .get_one::<u64>("interval-ms")
        .map(|ms| Duration::from_millis(*ms))
        .unwrap_or_else(|| telemetry.sampling_interval());

    let stop = Arc::new(AtomicBool::new(false));
    let stop_handler = stop.clone();
    ctrlc::set_handler(move || {
        stop_handler.store(true, Ordering::Relaxed);
    })
    .map_err(|e| anyhow::anyhow!("Failed to set Ctrl+C handler: {}", e))?;

    telemetry.start_monitoring();
    for taken in 0..count {
        if stop.load(Ordering::Relaxed) {
            log::info!("Monitoring interrupted after {} sample(s)", taken);
            break;
        }
        telemetry.sample_performance();
        if taken + 1 < count {
            interruptible_sleep(interval, &stop);
        }
    }
    telemetry.stop_monitoring();

    let json = telemetry
        .performance_history_json()
        .context("Failed to encode performance history")?;
    println!("{}", json);
    Ok(())
}
