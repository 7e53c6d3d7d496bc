use std::time::Instant;

/// Source of monotonic capture instants.
///
/// Rates are derived from `Instant` differences, so wall-clock adjustments
/// never affect them. Tests substitute a manually advanced clock.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// The process monotonic clock
#[derive(Debug, Default, Clone, Copy)]
pub struct MonotonicClock;

impl Clock for MonotonicClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}
