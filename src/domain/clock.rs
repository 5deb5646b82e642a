// Tick clocks that turn a time source into per-tick deltas.

use crate::domain::errors::{ClockFault, ConfigError, require_positive};
use std::time::Instant;

/// Default clamp ceiling: anything slower than 15 FPS is integrated as 1/15 s.
pub const DEFAULT_MAX_DELTA: f32 = 1.0 / 15.0;

// Port for reading a monotonic time in seconds.
pub trait TimeSource: Send {
    fn now_seconds(&self) -> f64;
}

// Port for anything that can hand the simulation its next delta.
pub trait Clock: Send {
    /// Advances the clock and returns the elapsed seconds to integrate.
    fn tick(&mut self) -> Result<f32, ClockFault>;
}

/// Wall-clock time source backed by `Instant`.
pub struct MonotonicSource {
    origin: Instant,
}

impl MonotonicSource {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for MonotonicSource {
    fn now_seconds(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

/// Measures real elapsed time between ticks and clamps it to `max_delta`.
pub struct TickClock<S> {
    source: S,
    last: f64,
    max_delta: f32,
}

impl<S: TimeSource> TickClock<S> {
    /// Starts measuring from the source's current reading.
    pub fn new(source: S, max_delta: f32) -> Result<Self, ConfigError> {
        let max_delta = require_positive("max_clock_delta", max_delta)?;
        let last = source.now_seconds();
        Ok(Self {
            source,
            last,
            max_delta,
        })
    }

    pub fn max_delta(&self) -> f32 {
        self.max_delta
    }
}

impl<S: TimeSource> Clock for TickClock<S> {
    fn tick(&mut self) -> Result<f32, ClockFault> {
        let now = self.source.now_seconds();
        if now < self.last {
            return Err(ClockFault::NonMonotonic {
                previous: self.last,
                now,
            });
        }

        let delta = now - self.last;
        if !delta.is_finite() || delta <= 0.0 {
            return Err(ClockFault::NonPositiveDelta { delta });
        }

        self.last = now;
        // Clamp long stalls so one slow frame does not teleport everything.
        Ok((delta as f32).min(self.max_delta))
    }
}

/// Constant-step clock for deterministic runs.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    step: f32,
}

impl FixedClock {
    pub fn new(step: f32) -> Result<Self, ConfigError> {
        Ok(Self {
            step: require_positive("fixed_clock_step", step)?,
        })
    }
}

impl Clock for FixedClock {
    fn tick(&mut self) -> Result<f32, ClockFault> {
        Ok(self.step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    };

    // Hand-driven time source; stores f64 bits so tests can move time freely.
    #[derive(Clone)]
    struct ManualSource(Arc<AtomicU64>);

    impl ManualSource {
        fn at(seconds: f64) -> Self {
            Self(Arc::new(AtomicU64::new(seconds.to_bits())))
        }

        fn set(&self, seconds: f64) {
            self.0.store(seconds.to_bits(), Ordering::SeqCst);
        }
    }

    impl TimeSource for ManualSource {
        fn now_seconds(&self) -> f64 {
            f64::from_bits(self.0.load(Ordering::SeqCst))
        }
    }

    #[test]
    fn when_time_advances_then_tick_returns_elapsed_seconds() {
        let source = ManualSource::at(10.0);
        let mut clock = TickClock::new(source.clone(), 0.25).expect("valid clock");

        source.set(10.05);
        let delta = clock.tick().expect("monotonic tick");
        assert!((delta - 0.05).abs() < 1e-6);
    }

    #[test]
    fn when_stall_exceeds_ceiling_then_delta_is_clamped() {
        let source = ManualSource::at(0.0);
        let mut clock = TickClock::new(source.clone(), DEFAULT_MAX_DELTA).expect("valid clock");

        source.set(2.0);
        assert_eq!(clock.tick(), Ok(DEFAULT_MAX_DELTA));
    }

    #[test]
    fn when_time_goes_backwards_then_tick_faults() {
        let source = ManualSource::at(5.0);
        let mut clock = TickClock::new(source.clone(), 0.1).expect("valid clock");

        source.set(4.0);
        assert!(matches!(
            clock.tick(),
            Err(ClockFault::NonMonotonic { .. })
        ));
    }

    #[test]
    fn when_time_stands_still_then_tick_faults() {
        let source = ManualSource::at(5.0);
        let mut clock = TickClock::new(source, 0.1).expect("valid clock");

        assert!(matches!(
            clock.tick(),
            Err(ClockFault::NonPositiveDelta { .. })
        ));
    }

    #[test]
    fn when_max_delta_is_not_positive_then_construction_fails() {
        let result = TickClock::new(ManualSource::at(0.0), 0.0);
        assert!(matches!(
            result,
            Err(ConfigError::NonPositive {
                field: "max_clock_delta",
                ..
            })
        ));
    }

    #[test]
    fn when_fixed_clock_ticks_then_step_is_constant() {
        let mut clock = FixedClock::new(1.0 / 60.0).expect("valid step");
        assert_eq!(clock.tick(), Ok(1.0 / 60.0));
        assert_eq!(clock.tick(), Ok(1.0 / 60.0));
        assert!(FixedClock::new(-1.0).is_err());
    }
}
