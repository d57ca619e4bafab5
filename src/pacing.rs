//! Politeness delays between backend calls.
//!
//! The aggregator asks a [`Pacing`] strategy how long to wait before each
//! attempt. This is a courtesy towards the backend, not a retry mechanism:
//! failed requests are never re-issued.
//!
//! # Strategies
//!
//! - [`JitterPacing`]: Uniform random pause (0.15–0.35 s by default) before
//!   every attempt except the first
//! - [`NoPacing`]: No delay at all; used by tests and `--no-delay`

use rand::{Rng, rng};
use std::fmt;
use std::time::Duration;

/// Strategy deciding how long to wait before a given attempt.
pub trait Pacing {
    /// Delay to observe before attempt number `attempt` (0-based).
    fn delay(&self, attempt: usize) -> Duration;
}

/// Uniform random pause between `min` and `max`.
pub struct JitterPacing {
    min: Duration,
    max: Duration,
}

impl JitterPacing {
    pub fn new(min: Duration, max: Duration) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }
}

impl Default for JitterPacing {
    fn default() -> Self {
        Self::new(Duration::from_millis(150), Duration::from_millis(350))
    }
}

impl fmt::Debug for JitterPacing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JitterPacing")
            .field("min", &self.min)
            .field("max", &self.max)
            .finish()
    }
}

impl Pacing for JitterPacing {
    fn delay(&self, attempt: usize) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }
        let min_ms = self.min.as_millis() as u64;
        let max_ms = self.max.as_millis() as u64;
        let jitter_ms: u64 = rng().random_range(min_ms..=max_ms);
        Duration::from_millis(jitter_ms)
    }
}

/// Never waits.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPacing;

impl Pacing for NoPacing {
    fn delay(&self, _attempt: usize) -> Duration {
        Duration::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_pacing_is_zero() {
        assert_eq!(NoPacing.delay(0), Duration::ZERO);
        assert_eq!(NoPacing.delay(42), Duration::ZERO);
    }

    #[test]
    fn test_jitter_first_attempt_is_immediate() {
        assert_eq!(JitterPacing::default().delay(0), Duration::ZERO);
    }

    #[test]
    fn test_jitter_within_bounds() {
        let pacing = JitterPacing::default();
        for attempt in 1..200 {
            let d = pacing.delay(attempt);
            assert!(d >= Duration::from_millis(150), "{d:?} too short");
            assert!(d <= Duration::from_millis(350), "{d:?} too long");
        }
    }

    #[test]
    fn test_jitter_swapped_bounds() {
        let pacing = JitterPacing::new(Duration::from_millis(20), Duration::from_millis(10));
        let d = pacing.delay(3);
        assert!(d >= Duration::from_millis(10) && d <= Duration::from_millis(20));
    }
}
