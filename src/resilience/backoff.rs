//! Exponential backoff with jitter.

use rand::Rng;
use std::time::Duration;

/// Backoff curve parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Backoff {
    pub base: Duration,
    pub max: Duration,
    pub factor: f64,
    /// Upper bound of the jitter as a fraction of the exponential delay.
    pub jitter: f64,
}

impl Default for Backoff {
    fn default() -> Self {
        Self {
            base: Duration::from_millis(1_000),
            max: Duration::from_millis(30_000),
            factor: 2.0,
            jitter: 0.1,
        }
    }
}

impl Backoff {
    pub fn delay(&self, attempt: u32) -> Duration {
        calculate_backoff(attempt, self)
    }
}

/// Calculate the delay before retrying after `attempt` failed.
///
/// `min(base * factor^(attempt-1), max)` plus a jitter of at least 1 ms and at
/// most `jitter` times the exponential delay; the total never exceeds `max`.
pub fn calculate_backoff(attempt: u32, backoff: &Backoff) -> Duration {
    if attempt == 0 {
        return Duration::from_millis(0);
    }

    let base_ms = backoff.base.as_millis() as f64;
    let max_ms = backoff.max.as_millis() as u64;
    let exponent = attempt.saturating_sub(1).min(64) as i32;

    let exponential_ms = (base_ms * backoff.factor.powi(exponent)).min(max_ms as f64);
    let capped = exponential_ms as u64;

    let jitter_range = ((exponential_ms * backoff.jitter) as u64).max(1);
    let jitter = rand::thread_rng().gen_range(1..=jitter_range);

    Duration::from_millis(capped.saturating_add(jitter).min(max_ms))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_retry_window() {
        let backoff = Backoff::default();
        for _ in 0..200 {
            let d = calculate_backoff(1, &backoff).as_millis();
            assert!(d > 1_000 && d < 2_000, "delay {d} out of window");
        }
    }

    #[test]
    fn test_backoff_grows_then_caps() {
        let backoff = Backoff::default();
        for _ in 0..50 {
            let d1 = calculate_backoff(1, &backoff);
            let d2 = calculate_backoff(2, &backoff);
            let d3 = calculate_backoff(3, &backoff);
            assert!(d1 <= d2 && d2 <= d3);
        }

        for attempt in [6, 10, 40, u32::MAX] {
            assert!(calculate_backoff(attempt, &backoff) <= Duration::from_millis(30_000));
        }
    }

    #[test]
    fn test_zero_attempt_has_no_delay() {
        assert_eq!(calculate_backoff(0, &Backoff::default()), Duration::ZERO);
    }
}
