//! Pause before the single retry.

use std::time::Duration;
use rand::Rng;

/// `delay_ms` plus up to 10% jitter, so concurrent retries do not line up.
pub fn retry_delay(delay_ms: u64) -> Duration {
    let jitter_range = delay_ms / 10;
    let jitter = if jitter_range > 0 {
        rand::thread_rng().gen_range(0..=jitter_range)
    } else {
        0
    };
    Duration::from_millis(delay_ms + jitter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delay_within_jitter_band() {
        for _ in 0..50 {
            let delay = retry_delay(100).as_millis();
            assert!((100..=110).contains(&delay), "delay {delay}ms");
        }
    }

    #[test]
    fn test_small_delays_exact() {
        assert_eq!(retry_delay(0), Duration::ZERO);
        assert_eq!(retry_delay(9), Duration::from_millis(9));
    }
}
