//! Exponential backoff with jitter for reconnect probes.

use std::time::Duration;
use rand::Rng;

/// Delay before probe number `attempt` (1-based) after consecutive failures.
///
/// Doubles from `base_ms` up to `max_ms`, plus up to 10% jitter.
pub fn calculate_backoff(attempt: u32, base_ms: u64, max_ms: u64) -> Duration {
    if attempt == 0 {
        return Duration::ZERO;
    }

    let factor = 2u64.saturating_pow(attempt - 1);
    let capped = base_ms.saturating_mul(factor).min(max_ms);

    let jitter_range = capped / 10;
    let jitter = if jitter_range > 0 {
        rand::thread_rng().gen_range(0..jitter_range)
    } else {
        0
    };

    Duration::from_millis(capped + jitter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_grows_and_caps() {
        assert_eq!(calculate_backoff(0, 500, 10_000), Duration::ZERO);

        let first = calculate_backoff(1, 500, 10_000).as_millis();
        assert!((500..550).contains(&first));

        let second = calculate_backoff(2, 500, 10_000).as_millis();
        assert!((1000..1100).contains(&second));

        let capped = calculate_backoff(20, 500, 10_000).as_millis();
        assert!((10_000..11_000).contains(&capped));
    }
}
