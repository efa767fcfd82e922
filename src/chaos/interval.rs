//! Interval / duration parsing.
//!
//! Both interval and duration strings use the same human-readable syntax
//! (`500ms`, `10s`, `5m`, `1h`, ...). An empty string always parses to
//! [`Duration::ZERO`] rather than being an error.

use std::time::Duration;

use super::error::{ChaosError, ChaosResult};

/// Parse a recurrence interval. Empty string means "one-shot" (zero).
pub fn parse_interval(s: &str) -> ChaosResult<Duration> {
    parse_human_duration(s, "interval")
}

/// Parse a command duration, enforcing `duration < interval` whenever
/// `interval` is non-zero.
pub fn parse_duration(s: &str, interval: Duration) -> ChaosResult<Duration> {
    let duration = parse_human_duration(s, "duration")?;
    if !interval.is_zero() && duration >= interval {
        return Err(ChaosError::InvalidParameter(format!(
            "duration {:?} must be shorter than interval {:?}",
            duration, interval
        )));
    }
    Ok(duration)
}

fn parse_human_duration(s: &str, field: &str) -> ChaosResult<Duration> {
    if s.is_empty() {
        return Ok(Duration::ZERO);
    }
    humantime::parse_duration(s)
        .map_err(|e| ChaosError::InvalidParameter(format!("bad {}: '{}': {}", field, s, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_interval_is_zero() {
        assert_eq!(parse_interval("").unwrap(), Duration::ZERO);
    }

    #[test]
    fn parses_units() {
        assert_eq!(parse_interval("500ms").unwrap(), Duration::from_millis(500));
        assert_eq!(parse_interval("10s").unwrap(), Duration::from_secs(10));
        assert_eq!(parse_interval("5m").unwrap(), Duration::from_secs(300));
        assert_eq!(parse_interval("1h").unwrap(), Duration::from_secs(3600));
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_interval("banana").is_err());
    }

    #[test]
    fn duration_must_be_shorter_than_interval() {
        let interval = parse_interval("10s").unwrap();
        assert!(parse_duration("10s", interval).is_err());
        assert!(parse_duration("11s", interval).is_err());
        assert!(parse_duration("9s", interval).is_ok());
    }

    #[test]
    fn duration_unconstrained_when_interval_zero() {
        assert!(parse_duration("100h", Duration::ZERO).is_ok());
    }

    #[test]
    fn empty_duration_is_zero() {
        let interval = parse_interval("10s").unwrap();
        assert_eq!(parse_duration("", interval).unwrap(), Duration::ZERO);
    }
}
