//! Output throttling for RuuviTag measurements.
//!
//! Tags advertise roughly once a second while the stove only changes over
//! minutes. The throttle limits how often a measurement line is written per
//! tag. It is keyed on the capture timestamp of each measurement, so replaying
//! a recorded stream behaves the same as a live one.

use std::collections::HashMap;
use std::time::Duration;

/// A throttle that limits the rate of output lines per source.
///
/// Each source is tracked independently, allowing at most one line per
/// `interval`. The first measurement of a source is always allowed.
#[derive(Debug)]
pub struct Throttle {
    /// Minimum time between lines for each source
    interval: Duration,
    /// Capture time of the last emitted line per source
    last_emitted: HashMap<String, i64>,
}

impl Throttle {
    /// Create a new throttle with the specified minimum interval between lines.
    ///
    /// # Example
    /// ```
    /// use std::time::Duration;
    /// use kiuas_monitor::throttle::Throttle;
    ///
    /// let mut throttle = Throttle::new(Duration::from_secs(60));
    /// assert!(throttle.should_emit("AA:BB:CC:DD:EE:FF", 0));
    /// assert!(!throttle.should_emit("AA:BB:CC:DD:EE:FF", 30));
    /// ```
    pub fn new(interval: Duration) -> Self {
        Throttle {
            interval,
            last_emitted: HashMap::new(),
        }
    }

    /// Check if a measurement captured at `captured_at` should be written.
    ///
    /// If `true` is returned the timer for this source restarts at `captured_at`.
    /// A timestamp earlier than the last emitted one (clock reset, replayed
    /// data) is allowed through and restarts the timer.
    pub fn should_emit(&mut self, source_id: &str, captured_at: i64) -> bool {
        match self.last_emitted.get(source_id) {
            Some(&last)
                if captured_at >= last
                    && Duration::from_secs(captured_at.abs_diff(last)) < self.interval =>
            {
                false
            }
            _ => {
                self.last_emitted.insert(source_id.to_string(), captured_at);
                true
            }
        }
    }
}

/// Parse a duration from a human-readable string.
///
/// Supports the suffixes `ms`, `s`, `m` and `h`. Without a suffix the value is
/// interpreted as seconds.
///
/// # Examples
/// ```
/// use kiuas_monitor::throttle::parse_duration;
/// use std::time::Duration;
///
/// assert_eq!(parse_duration("3s").unwrap(), Duration::from_secs(3));
/// assert_eq!(parse_duration("3m").unwrap(), Duration::from_secs(180));
/// assert_eq!(parse_duration("500ms").unwrap(), Duration::from_millis(500));
/// ```
pub fn parse_duration(src: &str) -> Result<Duration, String> {
    let src = src.trim();

    if src.is_empty() {
        return Err("empty duration string".to_string());
    }

    // "ms" must be tried before "m" and "s".
    const UNITS: [(&str, &str, u64); 4] = [
        ("ms", "milliseconds", 1),
        ("h", "hours", 3_600_000),
        ("m", "minutes", 60_000),
        ("s", "seconds", 1_000),
    ];

    let (num, unit, millis_per_unit) = UNITS
        .iter()
        .find_map(|&(suffix, unit, scale)| src.strip_suffix(suffix).map(|n| (n, unit, scale)))
        .unwrap_or((src, "duration", 1_000));

    let value: u64 = num
        .trim()
        .parse()
        .map_err(|_| format!("invalid {unit}: {num}"))?;

    value
        .checked_mul(millis_per_unit)
        .map(Duration::from_millis)
        .ok_or_else(|| format!("{unit} out of range: {num}"))
}
