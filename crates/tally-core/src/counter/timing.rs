//! Time calculation utilities for count-up animations

use std::time::Duration;

/// Calculate animation progress (0.0 to 1.0) from elapsed time and duration
///
/// A zero duration is treated as already complete so the ratio is never
/// computed from a zero divisor.
#[inline]
pub fn progress(elapsed: Duration, duration: Duration) -> f64 {
    if duration.is_zero() {
        return 1.0;
    }
    let ratio = elapsed.as_secs_f64() / duration.as_secs_f64();
    ratio.clamp(0.0, 1.0)
}

/// Scale an end value by eased progress, rounding down
///
/// Returns exactly `end_value` once `eased` reaches 1.
#[inline]
pub fn scaled_value(end_value: u64, eased: f64) -> u64 {
    if eased >= 1.0 {
        return end_value;
    }
    let eased = if eased.is_nan() { 0.0 } else { eased.max(0.0) };
    ((end_value as f64 * eased).floor() as u64).min(end_value)
}
