//! Shared rounding policy for every rating figure the service reports.
//!
//! Ties round half-up (towards positive infinity), so `4.5 -> 5` and `-2.5 -> -2`.
//! Both the overall-rating derivation and the one-decimal statistics go through here.

/// Round to the nearest integer, ties towards positive infinity.
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Round to one decimal place using the same tie rule as [`round_half_up`].
pub fn round_to_tenth(value: f64) -> f64 {
    round_half_up(value * 10.0) / 10.0
}

/// Arithmetic mean, or `None` for an empty input.
pub fn mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = values
        .into_iter()
        .fold((0.0_f64, 0_usize), |(sum, count), value| (sum + value, count + 1));

    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}
