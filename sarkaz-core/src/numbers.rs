//! Numeric conversion helpers centralizing safe numeric casts.

use num_traits::cast::cast;

/// Convert a count to f64 while allowing precision loss in a single location.
#[must_use]
pub fn count_to_f64(value: usize) -> f64 {
    cast::<usize, f64>(value).unwrap_or(0.0)
}

/// Round a score to two decimals for display, returning 0.0 for non-finite values.
///
/// Scoring arithmetic never goes through this; it only tames values such as
/// `7.199999999999999` before they are shown.
#[must_use]
pub fn round_for_display(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let rounded = (value * 100.0).round() / 100.0;
    // Avoid rendering "-0".
    if rounded == 0.0 { 0.0 } else { rounded }
}

/// Format a score the way the settlement panel shows it: no trailing zeros.
#[must_use]
pub fn format_score(value: f64) -> String {
    let rounded = round_for_display(value);
    let text = format!("{rounded:.2}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    text.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_rounding_handles_float_noise() {
        assert!((round_for_display(20.0 * 1.2 * 0.3) - 7.2).abs() < f64::EPSILON);
        assert!((round_for_display(f64::NAN) - 0.0).abs() < f64::EPSILON);
        assert!(round_for_display(-0.001).is_sign_positive());
    }

    #[test]
    fn format_trims_trailing_zeros() {
        assert_eq!(format_score(24.0), "24");
        assert_eq!(format_score(7.199_999_999_999_999), "7.2");
        assert_eq!(format_score(-120.0), "-120");
        assert_eq!(format_score(12.25), "12.25");
    }

    #[test]
    fn counts_convert() {
        assert!((count_to_f64(4) - 4.0).abs() < f64::EPSILON);
    }
}
