//! Guarded number formatting for every display path.
//!
//! Scores reach the screen only through these helpers so a NaN or infinity
//! from upstream can never show up as text.

/// Fixed-point text with `decimals` places.
///
/// Ties round away from zero (`0.125` → `"0.13"`) and negative zero prints
/// without a sign. Callers guard non-finite input.
pub(crate) fn fixed(value: f64, decimals: usize) -> String {
    let scale = 10f64.powi(decimals as i32);
    let scaled = value * scale;
    let rounded = if scaled.is_finite() { scaled.round() / scale } else { value };
    // Adding +0.0 turns -0.0 into 0.0.
    format!("{:.*}", decimals, rounded + 0.0)
}

/// Formats a percentage score with two decimals. Non-finite → `"0.00"`.
pub fn percent(value: f64) -> String {
    if value.is_finite() {
        fixed(value, 2)
    } else {
        "0.00".to_string()
    }
}

/// Formats a waveform amplitude with three decimals. Non-finite → `"0.000"`.
pub fn amplitude(value: f32) -> String {
    if value.is_finite() {
        fixed(f64::from(value), 3)
    } else {
        "0.000".to_string()
    }
}

/// Fill fraction for a 0–100 gauge, clamped to `[0, 1]`.
pub fn gauge_fraction(value: f64) -> f32 {
    if value.is_finite() {
        (value / 100.0).clamp(0.0, 1.0) as f32
    } else {
        0.0
    }
}

/// Bytes as megabytes with two decimals.
pub fn megabytes(bytes: u64) -> String {
    format!("{:.2}", bytes as f64 / (1024.0 * 1024.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_has_two_decimals() {
        assert_eq!(percent(91.2), "91.20");
        assert_eq!(percent(0.0), "0.00");
        assert_eq!(percent(100.0), "100.00");
        assert_eq!(percent(33.333), "33.33");
    }

    #[test]
    fn percent_rounds_ties_up() {
        assert_eq!(percent(0.125), "0.13");
        assert_eq!(percent(12.125), "12.13");
        // 2.675 is stored just below the tie.
        assert_eq!(percent(2.675), "2.67");
        assert_eq!(percent(-0.125), "-0.13");
    }

    #[test]
    fn negative_zero_prints_unsigned() {
        assert_eq!(percent(-0.0), "0.00");
        assert_eq!(percent(-0.001), "0.00");
        assert_eq!(amplitude(-0.0), "0.000");
        assert_eq!(fixed(-0.04, 1), "0.0");
    }

    #[test]
    fn huge_values_keep_their_digits() {
        assert_eq!(percent(f64::MAX), format!("{:.2}", f64::MAX));
    }

    #[test]
    fn percent_neutralizes_non_finite() {
        assert_eq!(percent(f64::NAN), "0.00");
        assert_eq!(percent(f64::INFINITY), "0.00");
        assert_eq!(percent(f64::NEG_INFINITY), "0.00");
    }

    #[test]
    fn amplitude_has_three_decimals() {
        assert_eq!(amplitude(-0.25), "-0.250");
        assert_eq!(amplitude(f32::NAN), "0.000");
    }

    #[test]
    fn gauge_is_clamped() {
        assert_eq!(gauge_fraction(50.0), 0.5);
        assert_eq!(gauge_fraction(140.0), 1.0);
        assert_eq!(gauge_fraction(-3.0), 0.0);
        assert_eq!(gauge_fraction(f64::NAN), 0.0);
    }
}
