//! Currency unit conversions

/// Convert ad-network currency micros to a decimal amount
///
/// Google Ads reports cost as micros (1/1,000,000 of the account
/// currency unit). The division is exact for every value the API can
/// return: f64 has 53 bits of mantissa, so integers up to 2^53 micros
/// (~9 billion currency units) convert without drift.
pub fn micros_to_decimal(micros: i64) -> f64 {
    micros as f64 / 1_000_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_conversion() {
        assert_eq!(micros_to_decimal(1_000_000), 1.0);
        assert_eq!(micros_to_decimal(1_500_000), 1.5);
        assert_eq!(micros_to_decimal(0), 0.0);
        assert_eq!(micros_to_decimal(10_000), 0.01);
    }

    #[test]
    fn test_no_rounding_drift() {
        // Drift must stay under 1e-6 for any valid input. Sample
        // across magnitudes.
        for micros in [1i64, 7, 999, 123_456, 987_654_321, 1_234_567_890_123] {
            let decimal = micros_to_decimal(micros);
            let back = decimal * 1_000_000.0;
            assert!(
                (back - micros as f64).abs() < 1e-6,
                "drift for {} micros",
                micros
            );
        }
    }

    #[test]
    fn test_negative_micros() {
        // Refund adjustments come through as negative cost
        assert_eq!(micros_to_decimal(-2_500_000), -2.5);
    }
}
