/// Round to the nearest integer, ties to even, the rounding used for all published values.
pub fn round_half_even(value: f64) -> f64 {
    value.round_ties_even()
}

/// Round to `decimals` places, ties to even.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    (value * scale).round_ties_even() / scale
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_half_even() {
        assert_eq!(round_half_even(32.26), 32.0);
        assert_eq!(round_half_even(32.5), 32.0);
        assert_eq!(round_half_even(33.5), 34.0);
        assert_eq!(round_half_even(-0.4), -0.0);
    }

    #[test]
    fn test_round_to_one_decimal() {
        assert_eq!(round_to(105.4333, 1), 105.4);
        assert_eq!(round_to(99.96, 1), 100.0);
        assert_eq!(round_to(12.0, 1), 12.0);
    }
}
