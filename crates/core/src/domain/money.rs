use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds half away from zero to `places` decimal places.
///
/// Goes through `Decimal` so that values like `1.005` round the way a reader
/// expects instead of following their binary representation.
pub fn round_to(value: f64, places: u32) -> f64 {
    Decimal::from_f64(value)
        .map(|decimal| {
            decimal.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero)
        })
        .and_then(|rounded| rounded.to_f64())
        .unwrap_or(value)
}

pub fn round2(value: f64) -> f64 {
    round_to(value, 2)
}

/// `numerator / denominator`, or 0 when the denominator is zero.
pub fn ratio_or_zero(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

#[cfg(test)]
mod tests {
    use super::{ratio_or_zero, round2, round_to};

    #[test]
    fn rounds_midpoints_away_from_zero() {
        assert_eq!(round2(1.005), 1.01);
        assert_eq!(round2(2.675), 2.68);
        assert_eq!(round2(-1.005), -1.01);
        assert_eq!(round_to(19.5, 0), 20.0);
    }

    #[test]
    fn rounding_is_idempotent() {
        let once = round2(123.456_789);
        assert_eq!(once, 123.46);
        assert_eq!(round2(once), once);
    }

    #[test]
    fn ratio_guards_zero_denominator() {
        assert_eq!(ratio_or_zero(10.0, 0.0), 0.0);
        assert_eq!(ratio_or_zero(10.0, 4.0), 2.5);
    }
}
