use crate::factorial::Factorial;

/// Probability of exactly `k` goals given an expected `lambda` goals.
///
/// A non-positive (or NaN) rate is treated as a point mass at zero goals.
#[inline]
pub fn univariate(k: u8, lambda: f64, factorial: &impl Factorial) -> f64 {
    if lambda.is_nan() || lambda <= 0.0 {
        return if k == 0 { 1.0 } else { 0.0 };
    }
    lambda.powi(k as i32) * f64::exp(-lambda) / factorial.get(k)
}

/// Fills `probs` with the pmf for `0..probs.len()` goals.
pub fn fill_univariate(lambda: f64, factorial: &impl Factorial, probs: &mut [f64]) {
    for (k, prob) in probs.iter_mut().enumerate() {
        *prob = univariate(k as u8, lambda, factorial);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factorial::{Calculator, Lookup};
    use crate::probs::SliceExt;
    use assert_float_eq::*;

    #[test]
    fn univariate_table_values() {
        assert_float_relative_eq!(0.36787944117144233, univariate(0, 1.0, &Calculator));
        assert_float_relative_eq!(0.36787944117144233, univariate(1, 1.0, &Calculator));
        assert_float_relative_eq!(0.18393972058572117, univariate(2, 1.0, &Calculator));
        assert_float_relative_eq!(0.0820849986238988, univariate(0, 2.5, &Calculator));
        assert_float_relative_eq!(0.205212496559747, univariate(1, 2.5, &Calculator));
        assert_float_relative_eq!(0.25651562069968376, univariate(2, 2.5, &Calculator));
    }

    #[test]
    fn univariate_at_baseline() {
        assert_float_absolute_eq!(0.2592, univariate(0, 1.35, &Calculator), 1e-4);
        assert_float_absolute_eq!(0.34997, univariate(1, 1.35, &Calculator), 1e-4);
    }

    #[test]
    fn zero_rate_is_point_mass() {
        assert_eq!(1.0, univariate(0, 0.0, &Calculator));
        for k in 1..=20 {
            assert_eq!(0.0, univariate(k, 0.0, &Calculator));
        }
    }

    #[test]
    fn negative_and_nan_rates_are_point_mass() {
        assert_eq!(1.0, univariate(0, -0.5, &Calculator));
        assert_eq!(0.0, univariate(3, -0.5, &Calculator));
        assert_eq!(1.0, univariate(0, f64::NAN, &Calculator));
        assert_eq!(0.0, univariate(1, f64::NAN, &Calculator));
    }

    #[test]
    fn fill_covers_nearly_all_mass() {
        let mut probs = vec![0.0; 21];
        fill_univariate(2.0, &Lookup::up_to(20), &mut probs);
        assert_float_absolute_eq!(1.0, probs.sum(), 1e-9);
        assert_eq!(univariate(3, 2.0, &Calculator), probs[3]);
    }
}
