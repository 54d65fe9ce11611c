//! Utilities for working with probabilities.

pub trait SliceExt {
    fn sum(&self) -> f64;

    /// Scales the elements so that they add up to `target`, returning the original sum. A slice
    /// whose sum is zero or not finite is left untouched.
    fn normalise(&mut self, target: f64) -> f64;

    fn scale(&mut self, factor: f64);
}
impl SliceExt for [f64] {
    fn sum(&self) -> f64 {
        self.iter().sum()
    }

    fn normalise(&mut self, target: f64) -> f64 {
        let sum = self.sum();
        if sum > 0.0 && sum.is_finite() {
            self.scale(target / sum);
        }
        sum
    }

    fn scale(&mut self, factor: f64) {
        for element in self {
            *element *= factor;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_float_eq::*;
    use crate::testing::assert_slice_f64_relative;

    #[test]
    fn sum() {
        let data = [0.0, 0.1, 0.2];
        assert_f64_near!(0.3, data.sum(), 1);
    }

    #[test]
    fn normalise() {
        let mut data = [0.05, 0.1, 0.15, 0.2];
        let sum = data.normalise(1.0);
        assert_float_absolute_eq!(0.5, sum, 1e-12);
        assert_slice_f64_relative(&[0.1, 0.2, 0.3, 0.4], &data, 1e-12);
    }

    #[test]
    fn normalise_zero_sum_is_untouched() {
        let mut data = [0.0, 0.0, 0.0];
        assert_eq!(0.0, data.normalise(1.0));
        assert_eq!([0.0, 0.0, 0.0], data);
    }

    #[test]
    fn scale() {
        let mut data = [1.0, 2.0];
        data.scale(0.5);
        assert_eq!([0.5, 1.0], data);
    }
}
