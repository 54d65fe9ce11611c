//! Testing helpers.

use assert_float_eq::*;

pub fn assert_slice_f64_relative(expected: &[f64], actual: &[f64], epsilon: f64) {
    assert_eq!(
        expected.len(),
        actual.len(),
        "lengths do not match: {} ≠ {}",
        expected.len(),
        actual.len()
    );
    for (&expected, &actual) in expected.iter().zip(actual) {
        if actual != expected {
            assert_float_relative_eq!(expected, actual, epsilon);
        }
    }
}

/// Asserts that every value is a finite probability in `0..=1`.
pub fn assert_probabilities(values: &[f64]) {
    for (index, &value) in values.iter().enumerate() {
        assert!(value.is_finite(), "value at {index} is not finite: {value}");
        assert!((0.0..=1.0).contains(&value), "value at {index} out of range: {value}");
    }
}
