use ising_core::stats::{correlation_like, mean, sample_stdev, slope, Summary};
use proptest::prelude::*;

#[test]
fn mean_and_stdev_of_small_sequence() {
    assert_eq!(mean(&[1.0, 2.0, 3.0]), 2.0);
    assert_eq!(sample_stdev(&[1.0, 2.0, 3.0]), 1.0);
}

#[test]
fn degenerate_sequences_yield_nan() {
    assert!(mean(&[]).is_nan());
    assert!(sample_stdev(&[]).is_nan());
    assert!(sample_stdev(&[4.0]).is_nan());
    let summary = Summary::of(&[0.25]);
    assert_eq!(summary.mean, 0.25);
    assert!(summary.stdev.is_nan());
}

#[test]
fn slope_of_exact_line() {
    assert_eq!(slope(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]), 2.0);
    assert_eq!(slope(&[0.0, 1.0, 2.0, 3.0], &[5.0, 5.0, 5.0, 5.0]), 0.0);
}

#[test]
fn slope_with_constant_abscissa_is_not_finite() {
    let value = slope(&[7.0, 7.0, 7.0], &[0.1, 0.2, 0.3]);
    assert!(!value.is_finite());
    assert!(!(value.abs() < 1e-6));

    let flat = slope(&[7.0, 7.0, 7.0], &[0.5, 0.5, 0.5]);
    assert!(flat.is_nan());
}

#[test]
fn correlation_like_omits_square_root() {
    // nΣxy − ΣxΣy = 12, nΣxx − (Σx)² = 6, nΣyy − (Σy)² = 24.
    let xs = [1.0, 2.0, 3.0];
    let ys = [2.0, 4.0, 6.0];
    assert_eq!(correlation_like(&xs, &ys), 12.0 / (6.0 * 24.0));
    assert!(correlation_like(&[0.0, 0.1], &[0.0, 0.1]) > 1.0);
}

proptest! {
    #[test]
    fn slope_recovers_affine_coefficient(a in -5i32..5, b in -5i32..5, n in 2usize..40) {
        let xs: Vec<f64> = (0..n).map(|i| i as f64).collect();
        let ys: Vec<f64> = xs.iter().map(|x| a as f64 * x + b as f64).collect();
        prop_assert!((slope(&xs, &ys) - a as f64).abs() < 1e-9);
    }
}
