use num_traits::Float;

/// Jump magnitude of the position sensors the segmenters were written for (volts).
pub const DEFAULT_DISCONT: f64 = 10.0;

/// Remove wrap-around jumps of magnitude `discont` from `x`.
///
/// A running adjustment is carried along the sequence: whenever the step to
/// the previous unwrapped sample exceeds half of `discont`, the adjustment is
/// moved by one `discont` in the opposite direction. Each wrap is corrected
/// once, at the sample where it occurs.
///
/// Only one wrap per step is recovered. A true step larger than
/// `1.5 * discont` between neighbouring samples is misread.
pub fn unwrap<T: Float>(x: &[T], discont: T) -> Vec<T> {
    let Some(&first) = x.first() else {
        return Vec::new();
    };
    let half = discont / (T::one() + T::one());
    let mut adj = T::zero();
    let mut out = Vec::with_capacity(x.len());
    out.push(first);
    for &sample in &x[1..] {
        let prev = out[out.len() - 1];
        let dx = sample + adj - prev;
        if dx < -half {
            adj = adj + discont;
        }
        if dx > half {
            adj = adj - discont;
        }
        out.push(sample + adj);
    }
    out
}

/// [`unwrap`] with [`DEFAULT_DISCONT`].
pub fn unwrap_default(x: &[f64]) -> Vec<f64> {
    unwrap(x, DEFAULT_DISCONT)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wrap(x: &[f64], discont: f64) -> Vec<f64> {
        x.iter().map(|v| v.rem_euclid(discont)).collect()
    }

    #[test]
    fn reconstructs_wrapped_ramp() {
        let x: Vec<f64> = (0..80).map(|i| i as f64 * 0.5).collect();
        let wrapped = wrap(&x, 10.0);
        assert!(wrapped.iter().all(|v| *v < 10.0));
        assert_eq!(unwrap(&wrapped, 10.0), x);
    }

    #[test]
    fn reconstructs_descending_ramp_up_to_offset() {
        let x: Vec<f64> = (0..60).map(|i| 3.0 - i as f64 * 0.75).collect();
        let wrapped = wrap(&x, 10.0);
        let offset = wrapped[0] - x[0];
        let restored = unwrap(&wrapped, 10.0);
        for (r, v) in restored.iter().zip(&x) {
            assert!((r - offset - v).abs() < 1e-9, "{} vs {}", r - offset, v);
        }
    }

    #[test]
    fn slow_input_is_unchanged() {
        let x: Vec<f64> = (0..200).map(|i| 1.0 + i as f64 * 0.01).collect();
        assert_eq!(unwrap_default(&x), x);
    }

    #[test]
    fn works_on_f32() {
        let wrapped: Vec<f32> = vec![8.0, 9.0, 0.0, 1.0];
        assert_eq!(unwrap(&wrapped, 10.0f32), vec![8.0, 9.0, 10.0, 11.0]);
    }

    #[test]
    fn empty_and_single_sample() {
        assert!(unwrap::<f64>(&[], 10.0).is_empty());
        assert_eq!(unwrap(&[4.2], 10.0), vec![4.2]);
    }

    #[test]
    fn double_wrap_in_one_step_is_not_recovered() {
        // true sequence 0 -> 25 wraps twice between samples
        let restored = unwrap(&[0.0, 5.0], 10.0);
        assert_ne!(restored[1], 25.0);
    }
}
