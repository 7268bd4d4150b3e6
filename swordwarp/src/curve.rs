/// Monotonic easing curves mapping a normalized time in `[0, 1]` to an interpolation factor.
///
/// Inputs outside the domain are clamped, so sampling past the end always returns the final
/// value.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum EaseCurve {
    Linear,
    /// Cubic smoothstep `3t² - 2t³` (zero slope at both ends).
    #[default]
    EaseInOut,
    /// Quadratic ease-in `t²`.
    EaseIn,
    /// Quadratic ease-out `1 - (1 - t)²`.
    EaseOut,
    /// Piecewise-linear keys `(time, value)` sorted by time.
    Keys(Vec<(f32, f32)>),
}

impl EaseCurve {
    #[inline]
    pub fn sample(&self, t: f32) -> f32 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self {
            EaseCurve::Linear => t,
            EaseCurve::EaseInOut => t * t * (3.0 - 2.0 * t),
            EaseCurve::EaseIn => t * t,
            EaseCurve::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
            EaseCurve::Keys(keys) => sample_keys(keys, t),
        }
    }

    /// Keys must be non-empty, finite, strictly increasing in time, and non-decreasing in value.
    pub fn validate(&self) -> Result<(), &'static str> {
        let EaseCurve::Keys(keys) = self else {
            return Ok(());
        };
        if keys.is_empty() {
            return Err("curve has no keys");
        }
        if keys.iter().any(|(t, v)| !t.is_finite() || !v.is_finite()) {
            return Err("curve keys must be finite");
        }
        for pair in keys.windows(2) {
            let (t0, v0) = pair[0];
            let (t1, v1) = pair[1];
            if t1 <= t0 {
                return Err("curve key times must be strictly increasing");
            }
            if v1 < v0 {
                return Err("curve must be monotonic");
            }
        }
        Ok(())
    }
}

fn sample_keys(keys: &[(f32, f32)], t: f32) -> f32 {
    let Some(&(first_t, first_v)) = keys.first() else {
        return t;
    };
    if t <= first_t {
        return first_v;
    }
    for pair in keys.windows(2) {
        let (t0, v0) = pair[0];
        let (t1, v1) = pair[1];
        if t <= t1 {
            let span = t1 - t0;
            if span <= f32::EPSILON {
                return v1;
            }
            return v0 + (v1 - v0) * (t - t0) / span;
        }
    }
    // Past the last key.
    keys[keys.len() - 1].1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_in_curves_hit_endpoints_and_clamp() {
        for curve in [
            EaseCurve::Linear,
            EaseCurve::EaseInOut,
            EaseCurve::EaseIn,
            EaseCurve::EaseOut,
        ] {
            assert_eq!(curve.sample(0.0), 0.0, "{curve:?}");
            assert_eq!(curve.sample(1.0), 1.0, "{curve:?}");
            assert_eq!(curve.sample(-3.0), 0.0, "{curve:?}");
            assert_eq!(curve.sample(7.5), 1.0, "{curve:?}");
        }
        assert_eq!(EaseCurve::EaseInOut.sample(0.5), 0.5);
    }

    #[test]
    fn built_in_curves_are_monotonic() {
        for curve in [EaseCurve::EaseInOut, EaseCurve::EaseIn, EaseCurve::EaseOut] {
            let mut last = curve.sample(0.0);
            for i in 1..=100 {
                let v = curve.sample(i as f32 / 100.0);
                assert!(v >= last, "{curve:?} decreased at {i}");
                last = v;
            }
        }
    }

    #[test]
    fn keyed_curve_interpolates_between_keys() {
        let curve = EaseCurve::Keys(vec![(0.0, 0.0), (0.5, 0.8), (1.0, 1.0)]);
        assert!(curve.validate().is_ok());
        assert!((curve.sample(0.25) - 0.4).abs() < 1.0e-6);
        assert!((curve.sample(0.75) - 0.9).abs() < 1.0e-6);
        assert_eq!(curve.sample(2.0), 1.0);
    }

    #[test]
    fn invalid_key_sets_are_rejected() {
        assert!(EaseCurve::Keys(vec![]).validate().is_err());
        assert!(
            EaseCurve::Keys(vec![(0.0, 0.0), (0.0, 1.0)])
                .validate()
                .is_err()
        );
        assert!(
            EaseCurve::Keys(vec![(0.0, 1.0), (1.0, 0.0)])
                .validate()
                .is_err()
        );
    }
}
