/// Easing applied to displacement progress.
///
/// Every curve maps `t ∈ [0, 1]` to a progress value with `f(0) = 0` and
/// `f(1) = 1` (keyframes excepted, which map to whatever the data says).
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MotionCurve {
    #[default]
    Linear,
    /// Quadratic ease in (slow start).
    EaseIn,
    /// Quadratic ease out (slow finish).
    EaseOut,
    /// Smoothstep.
    EaseInOut,
    /// Piecewise-linear `(t, value)` pairs sorted by `t`.
    Keyframes(Vec<(f32, f32)>),
}

impl MotionCurve {
    /// Evaluates the curve at `t`, clamped to `[0, 1]`.
    pub fn evaluate(&self, t: f32) -> f32 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self {
            MotionCurve::Linear => t,
            MotionCurve::EaseIn => t * t,
            MotionCurve::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
            MotionCurve::EaseInOut => t * t * (3.0 - 2.0 * t),
            MotionCurve::Keyframes(keys) => sample_keys(keys, t),
        }
    }

    /// Returns true if keyframes are sorted by time.
    pub fn is_well_formed(&self) -> bool {
        match self {
            MotionCurve::Keyframes(keys) => keys.windows(2).all(|pair| pair[0].0 <= pair[1].0),
            _ => true,
        }
    }
}

fn sample_keys(keys: &[(f32, f32)], t: f32) -> f32 {
    let (Some(first), Some(last)) = (keys.first(), keys.last()) else {
        return t;
    };
    if t <= first.0 {
        return first.1;
    }
    if t >= last.0 {
        return last.1;
    }

    for pair in keys.windows(2) {
        let (t0, v0) = pair[0];
        let (t1, v1) = pair[1];
        if t <= t1 {
            let span = t1 - t0;
            if span <= f32::EPSILON {
                return v1;
            }
            return v0 + (v1 - v0) * ((t - t0) / span);
        }
    }
    last.1
}
