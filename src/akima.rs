//! Akima cubic interpolation, used for cursor readouts.
//!
//! Coefficients are computed once per sample set with [`precalculate`] and
//! reused for every query. Node tangents follow Akima's weighted average of
//! neighbouring secant slopes, then pass through a Fritsch–Carlson limiter so
//! monotone data never overshoots between knots.
//!
//! Query rules:
//! - `x` below the first knot clamps to `ys[0]`; at or past the last knot
//!   clamps to the last `y`.
//! - An interval that starts on a strict local extremum is interpolated
//!   linearly.
//! - Everything else is cubic Hermite with the precomputed tangents.

use crate::error::InterpolationError;

/// Tangents and per-interval slopes/widths for one sample set.
#[derive(Debug, Clone, PartialEq)]
pub struct AkimaCoefficients {
    m: Vec<f64>,
    slope: Vec<f64>,
    diff: Vec<f64>,
}

impl AkimaCoefficients {
    /// Tangent at each knot.
    pub fn tangents(&self) -> &[f64] {
        &self.m
    }

    /// Secant slope of each interval.
    pub fn slopes(&self) -> &[f64] {
        &self.slope
    }

    /// Width of each interval.
    pub fn intervals(&self) -> &[f64] {
        &self.diff
    }

    pub fn len(&self) -> usize {
        self.m.len()
    }

    pub fn is_empty(&self) -> bool {
        self.m.is_empty()
    }
}

fn validate(xs: &[f64], ys: &[f64]) -> Result<(), InterpolationError> {
    if xs.len() != ys.len() {
        return Err(InterpolationError::LengthMismatch {
            xs: xs.len(),
            ys: ys.len(),
        });
    }
    if xs.len() < 2 {
        return Err(InterpolationError::InsufficientSamples {
            needed: 2,
            got: xs.len(),
        });
    }
    if let Some(index) = xs
        .iter()
        .zip(ys)
        .position(|(x, y)| !(x.is_finite() && y.is_finite()))
    {
        return Err(InterpolationError::NonFinite { index });
    }
    if let Some(i) = xs.windows(2).position(|w| w[1] <= w[0]) {
        return Err(InterpolationError::NotIncreasing { index: i + 1 });
    }
    Ok(())
}

/// Compute tangents for `(xs, ys)`. `xs` must be strictly increasing.
pub fn precalculate(xs: &[f64], ys: &[f64]) -> Result<AkimaCoefficients, InterpolationError> {
    validate(xs, ys)?;
    let n = xs.len();

    let diff: Vec<f64> = xs.windows(2).map(|w| w[1] - w[0]).collect();
    let slope: Vec<f64> = ys
        .windows(2)
        .zip(&diff)
        .map(|(w, h)| (w[1] - w[0]) / h)
        .collect();

    let mut m = vec![0.0; n];
    m[0] = slope[0];
    m[n - 1] = slope[n - 2];
    for i in 1..n - 1 {
        // Akima weights need two slopes on each side of the knot
        m[i] = if i >= 2 && i + 1 < n - 1 {
            let w1 = (slope[i + 1] - slope[i]).abs();
            let w2 = (slope[i - 1] - slope[i - 2]).abs();
            if w1 + w2 == 0.0 {
                (slope[i - 1] + slope[i]) / 2.0
            } else {
                (w1 * slope[i - 1] + w2 * slope[i]) / (w1 + w2)
            }
        } else {
            (slope[i - 1] + slope[i]) / 2.0
        };
    }

    limit_monotone(&mut m, &slope);
    Ok(AkimaCoefficients { m, slope, diff })
}

/// Fritsch–Carlson: zero tangents that disagree with an adjacent secant and
/// scale tangent pairs that would overshoot.
fn limit_monotone(m: &mut [f64], slope: &[f64]) {
    for (i, s) in slope.iter().enumerate() {
        if *s == 0.0 {
            m[i] = 0.0;
            m[i + 1] = 0.0;
            continue;
        }
        if m[i] * s < 0.0 {
            m[i] = 0.0;
        }
        if m[i + 1] * s < 0.0 {
            m[i + 1] = 0.0;
        }
        let a = m[i] / s;
        let b = m[i + 1] / s;
        let r = a * a + b * b;
        if r > 9.0 {
            let tau = 3.0 / r.sqrt();
            m[i] = tau * a * s;
            m[i + 1] = tau * b * s;
        }
    }
}

/// Index of the last knot `<= x`, or `None` when `x` is left of every knot.
fn search(xs: &[f64], x: f64) -> Option<usize> {
    match xs.binary_search_by(|probe| probe.total_cmp(&x)) {
        Ok(i) => Some(i),
        Err(0) => None,
        Err(i) => Some(i - 1),
    }
}

/// Evaluate the interpolant at `x`.
///
/// `coeffs` must come from [`precalculate`] on the same `xs`/`ys`; a mismatch
/// yields `NaN`.
pub fn interpolate(xs: &[f64], ys: &[f64], x: f64, coeffs: &AkimaCoefficients) -> f64 {
    let n = xs.len();
    if n == 0 || ys.len() != n || coeffs.m.len() != n || x.is_nan() {
        return f64::NAN;
    }
    let Some(j) = search(xs, x) else {
        return ys[0];
    };
    if j >= n - 1 {
        return ys[n - 1];
    }

    let h = coeffs.diff[j];
    let t = (x - xs[j]) / h;
    let (y0, y1) = (ys[j], ys[j + 1]);

    let turns = j > 0 && {
        let prev = ys[j - 1];
        (y1 > y0 && y0 < prev) || (y1 < y0 && y0 > prev)
    };
    if turns {
        return y0 + t * (y1 - y0);
    }

    let t2 = t * t;
    let t3 = t2 * t;
    let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
    let h10 = t3 - 2.0 * t2 + t;
    let h01 = -2.0 * t3 + 3.0 * t2;
    let h11 = t3 - t2;
    h00 * y0 + h10 * coeffs.m[j] * h + h01 * y1 + h11 * coeffs.m[j + 1] * h
}

/// Evaluate many queries, appending to `out`.
pub fn interpolate_into(
    xs: &[f64],
    ys: &[f64],
    queries: &[f64],
    coeffs: &AkimaCoefficients,
    out: &mut Vec<f64>,
) {
    out.reserve(queries.len());
    out.extend(queries.iter().map(|&x| interpolate(xs, ys, x, coeffs)));
}

/// Owned sample set plus coefficients.
#[derive(Debug, Clone, PartialEq)]
pub struct AkimaSpline {
    xs: Vec<f64>,
    ys: Vec<f64>,
    coeffs: AkimaCoefficients,
}

impl AkimaSpline {
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> Result<Self, InterpolationError> {
        let coeffs = precalculate(&xs, &ys)?;
        Ok(Self { xs, ys, coeffs })
    }

    pub fn eval(&self, x: f64) -> f64 {
        interpolate(&self.xs, &self.ys, x, &self.coeffs)
    }

    pub fn eval_many(&self, queries: &[f64]) -> Vec<f64> {
        let mut out = Vec::with_capacity(queries.len());
        interpolate_into(&self.xs, &self.ys, queries, &self.coeffs, &mut out);
        out
    }

    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    pub fn ys(&self) -> &[f64] {
        &self.ys
    }

    pub fn coefficients(&self) -> &AkimaCoefficients {
        &self.coeffs
    }

    /// `[first, last]` knot x.
    pub fn x_range(&self) -> (f64, f64) {
        (self.xs[0], self.xs[self.xs.len() - 1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reproduces_knots() {
        let xs = [0.0, 1.0, 2.5, 4.0, 5.0, 7.0];
        let ys = [1.0, 3.0, 2.0, 5.0, 4.5, 8.0];
        let c = precalculate(&xs, &ys).unwrap();
        for (x, y) in xs.iter().zip(ys.iter()) {
            assert!((interpolate(&xs, &ys, *x, &c) - y).abs() < 1e-12, "x={}", x);
        }
    }

    #[test]
    fn test_no_overshoot_on_monotone_data() {
        let xs = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let ys = [0.0, 0.1, 0.2, 5.0, 5.1, 5.2, 10.0];
        let c = precalculate(&xs, &ys).unwrap();
        let mut prev = f64::NEG_INFINITY;
        for k in 0..=600 {
            let x = k as f64 / 100.0;
            let y = interpolate(&xs, &ys, x, &c);
            let j = (x.floor() as usize).min(xs.len() - 2);
            assert!(y >= ys[j] - 1e-12 && y <= ys[j + 1] + 1e-12, "x={} y={}", x, y);
            assert!(y >= prev - 1e-12, "not monotone at x={}", x);
            prev = y;
        }
    }

    #[test]
    fn test_clamps_outside_range() {
        let xs = [10.0, 20.0, 30.0];
        let ys = [1.0, 2.0, 4.0];
        let c = precalculate(&xs, &ys).unwrap();
        assert_eq!(interpolate(&xs, &ys, 5.0, &c), 1.0);
        assert_eq!(interpolate(&xs, &ys, 30.0, &c), 4.0);
        assert_eq!(interpolate(&xs, &ys, 99.0, &c), 4.0);
    }

    #[test]
    fn test_linear_after_turning_point() {
        let xs = [0.0, 1.0, 2.0, 3.0];
        let ys = [0.0, 4.0, 2.0, 3.0];
        let c = precalculate(&xs, &ys).unwrap();
        // y turns at x=2, so [2, 3] is a straight line
        assert!((interpolate(&xs, &ys, 2.5, &c) - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_two_samples_is_linear() {
        let xs = [0.0, 2.0];
        let ys = [1.0, 5.0];
        let c = precalculate(&xs, &ys).unwrap();
        assert!((interpolate(&xs, &ys, 1.0, &c) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_precalculate_rejects_bad_input() {
        assert_eq!(
            precalculate(&[0.0, 1.0], &[1.0]),
            Err(InterpolationError::LengthMismatch { xs: 2, ys: 1 })
        );
        assert_eq!(
            precalculate(&[0.0], &[1.0]),
            Err(InterpolationError::InsufficientSamples { needed: 2, got: 1 })
        );
        assert_eq!(
            precalculate(&[0.0, 1.0, 1.0], &[1.0, 2.0, 3.0]),
            Err(InterpolationError::NotIncreasing { index: 2 })
        );
        assert_eq!(
            precalculate(&[0.0, 1.0], &[1.0, f64::NAN]),
            Err(InterpolationError::NonFinite { index: 1 })
        );
    }

    #[test]
    fn test_interpolate_into_and_spline() {
        let spline = AkimaSpline::new(vec![0.0, 1.0, 2.0], vec![0.0, 1.0, 2.0]).unwrap();
        let ys = spline.eval_many(&[0.0, 0.5, 1.5, 2.0]);
        let expected = [0.0, 0.5, 1.5, 2.0];
        for (a, b) in ys.iter().zip(expected.iter()) {
            assert!((a - b).abs() < 1e-12);
        }
        assert_eq!(spline.x_range(), (0.0, 2.0));
        assert_eq!(spline.coefficients().len(), 3);
    }
}
