//! Curve shapes: how consecutive projected points are joined.
//!
//! Each emitter draws one contiguous run of points into a [`PathWriter`],
//! starting with a move command. Runs are separated by gaps in the data.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::svg::PathWriter;
use crate::error::ChartError;

/// Projected pixel-space point.
pub type PixelPoint = (f64, f64);

/// Curve fitting strategy used by the path builder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveShape {
    Linear,
    /// Horizontal-tangent cubic between each pair of points.
    #[default]
    BumpX,
    /// Monotone cubic in x; never overshoots between samples.
    MonotoneX,
    /// Natural cubic spline.
    Natural,
    /// Uniform cubic B-spline. Does not pass through interior points.
    Basis,
    /// Step with the riser halfway between samples.
    Step,
}

impl CurveShape {
    pub fn as_str(&self) -> &'static str {
        match self {
            CurveShape::Linear => "linear",
            CurveShape::BumpX => "bump_x",
            CurveShape::MonotoneX => "monotone_x",
            CurveShape::Natural => "natural",
            CurveShape::Basis => "basis",
            CurveShape::Step => "step",
        }
    }

    /// Draw one contiguous run of points.
    pub fn emit(&self, points: &[PixelPoint], out: &mut PathWriter) {
        if points.is_empty() {
            return;
        }
        match self {
            CurveShape::Linear => linear(points, out),
            CurveShape::BumpX => bump_x(points, out),
            CurveShape::MonotoneX => monotone_x(points, out),
            CurveShape::Natural => natural(points, out),
            CurveShape::Basis => basis(points, out),
            CurveShape::Step => step(points, out),
        }
    }
}

impl std::fmt::Display for CurveShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CurveShape {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();
        match normalized.trim_start_matches("curve") {
            "linear" => Ok(CurveShape::Linear),
            "bumpx" => Ok(CurveShape::BumpX),
            "monotonex" => Ok(CurveShape::MonotoneX),
            "natural" => Ok(CurveShape::Natural),
            "basis" => Ok(CurveShape::Basis),
            "step" => Ok(CurveShape::Step),
            _ => Err(ChartError::Validation(format!("Unknown curve shape: {}", s))),
        }
    }
}

fn linear(points: &[PixelPoint], out: &mut PathWriter) {
    let (x, y) = points[0];
    out.move_to(x, y);
    for &(x, y) in &points[1..] {
        out.line_to(x, y);
    }
}

fn bump_x(points: &[PixelPoint], out: &mut PathWriter) {
    let (mut x0, mut y0) = points[0];
    out.move_to(x0, y0);
    for &(x, y) in &points[1..] {
        let mid = (x0 + x) / 2.0;
        out.cubic_to(mid, y0, mid, y, x, y);
        x0 = x;
        y0 = y;
    }
}

fn step(points: &[PixelPoint], out: &mut PathWriter) {
    let (mut x0, mut y0) = points[0];
    out.move_to(x0, y0);
    for &(x, y) in &points[1..] {
        let mid = (x0 + x) / 2.0;
        out.line_to(mid, y0);
        out.line_to(mid, y);
        out.line_to(x, y);
        x0 = x;
        y0 = y;
    }
}

// ─── Monotone ────────────────────────────────────────────────────────────────

fn sign(v: f64) -> f64 {
    if v < 0.0 {
        -1.0
    } else {
        1.0
    }
}

/// Tangent at the middle of three points, limited so the curve stays monotone.
fn slope3(x0: f64, y0: f64, x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    let h0 = x1 - x0;
    let h1 = x2 - x1;
    let s0 = (y1 - y0) / if h0 != 0.0 { h0 } else if h1 < 0.0 { -0.0 } else { 0.0 };
    let s1 = (y2 - y1) / if h1 != 0.0 { h1 } else if h0 < 0.0 { -0.0 } else { 0.0 };
    let p = (s0 * h1 + s1 * h0) / (h0 + h1);
    let v = (sign(s0) + sign(s1)) * s0.abs().min(s1.abs()).min(0.5 * p.abs());
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

/// One-sided tangent at an end point.
fn slope2(x0: f64, y0: f64, x1: f64, y1: f64, t: f64) -> f64 {
    let h = x1 - x0;
    if h != 0.0 {
        (3.0 * (y1 - y0) / h - t) / 2.0
    } else {
        t
    }
}

fn hermite(out: &mut PathWriter, x0: f64, y0: f64, x1: f64, y1: f64, t0: f64, t1: f64) {
    let dx = (x1 - x0) / 3.0;
    out.cubic_to(x0 + dx, y0 + dx * t0, x1 - dx, y1 - dx * t1, x1, y1);
}

fn monotone_x(points: &[PixelPoint], out: &mut PathWriter) {
    let mut state = 0u8;
    let (mut x0, mut y0, mut x1, mut y1) = (f64::NAN, f64::NAN, f64::NAN, f64::NAN);
    let mut t0 = f64::NAN;

    for &(x, y) in points {
        // coincident points
        if x == x1 && y == y1 {
            continue;
        }
        let mut t1 = f64::NAN;
        match state {
            0 => {
                state = 1;
                out.move_to(x, y);
            }
            1 => state = 2,
            2 => {
                state = 3;
                t1 = slope3(x0, y0, x1, y1, x, y);
                hermite(out, x0, y0, x1, y1, slope2(x0, y0, x1, y1, t1), t1);
            }
            _ => {
                t1 = slope3(x0, y0, x1, y1, x, y);
                hermite(out, x0, y0, x1, y1, t0, t1);
            }
        }
        x0 = x1;
        y0 = y1;
        x1 = x;
        y1 = y;
        t0 = t1;
    }

    match state {
        2 => out.line_to(x1, y1),
        3 => {
            let t1 = slope2(x0, y0, x1, y1, t0);
            hermite(out, x0, y0, x1, y1, t0, t1);
        }
        _ => {}
    }
}

// ─── Natural ─────────────────────────────────────────────────────────────────

/// Bezier control points of a natural cubic spline through `coords`
/// (one axis at a time). Returns `(first, second)` control coordinates per
/// segment.
fn natural_controls(coords: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let n = coords.len() - 1;
    let mut a = vec![0.0; n];
    let mut b = vec![0.0; n];
    let mut r = vec![0.0; n];

    a[0] = 0.0;
    b[0] = 2.0;
    r[0] = coords[0] + 2.0 * coords[1];
    for i in 1..n.saturating_sub(1) {
        a[i] = 1.0;
        b[i] = 4.0;
        r[i] = 4.0 * coords[i] + 2.0 * coords[i + 1];
    }
    a[n - 1] = 2.0;
    b[n - 1] = 7.0;
    r[n - 1] = 8.0 * coords[n - 1] + coords[n];

    for i in 1..n {
        let m = a[i] / b[i - 1];
        b[i] -= m;
        r[i] -= m * r[i - 1];
    }
    a[n - 1] = r[n - 1] / b[n - 1];
    for i in (0..n - 1).rev() {
        a[i] = (r[i] - a[i + 1]) / b[i];
    }
    b[n - 1] = (coords[n] + a[n - 1]) / 2.0;
    for i in 0..n - 1 {
        b[i] = 2.0 * coords[i + 1] - a[i + 1];
    }
    (a, b)
}

fn natural(points: &[PixelPoint], out: &mut PathWriter) {
    let (x, y) = points[0];
    out.move_to(x, y);
    match points.len() {
        1 => {}
        2 => out.line_to(points[1].0, points[1].1),
        _ => {
            let xs: Vec<f64> = points.iter().map(|p| p.0).collect();
            let ys: Vec<f64> = points.iter().map(|p| p.1).collect();
            let (ax, bx) = natural_controls(&xs);
            let (ay, by) = natural_controls(&ys);
            for i in 0..points.len() - 1 {
                out.cubic_to(ax[i], ay[i], bx[i], by[i], xs[i + 1], ys[i + 1]);
            }
        }
    }
}

// ─── Basis ───────────────────────────────────────────────────────────────────

fn basis_segment(out: &mut PathWriter, p0: PixelPoint, p1: PixelPoint, p: PixelPoint) {
    out.cubic_to(
        (2.0 * p0.0 + p1.0) / 3.0,
        (2.0 * p0.1 + p1.1) / 3.0,
        (p0.0 + 2.0 * p1.0) / 3.0,
        (p0.1 + 2.0 * p1.1) / 3.0,
        (p0.0 + 4.0 * p1.0 + p.0) / 6.0,
        (p0.1 + 4.0 * p1.1 + p.1) / 6.0,
    );
}

fn basis(points: &[PixelPoint], out: &mut PathWriter) {
    let first = points[0];
    out.move_to(first.0, first.1);
    match points.len() {
        1 => {}
        2 => out.line_to(points[1].0, points[1].1),
        n => {
            let (p0, p1) = (points[0], points[1]);
            out.line_to((5.0 * p0.0 + p1.0) / 6.0, (5.0 * p0.1 + p1.1) / 6.0);
            for w in points.windows(3) {
                basis_segment(out, w[0], w[1], w[2]);
            }
            let (a, b) = (points[n - 2], points[n - 1]);
            basis_segment(out, a, b, b);
            out.line_to(b.0, b.1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draw(shape: CurveShape, points: &[PixelPoint]) -> String {
        let mut w = PathWriter::new();
        shape.emit(points, &mut w);
        w.finish()
    }

    #[test]
    fn test_linear() {
        let d = draw(CurveShape::Linear, &[(0.0, 100.0), (50.0, 50.0), (100.0, 0.0)]);
        assert_eq!(d, "M0,100L50,50L100,0");
    }

    #[test]
    fn test_bump_x_horizontal_tangents() {
        let d = draw(CurveShape::BumpX, &[(0.0, 0.0), (10.0, 20.0)]);
        assert_eq!(d, "M0,0C5,0,5,20,10,20");
    }

    #[test]
    fn test_step() {
        let d = draw(CurveShape::Step, &[(0.0, 0.0), (10.0, 20.0)]);
        assert_eq!(d, "M0,0L5,0L5,20L10,20");
    }

    #[test]
    fn test_single_point_is_move_only() {
        for shape in [
            CurveShape::Linear,
            CurveShape::BumpX,
            CurveShape::MonotoneX,
            CurveShape::Natural,
            CurveShape::Basis,
            CurveShape::Step,
        ] {
            assert_eq!(draw(shape, &[(3.0, 4.0)]), "M3,4", "{}", shape);
        }
    }

    #[test]
    fn test_two_points_degrade_to_line() {
        assert_eq!(draw(CurveShape::MonotoneX, &[(0.0, 0.0), (10.0, 5.0)]), "M0,0L10,5");
        assert_eq!(draw(CurveShape::Natural, &[(0.0, 0.0), (10.0, 5.0)]), "M0,0L10,5");
        assert_eq!(draw(CurveShape::Basis, &[(0.0, 0.0), (10.0, 5.0)]), "M0,0L10,5");
    }

    #[test]
    fn test_monotone_collinear_stays_straight() {
        let d = draw(CurveShape::MonotoneX, &[(0.0, 0.0), (3.0, 3.0), (6.0, 6.0)]);
        assert_eq!(d, "M0,0C1,1,2,2,3,3C4,4,5,5,6,6");
    }

    #[test]
    fn test_natural_ends_on_samples() {
        let d = draw(CurveShape::Natural, &[(0.0, 0.0), (5.0, 10.0), (10.0, 0.0)]);
        assert!(d.starts_with("M0,0C"));
        assert!(d.ends_with(",10,0"));
        assert_eq!(d.matches('C').count(), 2);
    }

    #[test]
    fn test_from_str_accepts_common_spellings() {
        assert_eq!("bumpX".parse::<CurveShape>().unwrap(), CurveShape::BumpX);
        assert_eq!("curveMonotoneX".parse::<CurveShape>().unwrap(), CurveShape::MonotoneX);
        assert_eq!("monotone_x".parse::<CurveShape>().unwrap(), CurveShape::MonotoneX);
        assert!("cardinal".parse::<CurveShape>().is_err());
    }

    #[test]
    fn test_serde_snake_case() {
        assert_eq!(serde_json::to_string(&CurveShape::BumpX).unwrap(), "\"bump_x\"");
        assert_eq!(CurveShape::default(), CurveShape::BumpX);
    }
}
