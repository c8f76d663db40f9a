//! Parsed path geometry.
//!
//! Parsing normalizes every command to absolute `M`, `L`, `C` or `Z`:
//! `H`/`V` become lines, `S` and quadratic commands become cubics. Arcs are
//! rejected; chart paths never contain them.

use serde::{Deserialize, Serialize};

use super::svg::PathWriter;
use crate::error::ChartError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn lerp(self, other: Vec2, t: f64) -> Vec2 {
        Vec2::new(self.x + (other.x - self.x) * t, self.y + (other.y - self.y) * t)
    }

    fn offset(self, other: Vec2) -> Vec2 {
        Vec2::new(self.x + other.x, self.y + other.y)
    }

    fn reflect_about(self, center: Vec2) -> Vec2 {
        Vec2::new(2.0 * center.x - self.x, 2.0 * center.y - self.y)
    }
}

/// One absolute path command.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Segment {
    Move { to: Vec2 },
    Line { to: Vec2 },
    Cubic { c1: Vec2, c2: Vec2, to: Vec2 },
    Close,
}

/// A drawing segment with its implicit start made explicit, as a cubic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Curve {
    pub from: Vec2,
    pub c1: Vec2,
    pub c2: Vec2,
    pub to: Vec2,
}

impl Curve {
    /// A straight line as a cubic with control points at thirds.
    pub fn line(from: Vec2, to: Vec2) -> Self {
        Self {
            from,
            c1: from.lerp(to, 1.0 / 3.0),
            c2: from.lerp(to, 2.0 / 3.0),
            to,
        }
    }

    pub fn point_at(&self, t: f64) -> Vec2 {
        let mt = 1.0 - t;
        let a = mt * mt * mt;
        let b = 3.0 * mt * mt * t;
        let c = 3.0 * mt * t * t;
        let d = t * t * t;
        Vec2::new(
            a * self.from.x + b * self.c1.x + c * self.c2.x + d * self.to.x,
            a * self.from.y + b * self.c1.y + c * self.c2.y + d * self.to.y,
        )
    }

    /// Sub-curve over `[t0, t1]`.
    pub fn slice(&self, t0: f64, t1: f64) -> Curve {
        if t1 <= 0.0 {
            return Curve {
                from: self.from,
                c1: self.from,
                c2: self.from,
                to: self.from,
            };
        }
        let (left, _) = self.split(t1);
        let (_, right) = left.split(t0 / t1);
        right
    }

    /// de Casteljau split at `t`.
    pub fn split(&self, t: f64) -> (Curve, Curve) {
        let p01 = self.from.lerp(self.c1, t);
        let p12 = self.c1.lerp(self.c2, t);
        let p23 = self.c2.lerp(self.to, t);
        let p012 = p01.lerp(p12, t);
        let p123 = p12.lerp(p23, t);
        let mid = p012.lerp(p123, t);
        (
            Curve {
                from: self.from,
                c1: p01,
                c2: p012,
                to: mid,
            },
            Curve {
                from: mid,
                c1: p123,
                c2: p23,
                to: self.to,
            },
        )
    }
}

/// A path as a list of absolute segments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedPath {
    pub segments: Vec<Segment>,
}

impl ParsedPath {
    pub fn parse(d: &str) -> Result<Self, ChartError> {
        Parser::new(d).run()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The initial move point.
    pub fn start(&self) -> Option<Vec2> {
        match self.segments.first() {
            Some(Segment::Move { to }) => Some(*to),
            _ => None,
        }
    }

    /// Drawing segments of every contour, each with an explicit start.
    pub fn curves(&self) -> Vec<Curve> {
        let mut out = Vec::with_capacity(self.segments.len());
        let mut pen = Vec2::default();
        let mut contour_start = Vec2::default();
        for seg in &self.segments {
            match *seg {
                Segment::Move { to } => {
                    pen = to;
                    contour_start = to;
                }
                Segment::Line { to } => {
                    out.push(Curve::line(pen, to));
                    pen = to;
                }
                Segment::Cubic { c1, c2, to } => {
                    out.push(Curve {
                        from: pen,
                        c1,
                        c2,
                        to,
                    });
                    pen = to;
                }
                Segment::Close => pen = contour_start,
            }
        }
        out
    }

    /// x of the anchor reached after `index` drawing segments: `0` is the
    /// move point; indexes past the end give the last anchor.
    pub fn x_position_for_curve(&self, index: usize) -> Option<f64> {
        if index == 0 {
            return self.start().map(|p| p.x);
        }
        let curves = self.curves();
        let last = curves.len().checked_sub(1);
        match last {
            Some(last) => Some(curves[(index - 1).min(last)].to.x),
            None => self.start().map(|p| p.x),
        }
    }

    /// y of the path at horizontal position `x`, assuming x is monotone
    /// within each segment. `None` when `x` is outside every segment.
    pub fn y_for_x(&self, x: f64) -> Option<f64> {
        if !x.is_finite() {
            return None;
        }
        let curves = self.curves();
        let curve = curves.iter().find(|c| {
            let (lo, hi) = if c.from.x <= c.to.x {
                (c.from.x, c.to.x)
            } else {
                (c.to.x, c.from.x)
            };
            x >= lo && x <= hi
        })?;
        Some(curve.point_at(solve_t_for_x(curve, x)).y)
    }

    pub fn to_svg(&self) -> String {
        let mut w = PathWriter::with_capacity(self.segments.len());
        for seg in &self.segments {
            match *seg {
                Segment::Move { to } => w.move_to(to.x, to.y),
                Segment::Line { to } => w.line_to(to.x, to.y),
                Segment::Cubic { c1, c2, to } => w.cubic_to(c1.x, c1.y, c2.x, c2.y, to.x, to.y),
                Segment::Close => w.close(),
            }
        }
        w.finish()
    }
}

impl std::str::FromStr for ParsedPath {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ParsedPath::parse(s)
    }
}

/// Bisection on the segment's x(t).
fn solve_t_for_x(curve: &Curve, x: f64) -> f64 {
    let increasing = curve.to.x >= curve.from.x;
    let (mut lo, mut hi) = (0.0_f64, 1.0_f64);
    for _ in 0..48 {
        let mid = (lo + hi) / 2.0;
        let px = curve.point_at(mid).x;
        if (px < x) == increasing {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    (lo + hi) / 2.0
}

// ─── Parser ──────────────────────────────────────────────────────────────────

struct Parser<'a> {
    src: &'a [u8],
    pos: usize,
    segments: Vec<Segment>,
    pen: Vec2,
    contour_start: Vec2,
    /// Second control point of the previous cubic, for `S`.
    last_cubic_ctrl: Option<Vec2>,
    /// Control point of the previous quadratic, for `T`.
    last_quad_ctrl: Option<Vec2>,
}

impl<'a> Parser<'a> {
    fn new(d: &'a str) -> Self {
        Self {
            src: d.as_bytes(),
            pos: 0,
            segments: Vec::new(),
            pen: Vec2::default(),
            contour_start: Vec2::default(),
            last_cubic_ctrl: None,
            last_quad_ctrl: None,
        }
    }

    fn run(mut self) -> Result<ParsedPath, ChartError> {
        let mut command: Option<u8> = None;
        loop {
            self.skip_separators();
            let Some(&c) = self.src.get(self.pos) else { break };
            if c.is_ascii_alphabetic() {
                self.pos += 1;
                command = Some(c);
                if c == b'Z' || c == b'z' {
                    self.close();
                    continue;
                }
            } else if command.is_none() {
                return Err(ChartError::parse(self.pos, "expected a command"));
            }
            let Some(cmd) = command else { break };
            if matches!(cmd, b'Z' | b'z') {
                return Err(ChartError::parse(self.pos, "unexpected number after close"));
            }
            self.command(cmd)?;
            // implicit repeats after a move are lines
            command = match cmd {
                b'M' => Some(b'L'),
                b'm' => Some(b'l'),
                other => Some(other),
            };
        }
        Ok(ParsedPath {
            segments: self.segments,
        })
    }

    fn command(&mut self, cmd: u8) -> Result<(), ChartError> {
        let relative = cmd.is_ascii_lowercase();
        let origin = if relative { self.pen } else { Vec2::default() };
        let mut cubic_ctrl = None;
        let mut quad_ctrl = None;

        match cmd.to_ascii_uppercase() {
            b'M' => {
                let to = self.point()?.offset(origin);
                self.segments.push(Segment::Move { to });
                self.pen = to;
                self.contour_start = to;
            }
            b'L' => {
                let to = self.point()?.offset(origin);
                self.line(to);
            }
            b'H' => {
                let x = self.number()? + origin.x;
                self.line(Vec2::new(x, self.pen.y));
            }
            b'V' => {
                let y = self.number()? + origin.y;
                self.line(Vec2::new(self.pen.x, y));
            }
            b'C' => {
                let c1 = self.point()?.offset(origin);
                let c2 = self.point()?.offset(origin);
                let to = self.point()?.offset(origin);
                self.cubic(c1, c2, to);
                cubic_ctrl = Some(c2);
            }
            b'S' => {
                let c1 = self
                    .last_cubic_ctrl
                    .map_or(self.pen, |c| c.reflect_about(self.pen));
                let c2 = self.point()?.offset(origin);
                let to = self.point()?.offset(origin);
                self.cubic(c1, c2, to);
                cubic_ctrl = Some(c2);
            }
            b'Q' => {
                let q = self.point()?.offset(origin);
                let to = self.point()?.offset(origin);
                self.quad(q, to);
                quad_ctrl = Some(q);
            }
            b'T' => {
                let q = self
                    .last_quad_ctrl
                    .map_or(self.pen, |c| c.reflect_about(self.pen));
                let to = self.point()?.offset(origin);
                self.quad(q, to);
                quad_ctrl = Some(q);
            }
            b'A' => return Err(ChartError::parse(self.pos, "arc commands are not supported")),
            other => {
                return Err(ChartError::parse(
                    self.pos.saturating_sub(1),
                    format!("unknown command '{}'", other as char),
                ))
            }
        }
        if self.segments.len() == 1 && !matches!(self.segments[0], Segment::Move { .. }) {
            return Err(ChartError::parse(0, "path must start with a move"));
        }
        self.last_cubic_ctrl = cubic_ctrl;
        self.last_quad_ctrl = quad_ctrl;
        Ok(())
    }

    fn line(&mut self, to: Vec2) {
        self.segments.push(Segment::Line { to });
        self.pen = to;
    }

    fn cubic(&mut self, c1: Vec2, c2: Vec2, to: Vec2) {
        self.segments.push(Segment::Cubic { c1, c2, to });
        self.pen = to;
    }

    fn quad(&mut self, q: Vec2, to: Vec2) {
        let c1 = self.pen.lerp(q, 2.0 / 3.0);
        let c2 = to.lerp(q, 2.0 / 3.0);
        self.cubic(c1, c2, to);
    }

    fn close(&mut self) {
        self.segments.push(Segment::Close);
        self.pen = self.contour_start;
        self.last_cubic_ctrl = None;
        self.last_quad_ctrl = None;
    }

    fn skip_separators(&mut self) {
        while let Some(&c) = self.src.get(self.pos) {
            if c.is_ascii_whitespace() || c == b',' {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn point(&mut self) -> Result<Vec2, ChartError> {
        let x = self.number()?;
        let y = self.number()?;
        Ok(Vec2::new(x, y))
    }

    fn number(&mut self) -> Result<f64, ChartError> {
        self.skip_separators();
        let start = self.pos;
        let mut end = self.pos;
        let peek = |i: usize| self.src.get(i).copied();

        if matches!(peek(end), Some(b'+' | b'-')) {
            end += 1;
        }
        let mut digits = 0;
        while matches!(peek(end), Some(b'0'..=b'9')) {
            end += 1;
            digits += 1;
        }
        if peek(end) == Some(b'.') {
            end += 1;
            while matches!(peek(end), Some(b'0'..=b'9')) {
                end += 1;
                digits += 1;
            }
        }
        if digits == 0 {
            return Err(ChartError::parse(start, "expected a number"));
        }
        if matches!(peek(end), Some(b'e' | b'E')) {
            let mut exp_end = end + 1;
            if matches!(peek(exp_end), Some(b'+' | b'-')) {
                exp_end += 1;
            }
            let exp_start = exp_end;
            while matches!(peek(exp_end), Some(b'0'..=b'9')) {
                exp_end += 1;
            }
            if exp_end > exp_start {
                end = exp_end;
            }
        }

        let text = std::str::from_utf8(&self.src[start..end])
            .map_err(|_| ChartError::parse(start, "invalid utf-8 in number"))?;
        let value: f64 = text
            .parse()
            .map_err(|_| ChartError::parse(start, format!("invalid number '{}'", text)))?;
        self.pos = end;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_absolute_commands() {
        let p = ParsedPath::parse("M0,100L50,50C60,40,70,30,100,0Z").unwrap();
        assert_eq!(
            p.segments,
            vec![
                Segment::Move { to: Vec2::new(0.0, 100.0) },
                Segment::Line { to: Vec2::new(50.0, 50.0) },
                Segment::Cubic {
                    c1: Vec2::new(60.0, 40.0),
                    c2: Vec2::new(70.0, 30.0),
                    to: Vec2::new(100.0, 0.0),
                },
                Segment::Close,
            ]
        );
    }

    #[test]
    fn test_to_svg_round_trips_builder_output() {
        let d = "M0,100C25,100,25,50,50,50C75,50,75,0,100,0";
        assert_eq!(ParsedPath::parse(d).unwrap().to_svg(), d);
    }

    #[test]
    fn test_parse_relative_and_shorthand() {
        let p = ParsedPath::parse("m10 10 h5 v5 l-5 0 z").unwrap();
        assert_eq!(p.to_svg(), "M10,10L15,10L15,15L10,15Z");

        // implicit lineto after moveto
        let p = ParsedPath::parse("M0 0 10 10 20 0").unwrap();
        assert_eq!(p.to_svg(), "M0,0L10,10L20,0");
    }

    #[test]
    fn test_parse_compact_numbers() {
        let p = ParsedPath::parse("M.5-1.5L1e1,2.5").unwrap();
        assert_eq!(p.start(), Some(Vec2::new(0.5, -1.5)));
        let curves = p.curves();
        assert_eq!(curves[0].to, Vec2::new(10.0, 2.5));
        assert_eq!(curves.len(), 1);
        assert!(ParsedPath::parse("M0,0L1").is_err());
    }

    #[test]
    fn test_parse_smooth_and_quadratic() {
        let p = ParsedPath::parse("M0,0C0,10,10,10,10,0S20,-10,20,0").unwrap();
        match p.segments[2] {
            Segment::Cubic { c1, .. } => assert_eq!(c1, Vec2::new(10.0, -10.0)),
            ref other => panic!("unexpected {:?}", other),
        }

        let p = ParsedPath::parse("M0,0Q3,3,6,0").unwrap();
        match p.segments[1] {
            Segment::Cubic { c1, c2, to } => {
                assert_eq!(c1, Vec2::new(2.0, 2.0));
                assert_eq!(c2, Vec2::new(4.0, 2.0));
                assert_eq!(to, Vec2::new(6.0, 0.0));
            }
            ref other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(ParsedPath::parse("L0,0").is_err());
        assert!(ParsedPath::parse("10,10").is_err());
        assert!(ParsedPath::parse("M0,0A1,1,0,0,1,2,2").is_err());
        assert!(ParsedPath::parse("M0,0X1").is_err());
        assert!(ParsedPath::parse("").unwrap().is_empty());
    }

    #[test]
    fn test_x_position_for_curve() {
        let p = ParsedPath::parse("M0,0L10,5L20,3").unwrap();
        assert_eq!(p.x_position_for_curve(0), Some(0.0));
        assert_eq!(p.x_position_for_curve(1), Some(10.0));
        assert_eq!(p.x_position_for_curve(2), Some(20.0));
        assert_eq!(p.x_position_for_curve(9), Some(20.0));
        assert_eq!(ParsedPath::default().x_position_for_curve(0), None);
    }

    #[test]
    fn test_y_for_x_on_line_and_cubic() {
        let p = ParsedPath::parse("M0,0L10,10").unwrap();
        assert!((p.y_for_x(2.5).unwrap() - 2.5).abs() < 1e-9);

        let p = ParsedPath::parse("M0,0C5,0,5,10,10,10").unwrap();
        assert!((p.y_for_x(5.0).unwrap() - 5.0).abs() < 1e-9);
        assert!(p.y_for_x(11.0).is_none());
    }

    #[test]
    fn test_curve_slice_matches_point_at() {
        let c = Curve {
            from: Vec2::new(0.0, 0.0),
            c1: Vec2::new(1.0, 3.0),
            c2: Vec2::new(2.0, -1.0),
            to: Vec2::new(3.0, 2.0),
        };
        let s = c.slice(0.25, 0.75);
        let a = c.point_at(0.25);
        let b = c.point_at(0.75);
        assert!((s.from.x - a.x).abs() < 1e-12 && (s.from.y - a.y).abs() < 1e-12);
        assert!((s.to.x - b.x).abs() < 1e-12 && (s.to.y - b.y).abs() < 1e-12);
    }
}
