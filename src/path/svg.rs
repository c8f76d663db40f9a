//! SVG path-data emission.

use std::fmt::Write;

/// Incremental writer for SVG path data (`M`, `L`, `C`, `Z`).
///
/// Numbers use the shortest round-trip representation; negative zero is
/// written as `0`.
#[derive(Debug, Default)]
pub struct PathWriter {
    out: String,
}

impl PathWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(segments: usize) -> Self {
        Self {
            out: String::with_capacity(segments.saturating_mul(24)),
        }
    }

    pub fn move_to(&mut self, x: f64, y: f64) {
        self.pair('M', x, y);
    }

    pub fn line_to(&mut self, x: f64, y: f64) {
        self.pair('L', x, y);
    }

    pub fn cubic_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, x: f64, y: f64) {
        self.out.push('C');
        self.num(x1);
        self.out.push(',');
        self.num(y1);
        self.out.push(',');
        self.num(x2);
        self.out.push(',');
        self.num(y2);
        self.out.push(',');
        self.num(x);
        self.out.push(',');
        self.num(y);
    }

    pub fn close(&mut self) {
        self.out.push('Z');
    }

    pub fn is_empty(&self) -> bool {
        self.out.is_empty()
    }

    pub fn finish(self) -> String {
        self.out
    }

    fn pair(&mut self, cmd: char, x: f64, y: f64) {
        self.out.push(cmd);
        self.num(x);
        self.out.push(',');
        self.num(y);
    }

    fn num(&mut self, v: f64) {
        let v = if v == 0.0 { 0.0 } else { v };
        let _ = write!(self.out, "{}", v);
    }
}
